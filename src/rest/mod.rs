//! The resource layer.
//!
//! This module turns a tastypie-style REST API into typed handles:
//!
//! - **[`ResourceFactory`]**: binds resource type names to their schemas
//! - **[`ResourceType`]**: one bound type, with `create`, `get`, `filter`,
//!   `all`, `count`, `bulk`, custom endpoints and shared caching/auth settings
//! - **[`Resource`]**: a handle to one remote resource, identified by its URI
//! - **[`QueryCursor`]**: lazy, restartable, transparently paged query results
//! - **[`Filters`]**: the `field__operator` keyword DSL, validated against the schema
//! - **[`Bulk`]**: creates, updates and deletes sent in one request
//! - **[`SchemaCache`]**: fetch-once storage of schema documents
//! - **[`ResourceError`]**: every failure the layer reports
//!
//! # Example
//!
//! ```rust,ignore
//! use tasty_orm::{ApiConfig, ApiRoot};
//! use tasty_orm::rest::{Filters, ResourceFactory};
//!
//! let factory = ResourceFactory::new(ApiConfig::new(ApiRoot::new("http://localhost:8000/api/v1")?))?;
//! let trees = factory.resource("tree")?;
//!
//! let mut oak = trees.create([("name", "oak")])?;
//! let sapling = trees.create([("name", "sapling")])?;
//! oak.set("children", vec![sapling.clone()])?;
//! oak.save()?;
//!
//! let found = trees.get(Filters::new().with("children", &sapling))?;
//! assert_eq!(found, oak);
//! ```

mod bulk;
mod cursor;
mod endpoint;
mod errors;
mod factory;
mod filter;
mod relation;
mod resource;
mod resource_type;
mod response;
mod schema;
mod value;

#[cfg(test)]
mod testing;

pub use bulk::Bulk;
pub use cursor::{QueryCursor, ResourceIter};
pub use errors::ResourceError;
pub use factory::ResourceFactory;
pub use filter::Filters;
pub use resource::Resource;
pub use resource_type::{ResourceType, DEFAULT_PAGE_SIZE};
pub use response::{ListPage, PageMeta};
pub use schema::{
    EndpointSchema, FieldSchema, FieldType, FilterRule, ListingEntry, RelatedKind, SchemaCache,
    SchemaDoc, NO_DEFAULT, QUERY_TERMS,
};
pub use value::{FieldValue, DATETIME_FORMAT};
