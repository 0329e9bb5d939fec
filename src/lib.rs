//! # tasty-orm
//!
//! A client-side object mapper for tastypie-style REST APIs. Resource types
//! are discovered from the API's own schema documents at runtime; no model
//! code is written or generated.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ApiConfig`] and [`ApiConfigBuilder`]
//! - Validated newtypes for the API root and resource type names
//! - Pluggable credentials via the [`auth::Auth`] trait (API key, basic, bearer)
//! - A blocking HTTP client behind a [`clients::Transport`] seam
//! - Resource handles with caching, filtering, paging, relations, bulk
//!   operations and custom endpoints in [`rest`]
//!
//! ## Quick Start
//!
//! ```rust
//! use tasty_orm::{ApiConfig, ApiRoot};
//!
//! let config = ApiConfig::builder()
//!     .api_root(ApiRoot::new("http://localhost:8000/api/v1").unwrap())
//!     .page_size(50)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.page_size(), Some(50));
//! assert!(config.default_caching());
//! ```
//!
//! ## Working With Resources
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tasty_orm::{ApiConfig, ApiRoot};
//! use tasty_orm::auth::ApiKeyAuth;
//! use tasty_orm::rest::{Bulk, Filters, ResourceFactory};
//!
//! let factory = ResourceFactory::new(ApiConfig::new(ApiRoot::new("http://localhost:8000/api/v1")?))?;
//! factory.set_auth(Some(Arc::new(ApiKeyAuth::new("admin", "secret"))));
//!
//! let users = factory.resource("user")?;
//! let mut ada = users.create([("username", "ada")])?;
//! ada.set("email", "ada@example.com")?;
//! ada.save()?;
//!
//! for user in &users.filter(Filters::new().with("username__startswith", "a").order_by("-id"))? {
//!     println!("{}", user?.uri());
//! }
//!
//! let bob = users.get(Filters::new().with("username", "bob"))?;
//! users.bulk(Bulk::new().create([("username", "cy")]).delete(&bob))?;
//! assert!(!bob.is_live());
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: schemas and settings live in the factory that fetched them
//! - **Fail-fast validation**: fields, filters and endpoint arity are checked before any request
//! - **Thread-safe**: all types are `Send + Sync`
//! - **Blocking**: every network operation blocks the calling thread

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{ApiConfig, ApiConfigBuilder, ApiRoot, ResourceName};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{
    DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, RestClient, Transport,
};

// Re-export resource types
pub use rest::{
    Bulk, FieldValue, Filters, QueryCursor, Resource, ResourceError, ResourceFactory,
    ResourceType,
};
