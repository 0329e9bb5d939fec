//! Resource-specific error types.
//!
//! Every failure the ORM can report is a distinct [`ResourceError`] variant,
//! so callers can match on the kind they care about:
//!
//! - **Connectivity**: [`CannotConnectToAddress`](ResourceError::CannotConnectToAddress),
//!   [`NonExistantResource`](ResourceError::NonExistantResource)
//! - **Schema validation**: unknown fields, disallowed filters, bad related
//!   values, read-only fields, missing required fields, endpoint arity
//! - **Cardinality**: [`NoResourcesExist`](ResourceError::NoResourcesExist),
//!   [`MultipleResourcesReturned`](ResourceError::MultipleResourcesReturned)
//! - **Lifecycle**: [`ResourceDeleted`](ResourceError::ResourceDeleted),
//!   [`CreatedResourceNotFound`](ResourceError::CreatedResourceNotFound)
//! - **Permissions**: [`MethodNotAllowed`](ResourceError::MethodNotAllowed)
//!
//! Nothing is retried. A failed request surfaces immediately.
//!
//! # Example
//!
//! ```rust,ignore
//! use tasty_orm::rest::{Filters, ResourceError};
//!
//! match users.get(Filters::new().with("username", "bob")) {
//!     Ok(user) => println!("found {}", user.uri()),
//!     Err(ResourceError::NoResourcesExist { .. }) => println!("no such user"),
//!     Err(ResourceError::MultipleResourcesReturned { count, .. }) => {
//!         println!("{count:?} users matched");
//!     }
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::{HttpError, HttpMethod, HttpResponse, HttpResponseError};
use crate::error::ConfigError;

/// Error type for resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The API root could not be reached, or did not answer like an API root.
    #[error("Cannot connect to API root '{url}': {message}")]
    CannotConnectToAddress {
        /// The URL that was requested.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// The API root does not expose the requested resource type.
    #[error("Resource type '{name}' does not exist at {root}")]
    NonExistantResource {
        /// The requested type name.
        name: String,
        /// The API root that was asked.
        root: String,
    },

    /// A field passed on create or update is not in the schema.
    #[error("Field '{field}' is not in the schema of '{resource}'")]
    FieldNotInSchema {
        /// The resource type name.
        resource: String,
        /// The offending field name.
        field: String,
    },

    /// A field read named something the schema does not declare.
    #[error("'{resource}' has no field '{field}'")]
    NoSuchField {
        /// The resource type name.
        resource: String,
        /// The requested field name.
        field: String,
    },

    /// A filter keyword names an unknown field or a disallowed operator.
    #[error("Filter '{filter}' is not allowed on '{resource}'")]
    FilterNotAllowedForField {
        /// The resource type name.
        resource: String,
        /// The filter keyword as given.
        filter: String,
    },

    /// A related field was given a value of the wrong kind or type.
    #[error("Field '{field}' expects '{expected}' resources, got {got}")]
    BadRelatedType {
        /// The related field name.
        field: String,
        /// The resource type the field points to.
        expected: String,
        /// Description of what was supplied.
        got: String,
    },

    /// A write targeted a field the schema marks read-only.
    #[error("Field '{field}' of '{resource}' is read-only")]
    FieldReadOnly {
        /// The resource type name.
        resource: String,
        /// The read-only field.
        field: String,
    },

    /// A create omitted a field the schema requires.
    #[error("Field '{field}' is required to create '{resource}'")]
    MissingRequiredField {
        /// The resource type name.
        resource: String,
        /// The missing field.
        field: String,
    },

    /// A custom endpoint was called with the wrong number of positional arguments.
    #[error("Endpoint '{endpoint}' takes {expected} positional arguments, got {got}")]
    IncorrectEndpointArgs {
        /// The endpoint name.
        endpoint: String,
        /// Declared positional arity.
        expected: usize,
        /// Number of arguments supplied.
        got: usize,
    },

    /// A custom endpoint was called without all of its declared keyword arguments.
    #[error("Endpoint '{endpoint}' is missing keyword arguments: {missing:?}")]
    IncorrectEndpointKwargs {
        /// The endpoint name.
        endpoint: String,
        /// Declared keywords that were not supplied.
        missing: Vec<String>,
    },

    /// The schema declares no custom endpoint with this name.
    #[error("'{resource}' has no endpoint '{endpoint}'")]
    EndpointNotFound {
        /// The resource type name.
        resource: String,
        /// The requested endpoint.
        endpoint: String,
    },

    /// A query matched nothing where at least one match was expected.
    #[error("No '{resource}' resources match {filters}")]
    NoResourcesExist {
        /// The resource type name.
        resource: String,
        /// The query parameters that were sent.
        filters: String,
    },

    /// A query expected to match one resource matched several.
    #[error("Multiple '{resource}' resources match {filters}")]
    MultipleResourcesReturned {
        /// The resource type name.
        resource: String,
        /// The query parameters that were sent.
        filters: String,
        /// Total matches, when the server reported it.
        count: Option<u64>,
    },

    /// A create succeeded but the new resource could not be located.
    #[error("Created '{resource}' resource could not be located")]
    CreatedResourceNotFound {
        /// The resource type name.
        resource: String,
    },

    /// The resource has been deleted, locally or on the server.
    #[error("Resource {uri} has been deleted")]
    ResourceDeleted {
        /// URI of the deleted resource.
        uri: String,
    },

    /// The schema does not allow this method at this level.
    #[error("'{resource}' does not allow {method} on its {level} endpoint")]
    MethodNotAllowed {
        /// The resource type name.
        resource: String,
        /// The refused method.
        method: HttpMethod,
        /// `"list"` or `"detail"`.
        level: &'static str,
    },

    /// A response body did not have the expected shape.
    #[error("Unexpected response from {url}: {message}")]
    UnexpectedResponse {
        /// The URL that answered.
        url: String,
        /// What was wrong with the body.
        message: String,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ResourceError {
    /// Creates a `ResourceError` from an unsuccessful response.
    ///
    /// The status and error body are kept in an [`HttpError::Response`],
    /// including for 404: a missing list endpoint or schema is not a
    /// deleted resource.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tasty_orm::clients::{HttpError, HttpResponse};
    /// use tasty_orm::rest::ResourceError;
    /// use serde_json::json;
    ///
    /// let response = HttpResponse::with_body(404, json!({}));
    /// let error = ResourceError::from_http_response(&response);
    /// assert!(matches!(error, ResourceError::Http(HttpError::Response(ref e)) if e.code == 404));
    /// ```
    #[must_use]
    pub fn from_http_response(response: &HttpResponse) -> Self {
        Self::Http(HttpError::Response(HttpResponseError {
            code: response.code,
            message: response.error_message(),
        }))
    }

    /// Creates a `ResourceError` from an unsuccessful response to a request
    /// on the detail URI `uri`.
    ///
    /// A 404 means the resource behind `uri` is gone and maps to
    /// [`ResourceDeleted`](Self::ResourceDeleted); anything else is mapped as
    /// by [`from_http_response`](Self::from_http_response).
    ///
    /// # Example
    ///
    /// ```rust
    /// use tasty_orm::clients::HttpResponse;
    /// use tasty_orm::rest::ResourceError;
    /// use serde_json::json;
    ///
    /// let response = HttpResponse::with_body(404, json!({}));
    /// let error = ResourceError::from_detail_response(&response, "/api/v1/user/3/");
    /// assert!(matches!(error, ResourceError::ResourceDeleted { .. }));
    /// ```
    #[must_use]
    pub fn from_detail_response(response: &HttpResponse, uri: &str) -> Self {
        if response.is_not_found() {
            return Self::ResourceDeleted {
                uri: uri.to_string(),
            };
        }
        Self::from_http_response(response)
    }

    /// Returns `true` for the lifecycle error raised on deleted resources.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        matches!(self, Self::ResourceDeleted { .. })
    }

    pub(crate) fn unexpected(url: &str, message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};
