//! Configuration types for binding the ORM to a remote API.
//!
//! # Overview
//!
//! - [`ApiConfig`]: Settings shared by every resource type bound from one API root
//! - [`ApiConfigBuilder`]: A builder for constructing [`ApiConfig`] instances
//! - [`ApiRoot`]: A validated API root URL
//! - [`ResourceName`]: A validated resource type name
//!
//! # Example
//!
//! ```rust
//! use tasty_orm::{ApiConfig, ApiRoot};
//!
//! let config = ApiConfig::builder()
//!     .api_root(ApiRoot::new("http://localhost:8000/api/v1").unwrap())
//!     .page_size(50)
//!     .default_caching(false)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.page_size(), Some(50));
//! assert!(!config.default_caching());
//! ```

mod newtypes;

pub use newtypes::{ApiRoot, ResourceName};

use crate::error::ConfigError;

/// Configuration shared by a [`ResourceFactory`](crate::rest::ResourceFactory)
/// and every resource type it binds.
///
/// # Thread Safety
///
/// `ApiConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    api_root: ApiRoot,
    page_size: Option<u32>,
    default_caching: bool,
    user_agent_prefix: Option<String>,
}

impl ApiConfig {
    /// Creates a new builder for constructing an `ApiConfig`.
    #[must_use]
    pub fn builder() -> ApiConfigBuilder {
        ApiConfigBuilder::new()
    }

    /// Creates a configuration with defaults for the given root.
    #[must_use]
    pub const fn new(api_root: ApiRoot) -> Self {
        Self {
            api_root,
            page_size: None,
            default_caching: true,
            user_agent_prefix: None,
        }
    }

    /// Returns the API root.
    #[must_use]
    pub const fn api_root(&self) -> &ApiRoot {
        &self.api_root
    }

    /// Returns the page size override, if configured.
    ///
    /// When unset, query cursors page by the limit each schema advertises.
    #[must_use]
    pub const fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// Returns the caching default for newly bound resource types.
    #[must_use]
    pub const fn default_caching(&self) -> bool {
        self.default_caching
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

// Verify ApiConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiConfig>();
};

/// Builder for constructing [`ApiConfig`] instances.
///
/// `api_root` is required.
///
/// # Defaults
///
/// - `page_size`: `None` (use the schema's advertised limit)
/// - `default_caching`: `true`
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ApiConfigBuilder {
    api_root: Option<ApiRoot>,
    page_size: Option<u32>,
    default_caching: Option<bool>,
    user_agent_prefix: Option<String>,
}

impl ApiConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API root (required).
    #[must_use]
    pub fn api_root(mut self, root: ApiRoot) -> Self {
        self.api_root = Some(root);
        self
    }

    /// Overrides the number of objects requested per page.
    #[must_use]
    pub const fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Sets whether resource types cache fields by default.
    #[must_use]
    pub const fn default_caching(mut self, caching: bool) -> Self {
        self.default_caching = Some(caching);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ApiConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_root` is not set,
    /// or [`ConfigError::ZeroPageSize`] if a page size of zero was given.
    pub fn build(self) -> Result<ApiConfig, ConfigError> {
        let api_root = self
            .api_root
            .ok_or(ConfigError::MissingRequiredField { field: "api_root" })?;

        if self.page_size == Some(0) {
            return Err(ConfigError::ZeroPageSize);
        }

        Ok(ApiConfig {
            api_root,
            page_size: self.page_size,
            default_caching: self.default_caching.unwrap_or(true),
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
