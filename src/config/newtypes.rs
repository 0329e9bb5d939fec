//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated API root URL.
///
/// The root is the URL under which every resource type's list endpoint
/// lives (e.g. `http://localhost:8000/api/v1`). It is normalized to carry
/// no trailing slash, and split into an origin (`scheme://host[:port]`) and
/// a path so that server-relative URIs such as `/api/v1/user/1/` can be
/// resolved against it.
///
/// # Example
///
/// ```rust
/// use tasty_orm::ApiRoot;
///
/// let root = ApiRoot::new("http://localhost:8000/api/v1/").unwrap();
/// assert_eq!(root.as_ref(), "http://localhost:8000/api/v1");
/// assert_eq!(root.origin(), "http://localhost:8000");
/// assert_eq!(root.path(), "/api/v1");
/// assert_eq!(root.resolve("/api/v1/user/1/"), "http://localhost:8000/api/v1/user/1/");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiRoot {
    url: String,
    scheme_end: usize,
    host_end: usize,
}

impl ApiRoot {
    /// Creates a new validated API root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiRoot`] if the URL has no scheme or host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidApiRoot { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidApiRoot { url: url.clone() });
        }

        let host_start = scheme_end + 3;
        if host_start >= url.len() {
            return Err(ConfigError::InvalidApiRoot { url: url.clone() });
        }

        // The origin ends where the path, query, or fragment begins
        let remainder = &url[host_start..];
        let host_end = remainder
            .find(['/', '?', '#'])
            .map_or(url.len(), |i| host_start + i);

        let host = &url[host_start..host_end];
        if host.is_empty() || host.starts_with(':') {
            return Err(ConfigError::InvalidApiRoot { url: url.clone() });
        }
        if url[host_end..].contains(['?', '#']) {
            return Err(ConfigError::InvalidApiRoot { url: url.clone() });
        }

        Ok(Self {
            url,
            scheme_end,
            host_end,
        })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns `scheme://host[:port]`.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.url[..self.host_end]
    }

    /// Returns the path portion of the root, without a trailing slash.
    ///
    /// Empty when the API lives at the server root.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.url[self.host_end..]
    }

    /// Resolves a URI returned by the server into an absolute URL.
    ///
    /// Absolute URLs are returned unchanged, server-relative URIs (leading
    /// `/`) are joined to the origin, and anything else is joined to the root.
    #[must_use]
    pub fn resolve(&self, uri: &str) -> String {
        if uri.contains("://") {
            uri.to_string()
        } else if uri.starts_with('/') {
            format!("{}{uri}", self.origin())
        } else {
            format!("{}/{uri}", self.url)
        }
    }

    /// Returns the server-relative form of a URI (the form used in
    /// `resource_uri` fields and related-field values).
    #[must_use]
    pub fn relative<'a>(&self, uri: &'a str) -> &'a str {
        uri.strip_prefix(self.origin()).unwrap_or(uri)
    }
}

impl AsRef<str> for ApiRoot {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for ApiRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// A validated resource type name (e.g. `user`, `test_resource`).
///
/// # Example
///
/// ```rust
/// use tasty_orm::ResourceName;
///
/// let name = ResourceName::new("test_resource").unwrap();
/// assert_eq!(name.as_ref(), "test_resource");
/// assert!(ResourceName::new("").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceName(String);

impl ResourceName {
    /// Creates a new validated resource name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidResourceName`] if the name is empty,
    /// blank, or contains a `/`.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.trim().is_empty() || name.contains('/') {
            return Err(ConfigError::InvalidResourceName { name });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
