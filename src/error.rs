//! Error types for client configuration.
//!
//! This module contains error types used when building the configuration
//! that binds the ORM to a remote API root.
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Error messages are designed to be clear and actionable.
//!
//! # Example
//!
//! ```rust
//! use tasty_orm::{ApiRoot, ConfigError};
//!
//! let result = ApiRoot::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidApiRoot { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
///
/// Each variant provides a clear, actionable error message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The API root URL is invalid.
    #[error("Invalid API root '{url}'. Expected an absolute URL with scheme (e.g., 'http://localhost:8000/api/v1').")]
    InvalidApiRoot {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A resource type name is empty or contains path separators.
    #[error("Invalid resource name '{name}'. Resource names must be non-empty and contain no '/'.")]
    InvalidResourceName {
        /// The invalid name that was provided.
        name: String,
    },

    /// The page size override must be positive.
    #[error("Page size must be greater than zero.")]
    ZeroPageSize,

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}
