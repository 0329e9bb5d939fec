//! Credential injection for API requests.
//!
//! Authentication itself is the remote service's business; the ORM only needs
//! a way to attach credentials to each outgoing request. That capability is
//! the [`Auth`] trait. Credentials are attached per resource type (or per
//! factory) and read again for every request, so replacing them takes effect
//! on the next request and never retroactively.
//!
//! # Overview
//!
//! - [`Auth`]: Trait implemented by every credential type
//! - [`ApiKeyAuth`]: `Authorization: ApiKey <username>:<key>`
//! - [`BasicAuth`]: HTTP basic authentication
//! - [`BearerAuth`]: `Authorization: Bearer <token>`
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use tasty_orm::auth::{ApiKeyAuth, Auth};
//!
//! let auth = ApiKeyAuth::new("testuser", "204db7bcfafb2deb7506b89eb3b9b715b09905c8");
//! let mut headers = HashMap::new();
//! auth.apply(&mut headers);
//!
//! assert_eq!(
//!     headers.get("Authorization").map(String::as_str),
//!     Some("ApiKey testuser:204db7bcfafb2deb7506b89eb3b9b715b09905c8"),
//! );
//! ```

mod credentials;

pub use credentials::{ApiKeyAuth, BasicAuth, BearerAuth};

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// A credential that can be attached to outgoing requests.
///
/// Implementors insert whatever headers their scheme needs. The trait is
/// object safe; resource types store credentials as [`SharedAuth`].
pub trait Auth: Debug + Send + Sync {
    /// Adds this credential's headers to a request's header map.
    fn apply(&self, headers: &mut HashMap<String, String>);
}

/// A credential shared between a factory, its resource types, and requests.
pub type SharedAuth = Arc<dyn Auth>;
