//! Built-in credential types.

use std::collections::HashMap;
use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::auth::Auth;

const AUTHORIZATION: &str = "Authorization";

/// API key authentication: `Authorization: ApiKey <username>:<key>`.
///
/// The key is masked in debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKeyAuth {
    username: String,
    api_key: String,
}

impl ApiKeyAuth {
    /// Creates API key credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            api_key: api_key.into(),
        }
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl Auth for ApiKeyAuth {
    fn apply(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            AUTHORIZATION.to_string(),
            format!("ApiKey {}:{}", self.username, self.api_key),
        );
    }
}

impl fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("username", &self.username)
            .field("api_key", &"*****")
            .finish()
    }
}

/// HTTP basic authentication.
///
/// The password is masked in debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    /// Creates basic credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Auth for BasicAuth {
    fn apply(&self, headers: &mut HashMap<String, String>) {
        let encoded = STANDARD.encode(format!("{}:{}", self.username, self.password));
        headers.insert(AUTHORIZATION.to_string(), format!("Basic {encoded}"));
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"*****")
            .finish()
    }
}

/// Bearer token authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerAuth(String);

impl BearerAuth {
    /// Creates bearer credentials.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl Auth for BearerAuth {
    fn apply(&self, headers: &mut HashMap<String, String>) {
        headers.insert(AUTHORIZATION.to_string(), format!("Bearer {}", self.0));
    }
}

impl fmt::Debug for BearerAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerAuth(*****)")
    }
}
