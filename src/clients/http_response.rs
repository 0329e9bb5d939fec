//! HTTP response types.

use std::collections::HashMap;

/// An HTTP response returned by a [`Transport`](crate::clients::Transport).
///
/// Header names are stored lowercase; a header may carry several values.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers.
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body (`{}` when the body was empty).
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`, normalizing header names to lowercase.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Self {
            code,
            headers,
            body,
        }
    }

    /// Creates a response without headers.
    #[must_use]
    pub fn with_body(code: u16, body: serde_json::Value) -> Self {
        Self {
            code,
            headers: HashMap::new(),
            body,
        }
    }

    /// Returns `true` for 2xx status codes.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// Returns `true` for 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.code == 404
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `Location` header, set by the server after a create.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Serializes the error parts of the body for error messages.
    ///
    /// Keeps the `error`, `errors` and `error_message` keys when present and
    /// falls back to the whole body otherwise.
    #[must_use]
    pub fn error_message(&self) -> String {
        let mut error_body = serde_json::Map::new();
        for key in ["error", "errors", "error_message"] {
            if let Some(value) = self.body.get(key) {
                error_body.insert(key.to_string(), value.clone());
            }
        }
        if error_body.is_empty() {
            self.body.to_string()
        } else {
            serde_json::Value::Object(error_body).to_string()
        }
    }
}
