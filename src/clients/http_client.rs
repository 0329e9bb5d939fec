//! The transport seam and its default blocking HTTP implementation.
//!
//! The ORM never talks to the network directly. Every request goes through a
//! [`Transport`], which turns an [`HttpRequest`] into an [`HttpResponse`]
//! carrying the status code, headers and parsed JSON body. Non-2xx statuses
//! are *responses*, not errors: interpreting them is the caller's job. Only
//! failures to obtain a response at all are reported as [`HttpError`].
//!
//! [`HttpClient`] is the default transport, built on `reqwest`'s blocking
//! client. Tests and embedders can substitute any other implementation.

use std::collections::HashMap;

use crate::clients::errors::HttpError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::ApiConfig;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A blocking request/response capability.
///
/// Implementations must be `Send + Sync` so that one transport can serve
/// resource types used from several threads.
pub trait Transport: Send + Sync {
    /// Sends a request and returns the server's response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if no response could be obtained, or if the
    /// request fails validation.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Blocking HTTP transport backed by `reqwest`.
///
/// The client adds `User-Agent`, `Accept` and, for requests with a body,
/// `Content-Type` headers. It performs no retries and imposes no timeouts.
///
/// # Example
///
/// ```rust,no_run
/// use tasty_orm::clients::{HttpClient, HttpMethod, HttpRequest, Transport};
///
/// let client = HttpClient::new(None).unwrap();
/// let request = HttpRequest::builder(HttpMethod::Get, "http://localhost:8000/api/v1/")
///     .build()
///     .unwrap();
/// let response = client.send(&request).unwrap();
/// println!("{}", response.body);
/// ```
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::blocking::Client,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying client cannot be
    /// created (e.g., TLS initialization failure).
    pub fn new(config: Option<&ApiConfig>) -> Result<Self, HttpError> {
        let user_agent_prefix = config
            .and_then(ApiConfig::user_agent_prefix)
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}tasty-orm v{SDK_VERSION}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let client = reqwest::blocking::Client::builder()
            .use_rustls_tls()
            .build()?;

        Ok(Self {
            client,
            default_headers,
        })
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Parses a response body. Text that is not JSON is kept: as a string
    /// for successes, under `raw_body` for errors.
    fn parse_body(code: u16, body_text: &str) -> serde_json::Value {
        if body_text.trim().is_empty() {
            return serde_json::json!({});
        }
        serde_json::from_str(body_text).unwrap_or_else(|_| {
            if code >= 400 {
                serde_json::json!({ "raw_body": body_text })
            } else {
                serde_json::Value::String(body_text.to_string())
            }
        })
    }
}

impl Transport for HttpClient {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let method = match request.http_method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut headers = self.default_headers.clone();
        if let Some(body_type) = &request.body_type {
            headers.insert(
                "Content-Type".to_string(),
                body_type.as_content_type().to_string(),
            );
        }
        for (key, value) in &request.headers {
            headers.insert(key.clone(), value.clone());
        }

        let mut req_builder = self.client.request(method, &request.url);
        for (key, value) in &headers {
            req_builder = req_builder.header(key, value);
        }
        if let Some(query) = &request.query {
            req_builder = req_builder.query(query);
        }
        if let Some(body) = &request.body {
            req_builder = req_builder.body(body.to_string());
        }

        let res = req_builder.send().map_err(|e| {
            if e.is_connect() {
                HttpError::Connection {
                    url: request.url.clone(),
                    message: e.to_string(),
                }
            } else {
                HttpError::Network(e)
            }
        })?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().unwrap_or_default();
        let body = Self::parse_body(code, &body_text);

        Ok(HttpResponse::new(code, res_headers, body))
    }
}
