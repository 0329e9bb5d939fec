//! REST client bound to one API root.
//!
//! This module provides the [`RestClient`] type, which resolves server URIs
//! against the configured [`ApiRoot`], attaches credentials and sends the
//! request through a [`Transport`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::auth::SharedAuth;
use crate::clients::{
    DataType, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, Transport,
};
use crate::config::{ApiConfig, ApiRoot};

/// Client for the resource API under one root.
///
/// URIs passed to the request methods may be absolute, server-relative
/// (`/api/v1/user/1/`) or relative to the root (`user/`). Credentials are
/// passed per request so that changing them takes effect on the next call.
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync`.
///
/// # Example
///
/// ```rust,no_run
/// use tasty_orm::{ApiConfig, ApiRoot};
/// use tasty_orm::clients::RestClient;
///
/// let config = ApiConfig::new(ApiRoot::new("http://localhost:8000/api/v1").unwrap());
/// let client = RestClient::new(&config).unwrap();
/// let response = client.get("/api/v1/", None, None).unwrap();
/// println!("{}", response.body);
/// ```
#[derive(Clone)]
pub struct RestClient {
    transport: Arc<dyn Transport>,
    api_root: ApiRoot,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("api_root", &self.api_root)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Creates a client backed by the default [`HttpClient`].
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if the HTTP client cannot be created.
    pub fn new(config: &ApiConfig) -> Result<Self, HttpError> {
        let http_client = HttpClient::new(Some(config))?;
        Ok(Self::with_transport(
            config.api_root().clone(),
            Arc::new(http_client),
        ))
    }

    /// Creates a client that sends every request through `transport`.
    #[must_use]
    pub fn with_transport(api_root: ApiRoot, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            api_root,
        }
    }

    /// Returns the API root this client resolves URIs against.
    #[must_use]
    pub const fn api_root(&self) -> &ApiRoot {
        &self.api_root
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if no response could be obtained.
    pub fn get(
        &self,
        uri: &str,
        query: Option<HashMap<String, String>>,
        auth: Option<&SharedAuth>,
    ) -> Result<HttpResponse, HttpError> {
        self.make_request(HttpMethod::Get, uri, None, query, auth)
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if no response could be obtained.
    pub fn post(
        &self,
        uri: &str,
        body: serde_json::Value,
        auth: Option<&SharedAuth>,
    ) -> Result<HttpResponse, HttpError> {
        self.make_request(HttpMethod::Post, uri, Some(body), None, auth)
    }

    /// Sends a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if no response could be obtained.
    pub fn patch(
        &self,
        uri: &str,
        body: serde_json::Value,
        auth: Option<&SharedAuth>,
    ) -> Result<HttpResponse, HttpError> {
        self.make_request(HttpMethod::Patch, uri, Some(body), None, auth)
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if no response could be obtained.
    pub fn delete(
        &self,
        uri: &str,
        auth: Option<&SharedAuth>,
    ) -> Result<HttpResponse, HttpError> {
        self.make_request(HttpMethod::Delete, uri, None, None, auth)
    }

    fn make_request(
        &self,
        method: HttpMethod,
        uri: &str,
        body: Option<serde_json::Value>,
        query: Option<HashMap<String, String>>,
        auth: Option<&SharedAuth>,
    ) -> Result<HttpResponse, HttpError> {
        let url = self.api_root.resolve(uri);

        let mut builder = HttpRequest::builder(method, &url);
        if let Some(body_value) = body {
            builder = builder.body(body_value).body_type(DataType::Json);
        }
        if let Some(query_params) = query.filter(|q| !q.is_empty()) {
            builder = builder.query(query_params);
        }
        if let Some(auth) = auth {
            let mut headers = HashMap::new();
            auth.apply(&mut headers);
            builder = builder.headers(headers);
        }

        let request = builder.build()?;

        tracing::debug!(
            method = %request.http_method,
            url = %request.url,
            query = ?request.query,
            "sending request"
        );

        let response = self.transport.send(&request)?;

        tracing::debug!(status = response.code, url = %request.url, "received response");

        Ok(response)
    }
}
