//! HTTP transport layer.
//!
//! This module provides the request/response types the ORM speaks, the
//! [`Transport`] seam through which every request flows, and [`HttpClient`],
//! the default blocking implementation.
//!
//! # Overview
//!
//! - [`Transport`]: The request/response capability the core depends on
//! - [`HttpClient`]: Blocking `reqwest` transport
//! - [`RestClient`]: Resolves server URIs and attaches credentials
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, PATCH, DELETE)
//! - [`HttpError`]: Failures to obtain a response
//!
//! # Retry Behavior
//!
//! None. A failed request surfaces immediately; any retry or timeout policy
//! belongs to a custom [`Transport`].

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod rest;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, Transport, SDK_VERSION};
pub use http_request::{DataType, HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use rest::RestClient;
