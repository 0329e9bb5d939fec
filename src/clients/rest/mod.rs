//! REST client for a schema-described resource API.
//!
//! [`RestClient`] sits on top of a [`Transport`](crate::clients::Transport)
//! and offers `get()`, `post()`, `patch()` and `delete()` methods that take
//! server URIs and per-request credentials.

mod client;

pub use client::RestClient;
