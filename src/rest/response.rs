//! The list response envelope.
//!
//! List endpoints answer with a page of objects plus metadata:
//!
//! ```json
//! {
//!   "meta": {"limit": 20, "offset": 0, "total_count": 53, "next": "...", "previous": null},
//!   "objects": [{"resource_uri": "/api/v1/tree/1/", "...": "..."}]
//! }
//! ```
//!
//! [`ListPage`] wraps one such page and derefs to its objects.

use std::ops::Deref;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::clients::HttpResponse;
use crate::rest::ResourceError;

/// Paging metadata of a list response.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PageMeta {
    /// Page size the server applied.
    #[serde(default)]
    pub limit: Option<u64>,
    /// Offset of the first object.
    #[serde(default)]
    pub offset: Option<u64>,
    /// Total number of matches, when the server reports it.
    #[serde(default)]
    pub total_count: Option<u64>,
    /// URI of the next page, `None` on the last page.
    #[serde(default)]
    pub next: Option<String>,
    /// URI of the previous page.
    #[serde(default)]
    pub previous: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    meta: PageMeta,
    objects: Vec<Value>,
}

/// One page of a list response.
///
/// Implements `Deref<Target = [Map<String, Value>]>` for direct access to the
/// object representations.
#[derive(Clone, Debug)]
pub struct ListPage {
    objects: Vec<Map<String, Value>>,
    meta: PageMeta,
}

impl ListPage {
    /// Parses a successful list response.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] for non-2xx responses (see
    /// [`ResourceError::from_http_response`]) and
    /// [`ResourceError::UnexpectedResponse`] if the body is not a list
    /// envelope of objects.
    pub fn from_http_response(response: HttpResponse, url: &str) -> Result<Self, ResourceError> {
        if !response.is_ok() {
            return Err(ResourceError::from_http_response(&response));
        }
        let envelope: Envelope = serde_json::from_value(response.body)
            .map_err(|e| ResourceError::unexpected(url, e.to_string()))?;
        let objects = envelope
            .objects
            .into_iter()
            .map(|object| match object {
                Value::Object(map) => Ok(map),
                other => Err(ResourceError::unexpected(
                    url,
                    format!("expected an object, got {other}"),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            objects,
            meta: envelope.meta,
        })
    }

    /// Returns the paging metadata.
    #[must_use]
    pub const fn meta(&self) -> &PageMeta {
        &self.meta
    }

    /// Returns `true` if the server says more pages follow.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.meta.next.is_some()
    }

    /// Consumes the page and returns its objects.
    #[must_use]
    pub fn into_objects(self) -> Vec<Map<String, Value>> {
        self.objects
    }
}

impl Deref for ListPage {
    type Target = [Map<String, Value>];

    fn deref(&self) -> &Self::Target {
        &self.objects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const URL: &str = "http://localhost:8000/api/v1/tree/";

    #[test]
    fn test_page_parses_meta_and_objects() {
        let response = HttpResponse::with_body(
            200,
            json!({
                "meta": {"limit": 2, "offset": 0, "total_count": 3, "next": "/api/v1/tree/?offset=2", "previous": null},
                "objects": [{"resource_uri": "/api/v1/tree/1/"}, {"resource_uri": "/api/v1/tree/2/"}]
            }),
        );
        let page = ListPage::from_http_response(response, URL).unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.meta().total_count, Some(3));
        assert!(page.has_next_page());
        assert_eq!(page[1]["resource_uri"], "/api/v1/tree/2/");
    }

    #[test]
    fn test_missing_meta_defaults() {
        let response = HttpResponse::with_body(200, json!({"objects": []}));
        let page = ListPage::from_http_response(response, URL).unwrap();

        assert!(page.is_empty());
        assert!(page.meta().total_count.is_none());
        assert!(!page.has_next_page());
    }

    #[test]
    fn test_malformed_body_is_unexpected_response() {
        let response = HttpResponse::with_body(200, json!({"items": []}));
        assert!(matches!(
            ListPage::from_http_response(response, URL),
            Err(ResourceError::UnexpectedResponse { .. })
        ));

        let response = HttpResponse::with_body(200, json!({"objects": [1, 2]}));
        assert!(matches!(
            ListPage::from_http_response(response, URL),
            Err(ResourceError::UnexpectedResponse { .. })
        ));
    }

    #[test]
    fn test_error_status_is_propagated() {
        let response = HttpResponse::with_body(500, json!({"error": "boom"}));
        assert!(matches!(
            ListPage::from_http_response(response, URL),
            Err(ResourceError::Http(_))
        ));
    }
}
