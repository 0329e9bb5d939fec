//! Scripted transport and fixtures for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use crate::clients::{HttpError, HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::config::{ApiConfig, ApiRoot};
use crate::rest::ResourceFactory;

pub const ROOT: &str = "http://localhost:8000/api/v1";
pub const TREE_LIST: &str = "http://localhost:8000/api/v1/tree/";

/// Answers requests from per-route response queues and records every request.
///
/// The last queued response of a route keeps answering once the queue is
/// down to one entry. Unrouted requests get a 599.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A transport serving the root listing and the `tree` schema.
    pub fn with_tree_api() -> Arc<Self> {
        let transport = Self::new();
        transport.route(
            HttpMethod::Get,
            &format!("{ROOT}/"),
            200,
            json!({
                "tree": {
                    "list_endpoint": "/api/v1/tree/",
                    "schema": "/api/v1/tree/schema/"
                }
            }),
        );
        transport.route(
            HttpMethod::Get,
            "http://localhost:8000/api/v1/tree/schema/",
            200,
            tree_schema(),
        );
        transport
    }

    pub fn route(&self, method: HttpMethod, url: &str, code: u16, body: Value) {
        self.route_response(method, url, HttpResponse::with_body(code, body));
    }

    pub fn route_response(&self, method: HttpMethod, url: &str, response: HttpResponse) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(response);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, method: HttpMethod, url: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.http_method == method && r.url == url)
            .collect()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut routes = self.routes.lock().unwrap();
        let Some(queue) = routes.get_mut(&(request.http_method, request.url.clone())) else {
            return Ok(HttpResponse::with_body(599, json!({"error": "unrouted"})));
        };
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(response.unwrap_or_else(|| HttpResponse::with_body(599, json!({}))))
    }
}

pub fn factory(transport: Arc<ScriptedTransport>) -> ResourceFactory {
    ResourceFactory::with_transport(ApiConfig::new(ApiRoot::new(ROOT).unwrap()), transport)
}

pub fn tree_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "depth_hint": 0,
        "created": "2014-03-01T12:30:05",
        "parent": null,
        "children": [],
        "resource_uri": format!("/api/v1/tree/{id}/")
    })
}

pub fn page(objects: Vec<Value>, offset: u64, total: u64, has_next: bool) -> Value {
    json!({
        "meta": {
            "limit": 20,
            "offset": offset,
            "total_count": total,
            "next": if has_next { Value::from("/api/v1/tree/?offset=next") } else { Value::Null },
            "previous": null
        },
        "objects": objects
    })
}

pub fn tree_schema() -> Value {
    json!({
        "fields": {
            "id": {"type": "integer", "blank": true, "nullable": false, "readonly": false, "unique": true},
            "name": {"type": "string", "blank": false, "nullable": false, "readonly": false,
                     "default": "No default provided.", "help_text": "Node name"},
            "depth_hint": {"type": "integer", "blank": false, "nullable": false, "readonly": false, "default": 0},
            "created": {"type": "datetime", "blank": false, "nullable": false, "readonly": true},
            "parent": {"type": "related", "related_type": "to_one", "nullable": true, "blank": false,
                       "readonly": false, "related_schema": "/api/v1/tree/schema/"},
            "children": {"type": "related", "related_type": "to_many", "nullable": false, "blank": true,
                         "readonly": false, "related_schema": "/api/v1/tree/schema/"},
            "resource_uri": {"type": "string", "readonly": true}
        },
        "filtering": {
            "id": ["exact", "in"],
            "name": 1,
            "depth_hint": ["exact", "gt"],
            "parent": 2
        },
        "ordering": ["name", "id"],
        "allowed_list_http_methods": ["get", "post", "patch", "delete"],
        "allowed_detail_http_methods": ["get", "patch", "delete"],
        "default_limit": 20,
        "list_endpoints": {
            "add": {"args": ["integer", "integer"], "kwargs": [], "return": "integer"},
            "mult": {"args": [], "kwargs": ["num1", "num2"], "return": "integer"}
        },
        "detail_endpoints": {
            "depth": {"args": [], "kwargs": [], "return": "integer"},
            "child": {"args": [], "kwargs": [], "return": "related", "related_resource": "tree"}
        }
    })
}
