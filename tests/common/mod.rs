//! An in-memory tastypie-style API for integration tests.
//!
//! Serves four resource types under `http://localhost:8111/test/api/v1`:
//!
//! - `test_resource`: needs `ApiKey testuser:<key>` for data requests
//! - `tree`: self-referencing parent/children, with custom endpoints
//! - `user`: read-only, seeded with `testuser`
//! - `no_filter`: filters nothing and answers creates with an empty 201

#![allow(dead_code)]

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::{json, Map, Value};
use tasty_orm::auth::ApiKeyAuth;
use tasty_orm::clients::{HttpError, HttpMethod, HttpRequest, HttpResponse, Transport};
use tasty_orm::rest::{ResourceFactory, NO_DEFAULT};
use tasty_orm::{ApiConfig, ApiRoot};

pub const ROOT: &str = "http://localhost:8111/test/api/v1";
pub const ORIGIN: &str = "http://localhost:8111";
pub const PREFIX: &str = "/test/api/v1/";
pub const USERNAME: &str = "testuser";
pub const API_KEY: &str = "204db7bcfafb2deb7506b89eb3b9b715b09905c8";

const DEFAULT_LIMIT: usize = 20;
const OPERATORS: &[&str] = &[
    "exact",
    "iexact",
    "contains",
    "icontains",
    "startswith",
    "istartswith",
    "endswith",
    "gt",
    "gte",
    "lt",
    "lte",
    "in",
    "isnull",
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum CreateReply {
    Location,
    Body,
    Nothing,
}

struct Table {
    schema: Value,
    reply: CreateReply,
    protected: bool,
    rows: BTreeMap<i64, Map<String, Value>>,
    next_id: i64,
}

impl Table {
    fn new(schema: Value, reply: CreateReply, protected: bool) -> Self {
        Self {
            schema,
            reply,
            protected,
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.schema["fields"].get(name)
    }
}

pub struct FakeApi {
    tables: Mutex<BTreeMap<String, Table>>,
    requests: Mutex<Vec<HttpRequest>>,
    max_limit: usize,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Self::with_max_limit(1000)
    }

    /// A server that never returns more than `max_limit` objects per page.
    pub fn with_max_limit(max_limit: usize) -> Arc<Self> {
        let mut tables = BTreeMap::new();
        tables.insert(
            "test_resource".to_string(),
            Table::new(test_resource_schema(), CreateReply::Location, true),
        );
        tables.insert(
            "tree".to_string(),
            Table::new(tree_schema(), CreateReply::Body, false),
        );
        tables.insert(
            "user".to_string(),
            Table::new(user_schema(), CreateReply::Location, false),
        );
        tables.insert(
            "no_filter".to_string(),
            Table::new(no_filter_schema(), CreateReply::Nothing, false),
        );

        let api = Self {
            tables: Mutex::new(tables),
            requests: Mutex::new(Vec::new()),
            max_limit,
        };
        api.insert("user", json!({"username": USERNAME, "email": "test@example.com"}));
        api.insert("user", json!({"username": "other", "email": "other@example.com"}));
        Arc::new(api)
    }

    /// Inserts a row directly, bypassing the HTTP surface. Returns its id.
    pub fn insert(&self, resource: &str, fields: Value) -> i64 {
        let mut tables = self.lock();
        let table = tables.get_mut(resource).expect("unknown table");
        let id = table.next_id;
        table.next_id += 1;
        let mut row = fields.as_object().cloned().unwrap_or_default();
        row.insert("id".to_string(), json!(id));
        table.rows.insert(id, row);
        id
    }

    /// Deletes a row behind the client's back.
    pub fn remove(&self, resource: &str, id: i64) {
        self.lock()
            .get_mut(resource)
            .expect("unknown table")
            .rows
            .remove(&id);
    }

    pub fn row_count(&self, resource: &str) -> usize {
        self.lock().get(resource).map_or(0, |t| t.rows.len())
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn requests_with(&self, method: HttpMethod) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.http_method == method)
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Table>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let Some(path) = request
            .url
            .strip_prefix(ORIGIN)
            .and_then(|p| {
                p.strip_prefix(PREFIX)
                    .or_else(|| p.strip_prefix(PREFIX.trim_end_matches('/')))
            })
        else {
            return not_found();
        };
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| urlencoding::decode(s).map_or_else(|_| s.to_string(), |d| d.into_owned()))
            .collect();
        let query = request.query.clone().unwrap_or_default();
        let mut tables = self.lock();

        let Some(name) = segments.first() else {
            return listing(&tables);
        };
        let Some(table) = tables.get(name.as_str()) else {
            return not_found();
        };
        if segments.get(1).map(String::as_str) == Some("schema") {
            return HttpResponse::with_body(200, table.schema.clone());
        }
        if table.protected && !authorized(request) {
            return HttpResponse::with_body(401, json!({"error": "Unauthorized"}));
        }
        let level = if segments.len() == 1 || segments[1].parse::<i64>().is_err() {
            "list"
        } else {
            "detail"
        };
        if segments.len() <= 2 && !method_allowed(table, level, request.http_method) {
            return HttpResponse::with_body(405, json!({"error": "Method not allowed"}));
        }

        let name = name.clone();
        match (segments.len(), segments.get(1).and_then(|s| s.parse::<i64>().ok())) {
            (1, _) => match request.http_method {
                HttpMethod::Get => self.list(&tables, &name, &query),
                HttpMethod::Post => create(&mut tables, &name, request.body.as_ref()),
                HttpMethod::Patch => bulk(&mut tables, &name, request.body.as_ref()),
                HttpMethod::Delete => {
                    if let Some(table) = tables.get_mut(&name) {
                        table.rows.clear();
                    }
                    HttpResponse::with_body(204, json!({}))
                }
                HttpMethod::Put => HttpResponse::with_body(405, json!({})),
            },
            (2, Some(id)) => match request.http_method {
                HttpMethod::Get => detail(&tables, &name, id)
                    .map_or_else(not_found, |row| HttpResponse::with_body(200, Value::Object(row))),
                HttpMethod::Patch => update(&mut tables, &name, id, request.body.as_ref()),
                HttpMethod::Delete => {
                    let removed = tables
                        .get_mut(&name)
                        .and_then(|t| t.rows.remove(&id))
                        .is_some();
                    if removed {
                        HttpResponse::with_body(204, json!({}))
                    } else {
                        not_found()
                    }
                }
                _ => HttpResponse::with_body(405, json!({})),
            },
            (3, Some(id)) => detail_endpoint(&tables, &name, id, &segments[2]),
            (_, _) => list_endpoint(&name, &segments[1], &segments[2..], &query),
        }
    }

    fn list(
        &self,
        tables: &BTreeMap<String, Table>,
        name: &str,
        query: &HashMap<String, String>,
    ) -> HttpResponse {
        let table = &tables[name];
        let mut rows: Vec<Map<String, Value>> = table
            .rows
            .keys()
            .filter_map(|id| detail(tables, name, *id))
            .collect();

        for (key, wanted) in query {
            if matches!(key.as_str(), "limit" | "offset" | "order_by" | "format") {
                continue;
            }
            let (field, op) = key.split_once("__").unwrap_or((key.as_str(), "exact"));
            if table.field(field).is_none() {
                return HttpResponse::with_body(400, json!({"error": format!("bad filter {key}")}));
            }
            rows.retain(|row| matches(tables, row, field, op, wanted));
        }

        if let Some(order_by) = query.get("order_by") {
            let keys: Vec<&str> = order_by.split(',').collect();
            rows.sort_by(|a, b| {
                keys.iter().fold(Ordering::Equal, |acc, key| {
                    acc.then_with(|| {
                        let (field, descending) = key
                            .strip_prefix('-')
                            .map_or((*key, false), |f| (f, true));
                        let ord = compare(&a[field], &b[field]);
                        if descending {
                            ord.reverse()
                        } else {
                            ord
                        }
                    })
                })
            });
        }

        let total = rows.len();
        let offset: usize = query.get("offset").and_then(|o| o.parse().ok()).unwrap_or(0);
        let limit = match query.get("limit").and_then(|l| l.parse::<usize>().ok()) {
            Some(0) => self.max_limit,
            Some(limit) => limit.min(self.max_limit),
            None => DEFAULT_LIMIT.min(self.max_limit),
        };
        let objects: Vec<Value> = rows
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(Value::Object)
            .collect();
        let end = offset + objects.len();
        let list_endpoint = format!("{PREFIX}{name}/");
        let next = (end < total)
            .then(|| format!("{list_endpoint}?limit={limit}&offset={end}"));
        let previous = (offset > 0).then(|| {
            format!(
                "{list_endpoint}?limit={limit}&offset={}",
                offset.saturating_sub(limit)
            )
        });

        HttpResponse::with_body(
            200,
            json!({
                "meta": {
                    "limit": limit,
                    "offset": offset,
                    "total_count": total,
                    "next": next,
                    "previous": previous,
                },
                "objects": objects,
            }),
        )
    }
}

impl Transport for FakeApi {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        Ok(self.handle(request))
    }
}

/// A factory without credentials.
pub fn factory(api: &Arc<FakeApi>) -> ResourceFactory {
    let config = ApiConfig::new(ApiRoot::new(ROOT).expect("valid root"));
    ResourceFactory::with_transport(config, Arc::clone(api) as Arc<dyn Transport>)
}

/// A factory whose resource types all carry the test user's API key.
pub fn authed_factory(api: &Arc<FakeApi>) -> ResourceFactory {
    let factory = factory(api);
    factory.set_auth(Some(Arc::new(ApiKeyAuth::new(USERNAME, API_KEY))));
    factory
}

pub fn uri(resource: &str, id: i64) -> String {
    format!("{PREFIX}{resource}/{id}/")
}

// ============================================================================
// Request handling
// ============================================================================

fn not_found() -> HttpResponse {
    HttpResponse::with_body(404, json!({}))
}

fn authorized(request: &HttpRequest) -> bool {
    request.headers.get("Authorization").map(String::as_str)
        == Some(&*format!("ApiKey {USERNAME}:{API_KEY}"))
}

fn method_allowed(table: &Table, level: &str, method: HttpMethod) -> bool {
    table.schema[format!("allowed_{level}_http_methods")]
        .as_array()
        .is_some_and(|methods| methods.iter().any(|m| m == method.as_str()))
}

fn listing(tables: &BTreeMap<String, Table>) -> HttpResponse {
    let listing: Map<String, Value> = tables
        .keys()
        .map(|name| {
            (
                name.clone(),
                json!({
                    "list_endpoint": format!("{PREFIX}{name}/"),
                    "schema": format!("{PREFIX}{name}/schema/"),
                }),
            )
        })
        .collect();
    HttpResponse::with_body(200, Value::Object(listing))
}

/// Renders a row with its URI and computed fields.
fn detail(tables: &BTreeMap<String, Table>, name: &str, id: i64) -> Option<Map<String, Value>> {
    let mut row = tables.get(name)?.rows.get(&id)?.clone();
    let own_uri = uri(name, id);
    if name == "tree" {
        let children: Vec<Value> = tables[name]
            .rows
            .iter()
            .filter(|(_, child)| {
                child.get("parent").and_then(Value::as_str) == Some(own_uri.as_str())
            })
            .map(|(child_id, _)| Value::String(uri(name, *child_id)))
            .collect();
        row.insert("children".to_string(), Value::Array(children));
    }
    row.insert("resource_uri".to_string(), Value::String(own_uri));
    Some(row)
}

fn id_of(uri: &str) -> Option<i64> {
    uri.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

fn create(
    tables: &mut BTreeMap<String, Table>,
    name: &str,
    body: Option<&Value>,
) -> HttpResponse {
    let Some(fields) = body.and_then(Value::as_object) else {
        return HttpResponse::with_body(400, json!({"error": "expected an object"}));
    };
    let id = match insert_row(tables, name, fields) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match tables[name].reply {
        CreateReply::Location => {
            let mut headers = HashMap::new();
            headers.insert(
                "Location".to_string(),
                vec![format!("{ORIGIN}{}", uri(name, id))],
            );
            HttpResponse::new(201, headers, json!({}))
        }
        CreateReply::Body => HttpResponse::with_body(
            201,
            detail(tables, name, id).map_or(Value::Null, Value::Object),
        ),
        CreateReply::Nothing => HttpResponse::with_body(201, json!({})),
    }
}

fn insert_row(
    tables: &mut BTreeMap<String, Table>,
    name: &str,
    fields: &Map<String, Value>,
) -> Result<i64, HttpResponse> {
    let table = tables.get_mut(name).ok_or_else(not_found)?;
    let mut row = Map::new();
    if let Some(declared) = table.schema["fields"].as_object() {
        for (field, spec) in declared {
            if matches!(field.as_str(), "id" | "resource_uri" | "children") {
                continue;
            }
            if let Some(value) = fields.get(field) {
                row.insert(field.clone(), value.clone());
                continue;
            }
            match spec.get("default") {
                Some(default) if default != NO_DEFAULT => {
                    row.insert(field.clone(), default.clone());
                }
                _ if spec["nullable"] == true => {
                    row.insert(field.clone(), Value::Null);
                }
                _ if spec["blank"] == true => {}
                _ => {
                    return Err(HttpResponse::with_body(
                        400,
                        json!({"error": format!("The '{field}' field has no data")}),
                    ));
                }
            }
        }
    }
    let id = table.next_id;
    table.next_id += 1;
    row.insert("id".to_string(), json!(id));
    table.rows.insert(id, row);

    if let Some(children) = fields.get("children").and_then(Value::as_array) {
        adopt(table, &uri(name, id), children);
    }
    Ok(id)
}

fn adopt(table: &mut Table, parent: &str, children: &[Value]) {
    for child in children.iter().filter_map(Value::as_str).filter_map(id_of) {
        if let Some(row) = table.rows.get_mut(&child) {
            row.insert("parent".to_string(), Value::String(parent.to_string()));
        }
    }
}

fn update(
    tables: &mut BTreeMap<String, Table>,
    name: &str,
    id: i64,
    body: Option<&Value>,
) -> HttpResponse {
    let Some(fields) = body.and_then(Value::as_object) else {
        return HttpResponse::with_body(400, json!({"error": "expected an object"}));
    };
    match apply_update(tables, name, id, fields) {
        Ok(()) => HttpResponse::with_body(202, json!({})),
        Err(response) => response,
    }
}

fn apply_update(
    tables: &mut BTreeMap<String, Table>,
    name: &str,
    id: i64,
    fields: &Map<String, Value>,
) -> Result<(), HttpResponse> {
    let table = tables.get_mut(name).ok_or_else(not_found)?;
    if let Some(unknown) = fields.keys().find(|f| table.field(f).is_none()) {
        return Err(HttpResponse::with_body(
            400,
            json!({"error": format!("unknown field {unknown}")}),
        ));
    }
    let row = table.rows.get_mut(&id).ok_or_else(not_found)?;
    for (field, value) in fields {
        if !matches!(field.as_str(), "id" | "resource_uri" | "children") {
            row.insert(field.clone(), value.clone());
        }
    }
    if let Some(children) = fields.get("children").and_then(Value::as_array) {
        adopt(table, &uri(name, id), children);
    }
    Ok(())
}

fn bulk(tables: &mut BTreeMap<String, Table>, name: &str, body: Option<&Value>) -> HttpResponse {
    let Some(body) = body else {
        return HttpResponse::with_body(400, json!({"error": "expected an object"}));
    };
    for object in body["objects"].as_array().into_iter().flatten() {
        let Some(fields) = object.as_object() else {
            return HttpResponse::with_body(400, json!({"error": "expected objects"}));
        };
        let result = match fields.get("resource_uri").and_then(Value::as_str).and_then(id_of) {
            Some(id) => {
                let mut fields = fields.clone();
                fields.remove("resource_uri");
                apply_update(tables, name, id, &fields)
            }
            None => insert_row(tables, name, fields).map(|_| ()),
        };
        if let Err(response) = result {
            if response.is_not_found() {
                return HttpResponse::with_body(400, json!({"error": "object in batch not found"}));
            }
            return response;
        }
    }
    for uri in body["deleted_objects"].as_array().into_iter().flatten() {
        if let (Some(id), Some(table)) = (uri.as_str().and_then(id_of), tables.get_mut(name)) {
            table.rows.remove(&id);
        }
    }
    HttpResponse::with_body(202, json!({}))
}

fn list_endpoint(
    name: &str,
    endpoint: &str,
    args: &[String],
    query: &HashMap<String, String>,
) -> HttpResponse {
    let int = |s: Option<&String>| s.and_then(|s| s.parse::<i64>().ok());
    match (name, endpoint) {
        ("tree", "add") => match (args.len(), int(args.first()), int(args.get(1))) {
            (2, Some(a), Some(b)) => HttpResponse::with_body(200, json!(a + b)),
            _ => HttpResponse::with_body(400, json!({"error": "add takes two integers"})),
        },
        ("tree", "mult") => match (int(query.get("num1")), int(query.get("num2"))) {
            (Some(a), Some(b)) => HttpResponse::with_body(200, json!(a * b)),
            _ => HttpResponse::with_body(400, json!({"error": "mult needs num1 and num2"})),
        },
        _ => not_found(),
    }
}

fn detail_endpoint(
    tables: &BTreeMap<String, Table>,
    name: &str,
    id: i64,
    endpoint: &str,
) -> HttpResponse {
    let Some(row) = detail(tables, name, id) else {
        return not_found();
    };
    match (name, endpoint) {
        ("tree", "depth") => {
            let mut depth = 0;
            let mut parent = row.get("parent").and_then(Value::as_str).and_then(id_of);
            while let Some(parent_id) = parent {
                depth += 1;
                parent = tables[name]
                    .rows
                    .get(&parent_id)
                    .and_then(|r| r.get("parent"))
                    .and_then(Value::as_str)
                    .and_then(id_of);
            }
            HttpResponse::with_body(200, json!(depth))
        }
        ("tree", "child") => {
            let child = row["children"]
                .as_array()
                .and_then(|c| c.first())
                .and_then(Value::as_str)
                .and_then(id_of)
                .and_then(|child| detail(tables, name, child));
            HttpResponse::with_body(200, child.map_or(Value::Null, Value::Object))
        }
        _ => not_found(),
    }
}

// ============================================================================
// Filtering and ordering
// ============================================================================

fn text(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => text(a).cmp(&text(b)),
    }
}

fn compare_text(value: &str, wanted: &str) -> Ordering {
    match (value.parse::<f64>(), wanted.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => value.cmp(wanted),
    }
}

fn exact(value: &Value, wanted: &str) -> bool {
    if let Value::Array(items) = value {
        return items.iter().any(|item| exact(item, wanted));
    }
    let value = text(value);
    value == wanted
        || (value.starts_with('/')
            && id_of(&value).map(|id| id.to_string()).as_deref() == Some(wanted))
}

fn matches(
    tables: &BTreeMap<String, Table>,
    row: &Map<String, Value>,
    field: &str,
    op: &str,
    wanted: &str,
) -> bool {
    let value = row.get(field).unwrap_or(&Value::Null);
    if !OPERATORS.contains(&op) {
        // Relation traversal: `parent__name=x` compares the related row's field.
        let (related_field, related_op) = op.split_once("__").unwrap_or((op, "exact"));
        let targets: Vec<&str> = match value {
            Value::String(target) => vec![target.as_str()],
            Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        return targets.into_iter().any(|target| {
            let related_type = target
                .strip_prefix(PREFIX)
                .and_then(|rest| rest.split('/').next())
                .unwrap_or_default();
            id_of(target)
                .and_then(|id| detail(tables, related_type, id))
                .is_some_and(|related| matches(tables, &related, related_field, related_op, wanted))
        });
    }

    let rendered = text(value);
    match op {
        "exact" => exact(value, wanted),
        "iexact" => rendered.to_lowercase() == wanted.to_lowercase(),
        "contains" => rendered.contains(wanted),
        "icontains" => rendered.to_lowercase().contains(&wanted.to_lowercase()),
        "startswith" => rendered.starts_with(wanted),
        "istartswith" => rendered.to_lowercase().starts_with(&wanted.to_lowercase()),
        "endswith" => rendered.ends_with(wanted),
        "gt" => compare_text(&rendered, wanted) == Ordering::Greater,
        "gte" => compare_text(&rendered, wanted) != Ordering::Less,
        "lt" => compare_text(&rendered, wanted) == Ordering::Less,
        "lte" => compare_text(&rendered, wanted) != Ordering::Greater,
        "in" => wanted.split(',').any(|w| exact(value, w)),
        "isnull" => value.is_null() == (wanted == "true"),
        _ => false,
    }
}

// ============================================================================
// Schemas
// ============================================================================

fn id_field() -> Value {
    json!({"type": "integer", "blank": true, "nullable": false, "readonly": false, "unique": true,
           "default": NO_DEFAULT, "help_text": "Integer data. Ex: 2673"})
}

fn uri_field() -> Value {
    json!({"type": "string", "blank": false, "nullable": false, "readonly": true, "unique": false,
           "default": NO_DEFAULT, "help_text": "Unicode string data. Ex: \"Hello World\""})
}

fn test_resource_schema() -> Value {
    json!({
        "fields": {
            "id": id_field(),
            "path": {"type": "string", "blank": false, "nullable": false, "readonly": false,
                     "unique": true, "default": NO_DEFAULT, "help_text": "Path of the resource"},
            "rating": {"type": "integer", "blank": false, "nullable": false, "readonly": false,
                       "unique": false, "default": 50, "help_text": "Integer data. Ex: 2673"},
            "text": {"type": "string", "blank": false, "nullable": false, "readonly": false,
                     "unique": false, "default": "", "help_text": "Unicode string data."},
            "title": {"type": "string", "blank": false, "nullable": false, "readonly": false,
                      "unique": false, "default": "", "help_text": "Unicode string data."},
            "date": {"type": "datetime", "blank": false, "nullable": true, "readonly": false,
                     "unique": false, "default": NO_DEFAULT, "help_text": "A date & time"},
            "created_by": {"type": "related", "related_type": "to_one", "blank": false,
                           "nullable": true, "readonly": false, "unique": false,
                           "default": NO_DEFAULT, "help_text": "A single related resource.",
                           "related_schema": "/test/api/v1/user/schema/"},
            "resource_uri": uri_field()
        },
        "filtering": {
            "id": 1,
            "path": ["exact", "contains", "startswith"],
            "rating": ["exact", "gt", "gte", "lt", "lte", "in"],
            "created_by": 2
        },
        "ordering": ["rating", "path", "id"],
        "allowed_list_http_methods": ["get", "post", "put", "patch", "delete"],
        "allowed_detail_http_methods": ["get", "post", "put", "patch", "delete"],
        "default_format": "application/json",
        "default_limit": DEFAULT_LIMIT
    })
}

fn tree_schema() -> Value {
    json!({
        "fields": {
            "id": id_field(),
            "name": {"type": "string", "blank": false, "nullable": false, "readonly": false,
                     "unique": false, "default": NO_DEFAULT, "help_text": "Name of the node"},
            "parent": {"type": "related", "related_type": "to_one", "blank": false,
                       "nullable": true, "readonly": false, "unique": false,
                       "default": NO_DEFAULT, "related_schema": "/test/api/v1/tree/schema/"},
            "children": {"type": "related", "related_type": "to_many", "blank": true,
                         "nullable": false, "readonly": false, "unique": false,
                         "default": NO_DEFAULT, "related_schema": "/test/api/v1/tree/schema/"},
            "resource_uri": uri_field()
        },
        "filtering": {
            "id": 1,
            "name": ["exact", "contains", "startswith"],
            "parent": 2,
            "children": 2
        },
        "ordering": ["name", "id"],
        "allowed_list_http_methods": ["get", "post", "put", "patch", "delete"],
        "allowed_detail_http_methods": ["get", "post", "put", "patch", "delete"],
        "default_limit": DEFAULT_LIMIT,
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

fn user_schema() -> Value {
    json!({
        "fields": {
            "id": id_field(),
            "username": {"type": "string", "blank": false, "nullable": false, "readonly": false,
                         "unique": true, "default": NO_DEFAULT, "help_text": "Login name"},
            "email": {"type": "string", "blank": true, "nullable": false, "readonly": false,
                      "unique": false, "default": "", "help_text": "Email address"},
            "resource_uri": uri_field()
        },
        "filtering": {"id": 1, "username": ["exact"]},
        "ordering": [],
        "allowed_list_http_methods": ["get"],
        "allowed_detail_http_methods": ["get"],
        "default_limit": DEFAULT_LIMIT
    })
}

fn no_filter_schema() -> Value {
    json!({
        "fields": {
            "id": id_field(),
            "path": {"type": "string", "blank": false, "nullable": false, "readonly": false,
                     "unique": false, "default": NO_DEFAULT, "help_text": "Unicode string data."},
            "resource_uri": uri_field()
        },
        "filtering": {},
        "allowed_list_http_methods": ["get", "post", "delete"],
        "allowed_detail_http_methods": ["get", "delete"],
        "default_limit": DEFAULT_LIMIT
    })
}
