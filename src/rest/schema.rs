//! Schema documents and the per-root schema cache.
//!
//! Each resource type publishes a schema describing its fields, which
//! filters each field accepts, which HTTP methods are allowed at list and
//! detail level, and any custom endpoints. [`SchemaCache`] fetches each
//! document once and serves it from memory afterwards.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Deserialize;

use crate::auth::SharedAuth;
use crate::clients::{HttpMethod, RestClient};
use crate::config::ResourceName;
use crate::rest::ResourceError;

/// Filter operators understood when a field allows every operator.
pub const QUERY_TERMS: &[&str] = &[
    "exact",
    "iexact",
    "contains",
    "icontains",
    "in",
    "gt",
    "gte",
    "lt",
    "lte",
    "startswith",
    "istartswith",
    "endswith",
    "iendswith",
    "range",
    "year",
    "month",
    "day",
    "week_day",
    "isnull",
    "search",
    "regex",
    "iregex",
];

/// The `default` value tastypie reports for fields without one.
pub const NO_DEFAULT: &str = "No default provided.";

/// The type tag of a schema field.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Decimal,
    Boolean,
    DateTime,
    Date,
    Time,
    Dict,
    List,
    Related,
    /// Any tag this client does not interpret; values pass through as JSON.
    Other(String),
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "string" => Self::String,
            "integer" => Self::Integer,
            "float" => Self::Float,
            "decimal" => Self::Decimal,
            "boolean" => Self::Boolean,
            "datetime" => Self::DateTime,
            "date" => Self::Date,
            "time" => Self::Time,
            "dict" => Self::Dict,
            "list" => Self::List,
            "related" => Self::Related,
            _ => Self::Other(tag),
        }
    }
}

impl FieldType {
    /// Returns the wire tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::DateTime => "datetime",
            Self::Date => "date",
            Self::Time => "time",
            Self::Dict => "dict",
            Self::List => "list",
            Self::Related => "related",
            Self::Other(tag) => tag,
        }
    }
}

/// Cardinality of a related field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedKind {
    /// The field holds one resource URI.
    ToOne,
    /// The field holds an ordered list of resource URIs.
    ToMany,
}

/// One field of a [`SchemaDoc`].
#[derive(Clone, Debug, Deserialize)]
pub struct FieldSchema {
    /// The field's type tag.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the server ignores writes to this field.
    #[serde(default)]
    pub readonly: bool,
    /// Whether `null` is an acceptable value.
    #[serde(default)]
    pub nullable: bool,
    /// Whether the field may be omitted.
    #[serde(default)]
    pub blank: bool,
    /// Whether values are unique across the collection.
    #[serde(default)]
    pub unique: bool,
    /// The server-side default, if any.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    /// Human-readable description.
    #[serde(default)]
    pub help_text: String,
    /// Cardinality, for related fields.
    #[serde(default)]
    pub related_type: Option<RelatedKind>,
    /// Schema URI of the target type, for related fields.
    #[serde(default)]
    pub related_schema: Option<String>,
}

impl FieldSchema {
    /// Returns the related cardinality if this is a related field.
    #[must_use]
    pub fn relation(&self) -> Option<RelatedKind> {
        if self.field_type == FieldType::Related {
            Some(self.related_type.unwrap_or(RelatedKind::ToOne))
        } else {
            None
        }
    }

    /// Returns the target type name of a related field.
    ///
    /// The name is the second-to-last path segment of `related_schema`
    /// (`/api/v1/user/schema/` points at `user`).
    #[must_use]
    pub fn target_type(&self) -> Option<&str> {
        let schema = self.related_schema.as_deref()?;
        let mut segments = schema.split('/').filter(|s| !s.is_empty()).rev();
        segments.next()?;
        segments.next()
    }

    /// Returns `true` if the server supplies a value when none is sent.
    #[must_use]
    pub fn has_default(&self) -> bool {
        match &self.default {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::String(s)) => s != NO_DEFAULT,
            Some(_) => true,
        }
    }

    /// Returns `true` if a create must supply this field.
    #[must_use]
    pub fn is_required(&self) -> bool {
        !self.nullable && !self.blank && !self.readonly && !self.has_default()
    }
}

/// Which filter operators a field accepts.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FilterRule {
    /// `1` allows every operator; `2` also allows filtering through a
    /// related field on the target type's own filterable fields.
    All(u8),
    /// Only these operators.
    Only(Vec<String>),
}

impl FilterRule {
    /// Returns `true` if the operator `op` is accepted.
    #[must_use]
    pub fn allows(&self, op: &str) -> bool {
        match self {
            Self::Only(ops) => ops.iter().any(|o| o == op),
            Self::All(_) => QUERY_TERMS.contains(&op),
        }
    }

    /// Returns `true` if lookups may continue into a related type.
    #[must_use]
    pub const fn follows_relations(&self) -> bool {
        matches!(self, Self::All(level) if *level >= 2)
    }
}

/// A custom endpoint declared by a schema.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EndpointSchema {
    /// Type tags of the positional arguments, in order.
    #[serde(default)]
    pub args: Vec<String>,
    /// Names of the required keyword arguments.
    #[serde(default)]
    pub kwargs: Vec<String>,
    /// Type tag of the returned value.
    #[serde(rename = "return", default)]
    pub returns: Option<String>,
    /// Type returned when `returns` is `related`; defaults to the owner.
    #[serde(default)]
    pub related_resource: Option<String>,
}

impl EndpointSchema {
    /// Returns `true` if the endpoint returns a resource representation.
    #[must_use]
    pub fn returns_resource(&self) -> bool {
        self.returns.as_deref() == Some("related")
    }
}

/// The schema document of one resource type.
///
/// Immutable once fetched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SchemaDoc {
    /// Declared fields, by name.
    pub fields: HashMap<String, FieldSchema>,
    /// Filter rules, by field name. Fields not listed cannot be filtered.
    #[serde(default)]
    pub filtering: HashMap<String, FilterRule>,
    /// Fields the server can order by.
    #[serde(default)]
    pub ordering: Vec<String>,
    /// Methods allowed on the list endpoint (lowercase).
    #[serde(default)]
    pub allowed_list_http_methods: Vec<String>,
    /// Methods allowed on detail endpoints (lowercase).
    #[serde(default)]
    pub allowed_detail_http_methods: Vec<String>,
    /// The server's page size.
    #[serde(default)]
    pub default_limit: Option<u32>,
    /// Custom endpoints on the list URI.
    #[serde(default)]
    pub list_endpoints: HashMap<String, EndpointSchema>,
    /// Custom endpoints on each detail URI.
    #[serde(default)]
    pub detail_endpoints: HashMap<String, EndpointSchema>,
    /// Server-relative list endpoint, filled in from the root listing.
    #[serde(skip)]
    pub list_endpoint: String,
}

impl SchemaDoc {
    /// Parses a schema document from a response body.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if the body is not a schema document.
    pub fn from_json(
        list_endpoint: impl Into<String>,
        body: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        let mut doc: Self = serde_json::from_value(body)?;
        doc.list_endpoint = list_endpoint.into();
        Ok(doc)
    }

    /// Returns the schema of a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    /// Returns `true` if `op` may be applied to `field` in a filter.
    #[must_use]
    pub fn allows_filter(&self, field: &str, op: &str) -> bool {
        self.filter_rule(field).is_some_and(|rule| rule.allows(op))
    }

    /// Returns the filter rule of a declared field.
    #[must_use]
    pub fn filter_rule(&self, field: &str) -> Option<&FilterRule> {
        if self.fields.contains_key(field) {
            self.filtering.get(field)
        } else {
            None
        }
    }

    /// Returns `true` if `method` is allowed on the list endpoint.
    #[must_use]
    pub fn allows_list_method(&self, method: HttpMethod) -> bool {
        self.allowed_list_http_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method.as_str()))
    }

    /// Returns `true` if `method` is allowed on detail endpoints.
    #[must_use]
    pub fn allows_detail_method(&self, method: HttpMethod) -> bool {
        self.allowed_detail_http_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method.as_str()))
    }

    /// Returns the names of fields a create must supply, sorted.
    #[must_use]
    pub fn required_fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .fields
            .iter()
            .filter(|(name, field)| name.as_str() != "resource_uri" && field.is_required())
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Renders a human-readable summary of the schema.
    #[must_use]
    pub fn help(&self, name: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{name} ({})", self.list_endpoint);
        let _ = writeln!(out, "  list methods: {}", self.allowed_list_http_methods.join(", "));
        let _ = writeln!(
            out,
            "  detail methods: {}",
            self.allowed_detail_http_methods.join(", ")
        );

        let mut names: Vec<&String> = self.fields.keys().collect();
        names.sort();
        let _ = writeln!(out, "  fields:");
        for field_name in names {
            let field = &self.fields[field_name];
            let mut line = format!("    {field_name}: {}", field.field_type.as_str());
            if let Some(target) = field.target_type() {
                let kind = match field.relation() {
                    Some(RelatedKind::ToMany) => "many",
                    _ => "one",
                };
                let _ = write!(line, " -> {target} ({kind})");
            }
            if field.readonly {
                line.push_str(" [read-only]");
            }
            if field.is_required() && field_name != "resource_uri" {
                line.push_str(" [required]");
            }
            match self.filtering.get(field_name) {
                Some(FilterRule::Only(ops)) => {
                    let _ = write!(line, " filters: {}", ops.join(", "));
                }
                Some(FilterRule::All(_)) => line.push_str(" filters: all"),
                None => {}
            }
            if !field.help_text.is_empty() {
                let _ = write!(line, " ({})", field.help_text);
            }
            let _ = writeln!(out, "{line}");
        }

        for (label, endpoints) in [
            ("list endpoints", &self.list_endpoints),
            ("detail endpoints", &self.detail_endpoints),
        ] {
            if endpoints.is_empty() {
                continue;
            }
            let mut names: Vec<&String> = endpoints.keys().collect();
            names.sort();
            let _ = writeln!(out, "  {label}:");
            for endpoint_name in names {
                let endpoint = &endpoints[endpoint_name];
                let _ = writeln!(
                    out,
                    "    {endpoint_name}({}; {}) -> {}",
                    endpoint.args.join(", "),
                    endpoint.kwargs.join(", "),
                    endpoint.returns.as_deref().unwrap_or("?")
                );
            }
        }
        out
    }
}

/// One entry of the API root listing.
#[derive(Clone, Debug, Deserialize)]
pub struct ListingEntry {
    /// The type's list endpoint.
    pub list_endpoint: String,
    /// The type's schema URI.
    pub schema: String,
}

type Listing = HashMap<String, ListingEntry>;

/// Memoizes the root listing and schema documents per API root.
///
/// Entries are never invalidated. Concurrent first fetches of the same
/// schema may both hit the network; the last one to finish is kept.
#[derive(Debug, Default)]
pub struct SchemaCache {
    listings: RwLock<HashMap<String, Arc<Listing>>>,
    schemas: RwLock<HashMap<(String, String), Arc<SchemaDoc>>>,
}

// Verify SchemaCache is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SchemaCache>();
};

impl SchemaCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the schema of `name`, fetching it on first use.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::CannotConnectToAddress`] if the root is unreachable
    ///   or does not answer with a resource listing
    /// - [`ResourceError::NonExistantResource`] if the root does not list `name`
    /// - [`ResourceError::UnexpectedResponse`] if the schema is malformed
    pub fn schema_for(
        &self,
        client: &RestClient,
        name: &ResourceName,
        auth: Option<&SharedAuth>,
    ) -> Result<Arc<SchemaDoc>, ResourceError> {
        let root = client.api_root().to_string();
        let key = (root.clone(), name.to_string());

        if let Some(doc) = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            tracing::debug!(resource = %name, "schema served from cache");
            return Ok(Arc::clone(doc));
        }

        let listing = self.listing(client, auth)?;
        let entry = listing
            .get(name.as_ref())
            .ok_or_else(|| ResourceError::NonExistantResource {
                name: name.to_string(),
                root: root.clone(),
            })?;

        let response = client.get(&entry.schema, None, auth)?;
        if !response.is_ok() {
            return Err(ResourceError::from_http_response(&response));
        }
        let list_endpoint = client.api_root().relative(&entry.list_endpoint).to_string();
        let doc = SchemaDoc::from_json(list_endpoint, response.body)
            .map_err(|e| ResourceError::unexpected(&entry.schema, e.to_string()))?;
        let doc = Arc::new(doc);

        tracing::debug!(resource = %name, fields = doc.fields.len(), "schema fetched");

        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::clone(&doc));
        Ok(doc)
    }

    fn listing(
        &self,
        client: &RestClient,
        auth: Option<&SharedAuth>,
    ) -> Result<Arc<Listing>, ResourceError> {
        let root = client.api_root().to_string();
        if let Some(listing) = self
            .listings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&root)
        {
            return Ok(Arc::clone(listing));
        }

        let url = format!("{root}/");
        let response = client.get(&url, None, auth).map_err(|e| {
            if e.is_connection() {
                ResourceError::CannotConnectToAddress {
                    url: url.clone(),
                    message: e.to_string(),
                }
            } else {
                ResourceError::Http(e)
            }
        })?;
        if !response.is_ok() {
            return Err(ResourceError::CannotConnectToAddress {
                url,
                message: format!("HTTP {}", response.code),
            });
        }
        let listing: Listing = serde_json::from_value(response.body).map_err(|e| {
            ResourceError::CannotConnectToAddress {
                url: url.clone(),
                message: format!("not a resource listing: {e}"),
            }
        })?;
        let listing = Arc::new(listing);

        tracing::debug!(root = %root, types = listing.len(), "root listing fetched");

        self.listings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(root, Arc::clone(&listing));
        Ok(listing)
    }
}
