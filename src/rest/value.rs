//! Typed field values.
//!
//! [`FieldValue`] is what resource fields hold locally. Conversions from the
//! common Rust types make call sites read naturally:
//!
//! ```rust
//! use tasty_orm::rest::FieldValue;
//!
//! assert_eq!(FieldValue::from(42), FieldValue::Int(42));
//! assert_eq!(FieldValue::from("tree"), FieldValue::Text("tree".to_string()));
//! assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
//! ```

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::rest::Resource;

/// Datetimes travel as ISO-8601 without a timezone.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// The value of one resource field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    /// Dicts, lists and anything else kept as raw JSON.
    Json(Value),
    /// A to-one relation.
    Related(Resource),
    /// A to-many relation, in server order.
    RelatedMany(Vec<Resource>),
    /// A list of plain values, e.g. for `__in` filters.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Decodes a JSON value without schema information.
    ///
    /// Objects stay [`Json`](Self::Json); arrays become [`List`](Self::List).
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Int),
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Object(_) => Self::Json(value.clone()),
        }
    }

    /// Parses a wire datetime, returning `None` if it is not one.
    #[must_use]
    pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).ok()
    }

    /// Encodes the value for a request body. Resources become their URIs.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::Text(s) => Value::String(s.clone()),
            Self::DateTime(dt) => Value::String(dt.format(DATETIME_FORMAT).to_string()),
            Self::Json(v) => v.clone(),
            Self::Related(r) => Value::String(r.uri().to_string()),
            Self::RelatedMany(rs) => rs
                .iter()
                .map(|r| Value::String(r.uri().to_string()))
                .collect(),
            Self::List(items) => items.iter().map(Self::to_json).collect(),
        }
    }

    /// Encodes the value as a query parameter. Lists are comma-joined.
    #[must_use]
    pub fn to_query_value(&self) -> String {
        match self {
            Self::Null => "None".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
            Self::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
            Self::Json(Value::String(s)) => s.clone(),
            Self::Json(v) => v.to_string(),
            Self::Related(r) => r.uri().to_string(),
            Self::RelatedMany(rs) => rs.iter().map(Resource::uri).collect::<Vec<_>>().join(","),
            Self::List(items) => items
                .iter()
                .map(Self::to_query_value)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Short description of the variant, for error messages.
    #[must_use]
    pub fn kind(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(_) => "a boolean".to_string(),
            Self::Int(_) => "an integer".to_string(),
            Self::Float(_) => "a float".to_string(),
            Self::Text(_) => "text".to_string(),
            Self::DateTime(_) => "a datetime".to_string(),
            Self::Json(_) => "a JSON value".to_string(),
            Self::Related(r) => format!("a '{}' resource", r.resource_type().name()),
            Self::RelatedMany(_) => "a list of resources".to_string(),
            Self::List(_) => "a list".to_string(),
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float; integers convert.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_datetime(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::Related(r) => Some(r),
            _ => None,
        }
    }

    /// Consumes the value, returning the related resource if there is one.
    #[must_use]
    pub fn into_resource(self) -> Option<Resource> {
        match self {
            Self::Related(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_resources(&self) -> Option<&[Resource]> {
        match self {
            Self::RelatedMany(rs) => Some(rs),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<Resource> for FieldValue {
    fn from(value: Resource) -> Self {
        Self::Related(value)
    }
}

impl From<&Resource> for FieldValue {
    fn from(value: &Resource) -> Self {
        Self::Related(value.clone())
    }
}

impl From<Vec<Resource>> for FieldValue {
    fn from(value: Vec<Resource>) -> Self {
        Self::RelatedMany(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        Self::List(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
