//! The keyword filter DSL and its translation into query parameters.
//!
//! A filter keyword is either a bare field name (`name`, meaning `exact`) or
//! a field name followed by an operator (`rating__gt`). Keywords are
//! validated against the schema before anything is sent:
//!
//! 1. the part before the first `__` must be a field the schema lets you
//!    filter on, matched exactly;
//! 2. the operator (default `exact`) must be allowed for that field.
//!
//! A related field whose rule allows relation lookups may instead be
//! followed by a keyword for the target type (`parent__name__startswith`),
//! which is checked the same way against the target's schema.
//!
//! `limit` and `order_by` are reserved: they control the query itself and
//! are never treated as field filters.
//!
//! # Example
//!
//! ```rust
//! use tasty_orm::rest::Filters;
//!
//! let filters = Filters::new()
//!     .with("name__startswith", "tree")
//!     .with("depth_hint__gt", 1)
//!     .order_by("-name")
//!     .limit(10);
//!
//! assert_eq!(filters.get_limit(), Some(10));
//! assert_eq!(filters.get_order_by(), ["-name"]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::rest::{FieldSchema, FieldValue, ResourceError, SchemaDoc};

const LOOKUP_SEP: &str = "__";

/// Keyword filters plus the reserved `limit` and `order_by` options.
#[derive(Clone, Debug, Default)]
pub struct Filters {
    terms: Vec<(String, FieldValue)>,
    limit: Option<u32>,
    order_by: Vec<String>,
}

impl Filters {
    /// Creates an empty filter set, matching everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter keyword.
    ///
    /// The reserved keywords `limit` (integer) and `order_by` (text, or list
    /// of text) are routed to [`limit`](Self::limit) and
    /// [`order_by`](Self::order_by).
    #[must_use]
    pub fn with(mut self, keyword: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let keyword = keyword.into();
        let value = value.into();
        match (keyword.as_str(), &value) {
            ("limit", FieldValue::Int(n)) => {
                self.limit = Some(u32::try_from(*n).unwrap_or(0));
            }
            ("order_by", FieldValue::Text(key)) => self.order_by.push(key.clone()),
            ("order_by", FieldValue::List(keys)) => {
                self.order_by
                    .extend(keys.iter().map(FieldValue::to_query_value));
            }
            _ => self.terms.push((keyword, value)),
        }
        self
    }

    /// Caps the total number of results.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Adds a sort key: `field` ascending, `-field` descending.
    #[must_use]
    pub fn order_by(mut self, key: impl Into<String>) -> Self {
        self.order_by.push(key.into());
        self
    }

    /// Returns the result cap, if any.
    #[must_use]
    pub const fn get_limit(&self) -> Option<u32> {
        self.limit
    }

    /// Returns the sort keys in order.
    #[must_use]
    pub fn get_order_by(&self) -> &[String] {
        &self.order_by
    }

    /// Returns `true` if no field filters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the field filters in insertion order.
    #[must_use]
    pub fn terms(&self) -> &[(String, FieldValue)] {
        &self.terms
    }

    /// Translates the field filters into query parameters.
    ///
    /// Related values become URIs and lists are comma-joined. `limit` and
    /// `order_by` are not included. `related` returns the schema a related
    /// field points at; it is only called for keywords that continue past a
    /// related field.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::FilterNotAllowedForField`] for a keyword whose
    /// field is unknown or not filterable, or whose operator is not allowed,
    /// on this type or on any type it passes through. Errors from `related`
    /// are returned as is.
    pub fn translate<F>(
        &self,
        resource: &str,
        schema: &SchemaDoc,
        related: F,
    ) -> Result<HashMap<String, String>, ResourceError>
    where
        F: Fn(&FieldSchema) -> Result<Arc<SchemaDoc>, ResourceError>,
    {
        let mut query = HashMap::with_capacity(self.terms.len());
        for (keyword, value) in &self.terms {
            if !lookup_allowed(schema, keyword, &related)? {
                return Err(ResourceError::FilterNotAllowedForField {
                    resource: resource.to_string(),
                    filter: keyword.clone(),
                });
            }
            query.insert(keyword.clone(), value.to_query_value());
        }
        Ok(query)
    }
}

fn lookup_allowed<F>(
    schema: &SchemaDoc,
    keyword: &str,
    related: &F,
) -> Result<bool, ResourceError>
where
    F: Fn(&FieldSchema) -> Result<Arc<SchemaDoc>, ResourceError>,
{
    let (field, rest) = match keyword.split_once(LOOKUP_SEP) {
        Some((field, rest)) => (field, Some(rest)),
        None => (keyword, None),
    };
    let Some(rule) = schema.filter_rule(field) else {
        return Ok(false);
    };
    if rule.allows(rest.unwrap_or("exact")) {
        return Ok(true);
    }
    let declared = schema.field(field).filter(|f| f.relation().is_some());
    match (rest, declared) {
        (Some(rest), Some(declared)) if rule.follows_relations() => {
            let target = related(declared)?;
            lookup_allowed(&target, rest, related)
        }
        _ => Ok(false),
    }
}

/// Formats sent query parameters for error messages, sorted by key.
pub(crate) fn describe_query(query: &HashMap<String, String>) -> String {
    let mut pairs: Vec<_> = query.iter().collect();
    pairs.sort();
    let pairs: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{{{}}}", pairs.join(", "))
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |filters, (k, v)| filters.with(k, v))
    }
}

impl fmt::Display for Filters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (keyword, value)) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{keyword}={}", value.to_query_value())?;
        }
        f.write_str("}")
    }
}
