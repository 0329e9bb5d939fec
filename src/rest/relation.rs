//! Conversion between wire values and local field values.
//!
//! Related fields arrive either as URIs or as fully embedded objects. Both
//! decode to a [`Resource`] bound to the target type's own binding, so the
//! related resource follows that type's current caching and auth settings.
//!
//! Outgoing related values must be resources of the target type, or scalar
//! primary keys (integer or text) which are turned into the target's detail
//! URI. A to-many field accepts a list mixing both forms. Anything else is a
//! [`ResourceError::BadRelatedType`].

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::rest::schema::{FieldSchema, FieldType, RelatedKind};
use crate::rest::{FieldValue, Resource, ResourceError, ResourceType};

/// Decodes every key of an object representation.
///
/// Keys the schema does not declare are decoded without type information.
pub(crate) fn decode_object(
    binding: &Arc<ResourceType>,
    object: &Map<String, Value>,
) -> Result<HashMap<String, FieldValue>, ResourceError> {
    object
        .iter()
        .map(|(name, value)| {
            let decoded = match binding.schema().field(name) {
                Some(field) => decode_value(binding, field, value)?,
                None => FieldValue::from_json(value),
            };
            Ok((name.clone(), decoded))
        })
        .collect()
}

/// Decodes one field value according to its schema.
pub(crate) fn decode_value(
    binding: &Arc<ResourceType>,
    field: &FieldSchema,
    value: &Value,
) -> Result<FieldValue, ResourceError> {
    let Some(kind) = field.relation() else {
        return Ok(decode_scalar(&field.field_type, value));
    };
    if value.is_null() {
        return Ok(FieldValue::Null);
    }
    let target = binding.related_binding(field)?;
    match kind {
        RelatedKind::ToOne => decode_resource(&target, value).map(FieldValue::Related),
        RelatedKind::ToMany => {
            let items = value.as_array().ok_or_else(|| {
                ResourceError::unexpected(
                    binding.list_endpoint(),
                    format!("expected a list of '{}' resources, got {value}", target.name()),
                )
            })?;
            items
                .iter()
                .map(|item| decode_resource(&target, item))
                .collect::<Result<Vec<_>, _>>()
                .map(FieldValue::RelatedMany)
        }
    }
}

/// Decodes a scalar by its type tag. Unparseable datetimes stay text.
pub(crate) fn decode_scalar(field_type: &FieldType, value: &Value) -> FieldValue {
    match (field_type, value) {
        (_, Value::Null) => FieldValue::Null,
        (FieldType::DateTime, Value::String(text)) => FieldValue::parse_datetime(text)
            .map_or_else(|| FieldValue::Text(text.clone()), FieldValue::DateTime),
        (FieldType::Dict | FieldType::List | FieldType::Other(_), _) => {
            FieldValue::Json(value.clone())
        }
        _ => FieldValue::from_json(value),
    }
}

/// Decodes a URI or an embedded object into a resource of `target`.
pub(crate) fn decode_resource(
    target: &Arc<ResourceType>,
    value: &Value,
) -> Result<Resource, ResourceError> {
    match value {
        Value::String(uri) => Ok(Resource::lazy(Arc::clone(target), uri)),
        Value::Object(object) => Resource::from_object(target, object),
        other => Err(ResourceError::unexpected(
            target.list_endpoint(),
            format!("expected a '{}' URI or object, got {other}", target.name()),
        )),
    }
}

/// Validates an outgoing value for a field and converts related values to
/// their canonical form.
pub(crate) fn normalize(
    binding: &Arc<ResourceType>,
    name: &str,
    field: &FieldSchema,
    value: FieldValue,
) -> Result<FieldValue, ResourceError> {
    let Some(kind) = field.relation() else {
        return Ok(value);
    };
    if value.is_null() {
        return Ok(FieldValue::Null);
    }
    let expected = field.target_type().unwrap_or_default();
    let bad = |value: &FieldValue| ResourceError::BadRelatedType {
        field: name.to_string(),
        expected: expected.to_string(),
        got: value.kind(),
    };

    match (kind, value) {
        (
            RelatedKind::ToOne,
            value @ (FieldValue::Related(_) | FieldValue::Int(_) | FieldValue::Text(_)),
        ) => reference(binding, field, expected, &value)
            .ok_or_else(|| bad(&value))?
            .map(FieldValue::Related),
        (RelatedKind::ToMany, FieldValue::RelatedMany(resources)) => {
            if let Some(wrong) = resources.iter().find(|r| r.resource_type().name() != expected) {
                return Err(bad(&FieldValue::Related(wrong.clone())));
            }
            Ok(FieldValue::RelatedMany(resources))
        }
        (RelatedKind::ToMany, FieldValue::List(items)) => items
            .iter()
            .map(|item| reference(binding, field, expected, item).ok_or_else(|| bad(item))?)
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::RelatedMany),
        (_, value) => Err(bad(&value)),
    }
}

/// Resolves one related reference. `None` means the value has the wrong
/// kind or type.
fn reference(
    binding: &Arc<ResourceType>,
    field: &FieldSchema,
    expected: &str,
    value: &FieldValue,
) -> Option<Result<Resource, ResourceError>> {
    match value {
        FieldValue::Related(resource) if resource.resource_type().name() == expected => {
            Some(Ok(resource.clone()))
        }
        FieldValue::Int(_) | FieldValue::Text(_) => Some(
            binding
                .related_binding(field)
                .map(|target| primary_key_reference(&target, value)),
        ),
        _ => None,
    }
}

fn primary_key_reference(target: &Arc<ResourceType>, key: &FieldValue) -> Resource {
    let key = key.to_query_value();
    let relative = target.client().api_root().relative(&key);
    if relative.starts_with(target.list_endpoint()) {
        return Resource::lazy(Arc::clone(target), relative);
    }
    let uri = format!(
        "{}{}/",
        target.list_endpoint(),
        urlencoding::encode(key.trim_matches('/'))
    );
    Resource::lazy(Arc::clone(target), &uri)
}

/// Encodes local field values into a request body.
pub(crate) fn encode_fields<'a>(
    fields: impl IntoIterator<Item = (&'a String, &'a FieldValue)>,
) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect()
}
