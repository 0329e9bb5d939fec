//! Custom endpoints declared by the schema.
//!
//! An endpoint is called as `GET {base}{name}/{arg}/.../?{kwarg}={value}`,
//! where `base` is the list endpoint or a resource URI. Its declared return
//! type decides how the body is decoded; `related` returns decode to a
//! [`Resource`](crate::rest::Resource) of the declared related type (or the
//! calling type if none is declared).

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::rest::relation::{decode_resource, decode_scalar};
use crate::rest::schema::{EndpointSchema, FieldType};
use crate::rest::{FieldValue, ResourceError, ResourceType};

pub(crate) fn invoke(
    binding: &Arc<ResourceType>,
    base: &str,
    name: &str,
    declared: &EndpointSchema,
    args: &[FieldValue],
    kwargs: &[(&str, FieldValue)],
) -> Result<FieldValue, ResourceError> {
    check_arity(name, declared, args, kwargs)?;

    let mut url = format!("{base}{name}/");
    for arg in args {
        url.push_str(&urlencoding::encode(&arg.to_query_value()));
        url.push('/');
    }
    let query: HashMap<String, String> = kwargs
        .iter()
        .filter(|(key, _)| declared.kwargs.iter().any(|k| k == key))
        .map(|(key, value)| ((*key).to_string(), value.to_query_value()))
        .collect();

    tracing::debug!(resource = binding.name(), endpoint = name, "calling endpoint");
    let response = binding
        .client()
        .get(&url, Some(query), binding.auth().as_ref())?;

    if response.is_not_found() {
        return Err(if base == binding.list_endpoint() {
            ResourceError::EndpointNotFound {
                resource: binding.name().to_string(),
                endpoint: name.to_string(),
            }
        } else {
            ResourceError::ResourceDeleted {
                uri: base.to_string(),
            }
        });
    }
    if !response.is_ok() {
        return Err(ResourceError::from_http_response(&response));
    }
    decode_return(binding, declared, &response.body)
}

fn check_arity(
    name: &str,
    declared: &EndpointSchema,
    args: &[FieldValue],
    kwargs: &[(&str, FieldValue)],
) -> Result<(), ResourceError> {
    if args.len() != declared.args.len() {
        return Err(ResourceError::IncorrectEndpointArgs {
            endpoint: name.to_string(),
            expected: declared.args.len(),
            got: args.len(),
        });
    }
    let missing: Vec<String> = declared
        .kwargs
        .iter()
        .filter(|k| !kwargs.iter().any(|(key, _)| key == k))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(ResourceError::IncorrectEndpointKwargs {
            endpoint: name.to_string(),
            missing,
        });
    }
    Ok(())
}

fn decode_return(
    binding: &Arc<ResourceType>,
    declared: &EndpointSchema,
    body: &Value,
) -> Result<FieldValue, ResourceError> {
    if !declared.returns_resource() {
        let field_type = declared
            .returns
            .clone()
            .map_or(FieldType::Other(String::new()), FieldType::from);
        return Ok(decode_scalar(&field_type, body));
    }

    let target = match &declared.related_resource {
        Some(name) => binding.binding(name)?,
        None => Arc::clone(binding),
    };
    match body {
        Value::Null => Ok(FieldValue::Null),
        Value::Array(items) => items
            .iter()
            .map(|item| decode_resource(&target, item))
            .collect::<Result<Vec<_>, _>>()
            .map(FieldValue::RelatedMany),
        other => decode_resource(&target, other).map(FieldValue::Related),
    }
}
