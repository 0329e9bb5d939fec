//! Batched create, update and delete.
//!
//! A [`Bulk`] collects operations for one resource type and sends them as a
//! single PATCH to the list endpoint:
//!
//! ```json
//! {"objects": [{...new...}, {"resource_uri": "...", ...}], "deleted_objects": ["..."]}
//! ```
//!
//! Created entries are not returned as handles; query for them afterwards.
//! Deleted handles (and every other handle to the same URIs) become deleted.
//! The batch succeeds or fails as a whole.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::clients::HttpMethod;
use crate::rest::{relation, FieldValue, Resource, ResourceError, ResourceType};

/// A batch of operations on one resource type.
///
/// # Example
///
/// ```rust,ignore
/// trees.bulk(
///     Bulk::new()
///         .create([("name", "birch")])
///         .update(&oak)
///         .delete(&elm),
/// )?;
/// assert!(!elm.is_live());
/// ```
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct Bulk {
    create: Vec<Vec<(String, FieldValue)>>,
    update: Vec<Resource>,
    delete: Vec<Resource>,
}

impl Bulk {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a create payload.
    pub fn create<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.create.push(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Adds a resource whose current local fields should be written.
    pub fn update(mut self, resource: &Resource) -> Self {
        self.update.push(resource.clone());
        self
    }

    /// Adds a resource to delete.
    pub fn delete(mut self, resource: &Resource) -> Self {
        self.delete.push(resource.clone());
        self
    }

    /// Returns `true` if the batch holds no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }

    pub(crate) fn execute(self, binding: &Arc<ResourceType>) -> Result<(), ResourceError> {
        if self.is_empty() {
            tracing::debug!(resource = binding.name(), "empty bulk request skipped");
            return Ok(());
        }

        for (resource, list) in self
            .update
            .iter()
            .map(|r| (r, "objects"))
            .chain(self.delete.iter().map(|r| (r, "deleted_objects")))
        {
            if resource.resource_type().name() != binding.name() {
                return Err(ResourceError::BadRelatedType {
                    field: list.to_string(),
                    expected: binding.name().to_string(),
                    got: FieldValue::Related(resource.clone()).kind(),
                });
            }
            resource.ensure_live()?;
        }
        binding.check_list_method(HttpMethod::Patch)?;

        let mut objects = Vec::with_capacity(self.create.len() + self.update.len());
        for fields in self.create {
            let fields = binding.prepare_create(fields)?;
            objects.push(Value::Object(relation::encode_fields(
                fields.iter().map(|(k, v)| (k, v)),
            )));
        }
        for resource in &self.update {
            let mut object = resource.writable_fields();
            object.insert(
                "resource_uri".to_string(),
                Value::String(resource.uri().to_string()),
            );
            objects.push(Value::Object(object));
        }
        let deleted: Vec<&str> = self.delete.iter().map(Resource::uri).collect();

        let body = json!({"objects": objects, "deleted_objects": deleted});
        let response = binding
            .client()
            .patch(binding.list_endpoint(), body, binding.auth().as_ref())?;
        if !response.is_ok() {
            return Err(ResourceError::from_http_response(&response));
        }

        for resource in &self.delete {
            binding.tombstone(resource.uri());
        }
        if response.code == 202 {
            tracing::warn!(
                resource = binding.name(),
                "bulk request accepted; the server may apply it after responding"
            );
        }
        Ok(())
    }
}
