//! The resource proxy.
//!
//! A [`Resource`] mirrors one remote entity through its URI. It keeps a
//! local mapping of the fields it has seen, and whether reads and writes go
//! through that mapping depends on its caching setting:
//!
//! - **caching on**: reads return cached values and only fetch on a miss;
//!   writes are buffered until [`save`](Resource::save).
//! - **caching off**: every read fetches the full representation; every write
//!   is sent immediately as a partial update.
//!
//! The setting is read from the [`ResourceType`] binding at the time of each
//! operation unless the handle overrides it with
//! [`set_caching`](Resource::set_caching).
//!
//! Once deleted, through this handle, another handle, a bulk request or
//! [`ResourceType::delete_all`], a handle refuses every operation with
//! [`ResourceError::ResourceDeleted`] before touching the network.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut oak = trees.create([("name", "oak")])?;
//! oak.set("name", "old oak")?;
//! oak.save()?;
//!
//! oak.delete()?;
//! assert!(!oak.is_live());
//! assert!(oak.get("name").unwrap_err().is_deleted());
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::clients::{HttpMethod, HttpResponse};
use crate::rest::{endpoint, relation, FieldValue, ResourceError, ResourceType};

/// A handle to one remote resource.
///
/// Equality and hashing use the URI only.
#[derive(Clone)]
pub struct Resource {
    binding: Arc<ResourceType>,
    uri: String,
    fields: HashMap<String, FieldValue>,
    dirty: HashSet<String>,
    caching: Option<bool>,
    generation: u64,
    deleted: bool,
}

// Verify Resource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource>();
};

impl Resource {
    /// Creates a handle for `uri` without fetching anything.
    ///
    /// Absolute URIs on the API's origin are stored in server-relative form.
    #[must_use]
    pub fn lazy(binding: Arc<ResourceType>, uri: &str) -> Self {
        let uri = binding.client().api_root().relative(uri).to_string();
        let generation = binding.generation();
        Self {
            binding,
            uri,
            fields: HashMap::new(),
            dirty: HashSet::new(),
            caching: None,
            generation,
            deleted: false,
        }
    }

    /// Creates a populated handle from an object representation.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedResponse`] if the object carries no
    /// `resource_uri`, or any error from decoding its related fields.
    pub fn from_object(
        binding: &Arc<ResourceType>,
        object: &Map<String, Value>,
    ) -> Result<Self, ResourceError> {
        let uri = object
            .get("resource_uri")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ResourceError::unexpected(
                    binding.list_endpoint(),
                    "representation has no resource_uri",
                )
            })?;
        let mut resource = Self::lazy(Arc::clone(binding), uri);
        binding.revive(&resource.uri);
        resource.fields = relation::decode_object(binding, object)?;
        Ok(resource)
    }

    /// Returns the server-relative URI.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the binding this handle belongs to.
    #[must_use]
    pub const fn resource_type(&self) -> &Arc<ResourceType> {
        &self.binding
    }

    /// Returns the effective caching setting.
    #[must_use]
    pub fn caching(&self) -> bool {
        self.caching.unwrap_or_else(|| self.binding.caching())
    }

    /// Overrides caching for this handle only.
    ///
    /// Turning caching on does not fetch anything; the next read decides.
    pub fn set_caching(&mut self, caching: bool) {
        self.caching = Some(caching);
    }

    /// Drops the override so the binding's setting applies again.
    pub fn reset_caching(&mut self) {
        self.caching = None;
    }

    /// Returns `true` unless the resource is known to be deleted.
    ///
    /// This is a local check. Use [`exists`](Self::exists) to confirm with
    /// the server.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.ensure_live().is_ok()
    }

    /// Returns `true` if the resource is live and the server still has it.
    ///
    /// A resource the server reports missing is marked deleted.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails for another reason.
    pub fn exists(&mut self) -> Result<bool, ResourceError> {
        if !self.is_live() {
            return Ok(false);
        }
        let response = self.binding.fetch(&self.uri)?;
        if response.is_not_found() {
            tracing::warn!(uri = %self.uri, "resource no longer exists on the server");
            self.mark_deleted();
            return Ok(false);
        }
        if !response.is_ok() {
            return Err(ResourceError::from_detail_response(&response, &self.uri));
        }
        Ok(true)
    }

    /// Returns the cached value of `name` without any network access.
    #[must_use]
    pub fn cached(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Reads a field.
    ///
    /// With caching on, a cached value is returned as is. Otherwise the full
    /// representation is fetched first. Fields the server omits read as
    /// [`FieldValue::Null`].
    ///
    /// # Errors
    ///
    /// - [`ResourceError::ResourceDeleted`] if the resource is deleted
    /// - [`ResourceError::NoSuchField`] if the schema has no such field
    pub fn get(&mut self, name: &str) -> Result<FieldValue, ResourceError> {
        self.ensure_live()?;
        if self.binding.schema().field(name).is_none() {
            return Err(ResourceError::NoSuchField {
                resource: self.binding.name().to_string(),
                field: name.to_string(),
            });
        }

        if self.caching() {
            if let Some(value) = self.fields.get(name) {
                return Ok(value.clone());
            }
            let remote = self.pull()?;
            for (key, value) in remote {
                if !self.dirty.contains(&key) {
                    self.fields.insert(key, value);
                }
            }
        } else {
            self.fields = self.pull()?;
            self.dirty.clear();
        }
        Ok(self.fields.get(name).cloned().unwrap_or(FieldValue::Null))
    }

    /// Writes a field.
    ///
    /// With caching on the value is buffered until [`save`](Self::save).
    /// With caching off it is sent at once, and the local copy only changes
    /// if the server accepts it.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::ResourceDeleted`] if the resource is deleted
    /// - [`ResourceError::FieldNotInSchema`], [`ResourceError::FieldReadOnly`],
    ///   [`ResourceError::BadRelatedType`] for invalid writes
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), ResourceError> {
        self.update([(name, value)])
    }

    /// Writes several fields at once.
    ///
    /// Every value is validated before anything changes. With caching off
    /// the fields are sent as one partial update.
    ///
    /// # Errors
    ///
    /// See [`set`](Self::set).
    pub fn update<I, K, V>(&mut self, fields: I) -> Result<(), ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.ensure_live()?;
        let fields = fields
            .into_iter()
            .map(|(name, value)| {
                let name = name.into();
                let value = self.binding.validate_write(&name, value.into())?;
                Ok((name, value))
            })
            .collect::<Result<Vec<_>, ResourceError>>()?;

        if !self.caching() {
            self.binding.check_detail_method(HttpMethod::Patch)?;
            let body = relation::encode_fields(fields.iter().map(|(k, v)| (k, v)));
            let response = self.binding.client().patch(
                &self.uri,
                Value::Object(body),
                self.binding.auth().as_ref(),
            )?;
            self.check_response(&response)?;
        }

        for (name, value) in fields {
            if self.caching() {
                self.dirty.insert(name.clone());
            }
            self.fields.insert(name, value);
        }
        Ok(())
    }

    /// Sends the full local field mapping as one update.
    ///
    /// Does nothing with caching off, since writes were already sent.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::ResourceDeleted`] if the resource is deleted locally
    ///   or the server no longer has it
    /// - [`ResourceError::MethodNotAllowed`] if the detail endpoint refuses PATCH
    pub fn save(&mut self) -> Result<(), ResourceError> {
        self.ensure_live()?;
        if !self.caching() {
            return Ok(());
        }
        self.binding.check_detail_method(HttpMethod::Patch)?;

        let response = self.binding.client().patch(
            &self.uri,
            Value::Object(self.writable_fields()),
            self.binding.auth().as_ref(),
        )?;
        self.check_response(&response)?;
        self.dirty.clear();
        tracing::debug!(uri = %self.uri, "resource saved");
        Ok(())
    }

    /// Discards the local mapping and fetches the current representation,
    /// whatever the caching setting.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ResourceDeleted`] if the resource is deleted
    /// locally or the server no longer has it.
    pub fn refresh(&mut self) -> Result<(), ResourceError> {
        self.ensure_live()?;
        self.fields = self.pull()?;
        self.dirty.clear();
        Ok(())
    }

    /// Deletes the resource on the server and marks this handle deleted.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::ResourceDeleted`] if already deleted (including a
    ///   second call on the same handle) or the server no longer has it
    /// - [`ResourceError::MethodNotAllowed`] if the detail endpoint refuses DELETE
    pub fn delete(&mut self) -> Result<(), ResourceError> {
        self.ensure_live()?;
        self.binding.check_detail_method(HttpMethod::Delete)?;

        let response = self
            .binding
            .client()
            .delete(&self.uri, self.binding.auth().as_ref())?;
        self.check_response(&response)?;
        self.mark_deleted();
        tracing::debug!(uri = %self.uri, "resource deleted");
        Ok(())
    }

    /// Calls a detail-level custom endpoint on this resource.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::ResourceDeleted`] if the resource is deleted
    /// - [`ResourceError::EndpointNotFound`] if the schema declares no such endpoint
    /// - [`ResourceError::IncorrectEndpointArgs`] / [`ResourceError::IncorrectEndpointKwargs`]
    pub fn call(
        &mut self,
        endpoint: &str,
        args: &[FieldValue],
        kwargs: &[(&str, FieldValue)],
    ) -> Result<FieldValue, ResourceError> {
        self.ensure_live()?;
        let declared = self
            .binding
            .schema()
            .detail_endpoints
            .get(endpoint)
            .ok_or_else(|| ResourceError::EndpointNotFound {
                resource: self.binding.name().to_string(),
                endpoint: endpoint.to_string(),
            })?;
        let result = endpoint::invoke(&self.binding, &self.uri, endpoint, declared, args, kwargs);
        if matches!(result, Err(ResourceError::ResourceDeleted { .. })) {
            self.mark_deleted();
        }
        result
    }

    /// Fails with [`ResourceError::ResourceDeleted`] if the resource is known
    /// to be gone.
    pub(crate) fn ensure_live(&self) -> Result<(), ResourceError> {
        if self.deleted
            || self.generation != self.binding.generation()
            || self.binding.is_tombstoned(&self.uri)
        {
            return Err(ResourceError::ResourceDeleted {
                uri: self.uri.clone(),
            });
        }
        Ok(())
    }

    /// Returns the fields an update may carry: everything cached that the
    /// schema declares writable.
    pub(crate) fn writable_fields(&self) -> Map<String, Value> {
        let schema = self.binding.schema();
        relation::encode_fields(self.fields.iter().filter(|(name, _)| {
            name.as_str() != "resource_uri"
                && schema.field(name).is_some_and(|field| !field.readonly)
        }))
    }

    fn pull(&mut self) -> Result<HashMap<String, FieldValue>, ResourceError> {
        self.binding.check_detail_method(HttpMethod::Get)?;
        let response = self.binding.fetch(&self.uri)?;
        self.check_response(&response)?;
        let object = response.body.as_object().ok_or_else(|| {
            ResourceError::unexpected(&self.uri, "expected an object representation")
        })?;
        relation::decode_object(&self.binding, object)
    }

    /// Maps an error response, marking the handle deleted on 404.
    fn check_response(&mut self, response: &HttpResponse) -> Result<(), ResourceError> {
        if response.is_ok() {
            return Ok(());
        }
        let error = ResourceError::from_detail_response(response, &self.uri);
        if error.is_deleted() {
            tracing::warn!(uri = %self.uri, "resource no longer exists on the server");
            self.mark_deleted();
        }
        Err(error)
    }

    fn mark_deleted(&mut self) {
        self.deleted = true;
        self.binding.tombstone(&self.uri);
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("type", &self.binding.name())
            .field("uri", &self.uri)
            .field("caching", &self.caching())
            .field("deleted", &self.deleted)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}
