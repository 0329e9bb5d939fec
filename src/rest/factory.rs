//! Resource type bindings for one API root.
//!
//! [`ResourceFactory`] is the entry point: it owns the HTTP client, the
//! schema cache and the default credentials, and hands out one
//! [`ResourceType`] per type name.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tasty_orm::{ApiConfig, ApiRoot};
//! use tasty_orm::auth::ApiKeyAuth;
//! use tasty_orm::rest::ResourceFactory;
//!
//! let config = ApiConfig::new(ApiRoot::new("http://localhost:8000/api/v1")?);
//! let factory = ResourceFactory::new(config)?;
//! factory.set_auth(Some(Arc::new(ApiKeyAuth::new("admin", "secret"))));
//!
//! let users = factory.resource("user")?;
//! println!("{}", users.help());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::auth::SharedAuth;
use crate::clients::{RestClient, Transport};
use crate::config::{ApiConfig, ResourceName};
use crate::rest::{ResourceError, ResourceType, SchemaCache};

/// State shared by every binding of one factory.
///
/// Every binding is registered weakly, whether it was requested through the
/// factory or created while decoding a related field. While the factory is
/// alive it also holds each binding in `retained`, so settings changed on a
/// binding survive its last handle. Dropping the factory empties `retained`
/// and sets it to `None`, which breaks the binding/context cycle.
pub(crate) struct ApiContext {
    client: RestClient,
    config: ApiConfig,
    schemas: SchemaCache,
    auth: RwLock<Option<SharedAuth>>,
    bindings: RwLock<HashMap<String, Weak<ResourceType>>>,
    retained: RwLock<Option<HashMap<String, Arc<ResourceType>>>>,
}

impl ApiContext {
    pub(crate) const fn client(&self) -> &RestClient {
        &self.client
    }

    pub(crate) const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Returns the live binding for `name`, creating it if needed.
    pub(crate) fn binding(
        self: &Arc<Self>,
        name: &str,
    ) -> Result<Arc<ResourceType>, ResourceError> {
        if let Some(binding) = self
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .and_then(Weak::upgrade)
        {
            return Ok(binding);
        }

        let name = ResourceName::new(name)?;
        let auth = self.auth.read().unwrap_or_else(PoisonError::into_inner).clone();
        let schema = self.schemas.schema_for(&self.client, &name, auth.as_ref())?;

        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(binding) = bindings.get(name.as_ref()).and_then(Weak::upgrade) {
            return Ok(binding);
        }
        let binding = Arc::new(ResourceType::new(
            name.clone(),
            schema,
            Arc::clone(self),
            self.config.default_caching(),
            auth,
        ));
        bindings.insert(name.to_string(), Arc::downgrade(&binding));
        if let Some(retained) = self
            .retained
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            retained.insert(name.to_string(), Arc::clone(&binding));
        }
        tracing::debug!(resource = %name, "resource type bound");
        Ok(binding)
    }

    fn release(&self) {
        self.retained
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn set_auth(&self, auth: Option<SharedAuth>) {
        *self.auth.write().unwrap_or_else(PoisonError::into_inner) = auth.clone();
        for binding in self
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter_map(Weak::upgrade)
        {
            binding.set_auth(auth.clone());
        }
    }
}

/// Hands out [`ResourceType`] bindings for one API root.
///
/// Schemas are fetched once per type and kept for the factory's lifetime.
/// There is one binding per type name for as long as the factory lives,
/// including types only reached through related fields, so settings changed
/// on a binding are seen everywhere.
pub struct ResourceFactory {
    context: Arc<ApiContext>,
}

impl Drop for ResourceFactory {
    fn drop(&mut self) {
        self.context.release();
    }
}

// Verify ResourceFactory is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceFactory>();
};

impl fmt::Debug for ResourceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceFactory")
            .field("api_root", self.context.config.api_root())
            .field("schemas", &self.context.schemas)
            .finish_non_exhaustive()
    }
}

impl ResourceFactory {
    /// Creates a factory talking HTTP to the configured API root.
    ///
    /// Nothing is fetched until the first [`resource`](Self::resource) call.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ResourceError> {
        let client = RestClient::new(&config)?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a factory that sends requests through `transport`.
    #[must_use]
    pub fn with_transport(config: ApiConfig, transport: Arc<dyn Transport>) -> Self {
        let client = RestClient::with_transport(config.api_root().clone(), transport);
        Self::with_client(config, client)
    }

    fn with_client(config: ApiConfig, client: RestClient) -> Self {
        Self {
            context: Arc::new(ApiContext {
                client,
                config,
                schemas: SchemaCache::new(),
                auth: RwLock::new(None),
                bindings: RwLock::new(HashMap::new()),
                retained: RwLock::new(Some(HashMap::new())),
            }),
        }
    }

    /// Returns the binding for a resource type, fetching its schema on first
    /// use.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::Config`] if `name` is not a valid type name
    /// - [`ResourceError::CannotConnectToAddress`] if the API root is unreachable
    /// - [`ResourceError::NonExistantResource`] if the API does not expose `name`
    pub fn resource(&self, name: &str) -> Result<Arc<ResourceType>, ResourceError> {
        self.context.binding(name)
    }

    /// Replaces the credentials of the factory and of every live binding.
    pub fn set_auth(&self, auth: Option<SharedAuth>) {
        self.context.set_auth(auth);
    }

    /// Returns the factory's default credentials.
    #[must_use]
    pub fn auth(&self) -> Option<SharedAuth> {
        self.context
            .auth
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.context.config
    }
}
