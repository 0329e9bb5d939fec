//! Resource type bindings.
//!
//! A [`ResourceType`] ties a type name to its schema, the API it lives in,
//! and two shared, mutable settings: the caching default and the
//! credentials. Every [`Resource`] of the type holds a reference to its
//! binding and reads those settings at the moment it needs them, so
//! changing them on the binding affects existing handles too (unless a
//! handle overrides caching for itself).

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde_json::Value;

use crate::auth::SharedAuth;
use crate::clients::{HttpMethod, HttpResponse, RestClient};
use crate::config::ResourceName;
use crate::rest::factory::ApiContext;
use crate::rest::filter::describe_query;
use crate::rest::response::ListPage;
use crate::rest::schema::FieldSchema;
use crate::rest::{
    endpoint, relation, Bulk, FieldValue, Filters, QueryCursor, Resource, ResourceError, SchemaDoc,
};

/// Page size used when neither the configuration nor the schema sets one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// A resource type bound to its schema and settings.
///
/// Obtained from [`ResourceFactory::resource`](crate::rest::ResourceFactory::resource)
/// and always handled as `Arc<ResourceType>`.
///
/// # Example
///
/// ```rust,ignore
/// let trees = factory.resource("tree")?;
///
/// let oak = trees.create([("name", "oak")])?;
/// let found = trees.get(Filters::new().with("name", "oak"))?;
/// assert_eq!(oak, found);
///
/// for tree in &trees.filter(Filters::new().with("name__startswith", "o"))? {
///     println!("{}", tree?.uri());
/// }
///
/// trees.set_caching(false);
/// println!("{} trees", trees.count()?);
/// ```
pub struct ResourceType {
    name: ResourceName,
    schema: Arc<SchemaDoc>,
    context: Arc<ApiContext>,
    caching: AtomicBool,
    auth: RwLock<Option<SharedAuth>>,
    deleted: Mutex<HashSet<String>>,
    generation: AtomicU64,
}

// Verify ResourceType is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceType>();
};

impl fmt::Debug for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceType")
            .field("name", &self.name)
            .field("list_endpoint", &self.schema.list_endpoint)
            .field("caching", &self.caching())
            .field("auth", &self.auth())
            .finish_non_exhaustive()
    }
}

impl ResourceType {
    pub(crate) fn new(
        name: ResourceName,
        schema: Arc<SchemaDoc>,
        context: Arc<ApiContext>,
        caching: bool,
        auth: Option<SharedAuth>,
    ) -> Self {
        Self {
            name,
            schema,
            context,
            caching: AtomicBool::new(caching),
            auth: RwLock::new(auth),
            deleted: Mutex::new(HashSet::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    /// Returns the schema document.
    #[must_use]
    pub fn schema(&self) -> &SchemaDoc {
        &self.schema
    }

    /// Returns the server-relative list endpoint.
    #[must_use]
    pub fn list_endpoint(&self) -> &str {
        &self.schema.list_endpoint
    }

    /// Returns the caching default for handles of this type.
    #[must_use]
    pub fn caching(&self) -> bool {
        self.caching.load(Ordering::Relaxed)
    }

    /// Changes the caching default. Handles without their own override
    /// follow the new value immediately.
    pub fn set_caching(&self, caching: bool) {
        self.caching.store(caching, Ordering::Relaxed);
    }

    /// Returns the credentials attached to requests for this type.
    #[must_use]
    pub fn auth(&self) -> Option<SharedAuth> {
        self.auth
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the credentials. Takes effect on the next request.
    pub fn set_auth(&self, auth: Option<SharedAuth>) {
        *self.auth.write().unwrap_or_else(PoisonError::into_inner) = auth;
    }

    /// Returns a lazy handle for an existing URI. Nothing is fetched.
    #[must_use]
    pub fn resource_at(self: &Arc<Self>, uri: &str) -> Resource {
        Resource::lazy(Arc::clone(self), uri)
    }

    /// Creates a resource on the server and returns a populated handle.
    ///
    /// Fields are validated before the request: unknown names, read-only
    /// fields, wrongly typed related values and missing required fields all
    /// fail without touching the network. If the server returns neither the
    /// new representation nor its location, the resource is looked up again
    /// by the exact-filterable fields that were sent.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::MethodNotAllowed`] if the list endpoint refuses POST
    /// - [`ResourceError::FieldNotInSchema`], [`ResourceError::FieldReadOnly`],
    ///   [`ResourceError::BadRelatedType`], [`ResourceError::MissingRequiredField`]
    /// - [`ResourceError::CreatedResourceNotFound`] or
    ///   [`ResourceError::MultipleResourcesReturned`] if the lookup after
    ///   create does not find exactly one match
    pub fn create<I, K, V>(self: &Arc<Self>, fields: I) -> Result<Resource, ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.check_list_method(HttpMethod::Post)?;
        let fields = self.prepare_create(fields)?;
        let body = Value::Object(relation::encode_fields(fields.iter().map(|(k, v)| (k, v))));

        let response = self.client().post(self.list_endpoint(), body, self.auth().as_ref())?;
        if !response.is_ok() {
            return Err(ResourceError::from_http_response(&response));
        }

        if let Some(object) = response
            .body
            .as_object()
            .filter(|o| o.contains_key("resource_uri"))
        {
            return Resource::from_object(self, object);
        }
        if let Some(location) = response.location() {
            let mut resource = Resource::lazy(Arc::clone(self), location);
            resource.refresh()?;
            return Ok(resource);
        }
        self.locate_created(&fields)
    }

    /// Returns the single resource matching `filters`.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::FilterNotAllowedForField`] before any request
    /// - [`ResourceError::NoResourcesExist`] if nothing matches
    /// - [`ResourceError::MultipleResourcesReturned`] if more than one matches
    pub fn get(self: &Arc<Self>, filters: Filters) -> Result<Resource, ResourceError> {
        let mut query = self.translate(&filters)?;
        if !filters.get_order_by().is_empty() {
            query.insert("order_by".to_string(), filters.get_order_by().join(","));
        }
        query.insert("limit".to_string(), "2".to_string());

        let page = self.list_page(query.clone())?;
        let total = page.meta().total_count;
        match (page.len(), total) {
            (0, _) => Err(ResourceError::NoResourcesExist {
                resource: self.name().to_string(),
                filters: describe_query(&query),
            }),
            (1, None | Some(0 | 1)) => Resource::from_object(self, &page[0]),
            (n, total) => Err(ResourceError::MultipleResourcesReturned {
                resource: self.name().to_string(),
                filters: describe_query(&query),
                count: total.or(Some(n as u64)),
            }),
        }
    }

    /// Returns a lazy cursor over the resources matching `filters`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::FilterNotAllowedForField`] before any
    /// request is made.
    pub fn filter(self: &Arc<Self>, filters: Filters) -> Result<QueryCursor, ResourceError> {
        QueryCursor::new(Arc::clone(self), &filters)
    }

    /// Returns a lazy cursor over every resource of this type.
    #[must_use]
    pub fn all(self: &Arc<Self>) -> QueryCursor {
        QueryCursor::unfiltered(Arc::clone(self))
    }

    /// Counts every resource of this type without fetching them.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails or the server does not
    /// report a total.
    pub fn count(&self) -> Result<u64, ResourceError> {
        self.count_query(HashMap::new())
    }

    /// Same as [`count`](Self::count).
    ///
    /// # Errors
    ///
    /// See [`count`](Self::count).
    pub fn len(&self) -> Result<u64, ResourceError> {
        self.count()
    }

    /// Returns `true` if the server holds no resources of this type.
    ///
    /// # Errors
    ///
    /// See [`count`](Self::count).
    pub fn is_empty(&self) -> Result<bool, ResourceError> {
        Ok(self.count()? == 0)
    }

    /// Sends creates, updates and deletes in one request.
    ///
    /// See [`Bulk`] for the semantics.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] for invalid items before sending, or one
    /// error for the whole batch if the server refuses it.
    pub fn bulk(self: &Arc<Self>, operations: Bulk) -> Result<(), ResourceError> {
        operations.execute(self)
    }

    /// Calls a list-level custom endpoint.
    ///
    /// Positional arguments must match the declared count exactly and every
    /// declared keyword must be supplied; undeclared keywords are ignored.
    /// Arity is checked before any request.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::EndpointNotFound`] if the schema declares no such endpoint
    /// - [`ResourceError::IncorrectEndpointArgs`] / [`ResourceError::IncorrectEndpointKwargs`]
    pub fn call(
        self: &Arc<Self>,
        endpoint: &str,
        args: &[FieldValue],
        kwargs: &[(&str, FieldValue)],
    ) -> Result<FieldValue, ResourceError> {
        let declared = self.schema.list_endpoints.get(endpoint).ok_or_else(|| {
            ResourceError::EndpointNotFound {
                resource: self.name().to_string(),
                endpoint: endpoint.to_string(),
            }
        })?;
        endpoint::invoke(self, self.list_endpoint(), endpoint, declared, args, kwargs)
    }

    /// Deletes every resource of this type on the server.
    ///
    /// Every existing handle of this type reports itself deleted afterwards.
    ///
    /// # Errors
    ///
    /// - [`ResourceError::MethodNotAllowed`] if the list endpoint refuses DELETE
    /// - [`ResourceError::Http`] if the server refuses the request
    pub fn delete_all(&self) -> Result<(), ResourceError> {
        self.check_list_method(HttpMethod::Delete)?;
        let response = self.client().delete(self.list_endpoint(), self.auth().as_ref())?;
        if !response.is_ok() {
            return Err(ResourceError::from_http_response(&response));
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.deleted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        tracing::debug!(resource = %self.name, "deleted every resource");
        Ok(())
    }

    /// Returns a human-readable description of the schema.
    #[must_use]
    pub fn help(&self) -> String {
        self.schema.help(self.name())
    }

    pub(crate) fn client(&self) -> &RestClient {
        self.context.client()
    }

    pub(crate) fn page_size(&self) -> u32 {
        self.context
            .config()
            .page_size()
            .or(self.schema.default_limit)
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub(crate) fn tombstone(&self, uri: &str) {
        self.deleted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(uri.to_string());
    }

    /// Clears a tombstone once the server hands the URI out again.
    pub(crate) fn revive(&self, uri: &str) {
        self.deleted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(uri);
    }

    pub(crate) fn is_tombstoned(&self, uri: &str) -> bool {
        self.deleted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(uri)
    }

    pub(crate) fn check_list_method(&self, method: HttpMethod) -> Result<(), ResourceError> {
        if self.schema.allows_list_method(method) {
            Ok(())
        } else {
            Err(ResourceError::MethodNotAllowed {
                resource: self.name().to_string(),
                method,
                level: "list",
            })
        }
    }

    pub(crate) fn check_detail_method(&self, method: HttpMethod) -> Result<(), ResourceError> {
        if self.schema.allows_detail_method(method) {
            Ok(())
        } else {
            Err(ResourceError::MethodNotAllowed {
                resource: self.name().to_string(),
                method,
                level: "detail",
            })
        }
    }

    /// Returns the binding of the type a related field points to.
    pub(crate) fn related_binding(
        &self,
        field: &FieldSchema,
    ) -> Result<Arc<Self>, ResourceError> {
        let target = field.target_type().ok_or_else(|| {
            ResourceError::unexpected(
                self.list_endpoint(),
                "related field without a related schema",
            )
        })?;
        self.context.binding(target)
    }

    /// Validates and translates filters, following relation lookups into
    /// the target types' schemas.
    pub(crate) fn translate(
        &self,
        filters: &Filters,
    ) -> Result<HashMap<String, String>, ResourceError> {
        filters.translate(self.name(), &self.schema, |field| {
            self.related_binding(field)
                .map(|target| Arc::clone(&target.schema))
        })
    }

    pub(crate) fn binding(&self, name: &str) -> Result<Arc<Self>, ResourceError> {
        self.context.binding(name)
    }

    /// Validates one write to `name` and returns the value to store.
    pub(crate) fn validate_write(
        self: &Arc<Self>,
        name: &str,
        value: FieldValue,
    ) -> Result<FieldValue, ResourceError> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| ResourceError::FieldNotInSchema {
                resource: self.name().to_string(),
                field: name.to_string(),
            })?;
        if field.readonly {
            return Err(ResourceError::FieldReadOnly {
                resource: self.name().to_string(),
                field: name.to_string(),
            });
        }
        relation::normalize(self, name, field, value)
    }

    /// Validates a create payload, including required fields.
    pub(crate) fn prepare_create<I, K, V>(
        self: &Arc<Self>,
        fields: I,
    ) -> Result<Vec<(String, FieldValue)>, ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let fields = fields
            .into_iter()
            .map(|(name, value)| {
                let name = name.into();
                let value = self.validate_write(&name, value.into())?;
                Ok((name, value))
            })
            .collect::<Result<Vec<_>, ResourceError>>()?;

        if let Some(missing) = self
            .schema
            .required_fields()
            .into_iter()
            .find(|required| !fields.iter().any(|(name, _)| name == required))
        {
            return Err(ResourceError::MissingRequiredField {
                resource: self.name().to_string(),
                field: missing.to_string(),
            });
        }
        Ok(fields)
    }

    /// Sends a GET to `uri` with the current credentials.
    pub(crate) fn fetch(&self, uri: &str) -> Result<HttpResponse, ResourceError> {
        Ok(self.client().get(uri, None, self.auth().as_ref())?)
    }

    /// Fetches one page of the list endpoint.
    pub(crate) fn list_page(
        &self,
        query: HashMap<String, String>,
    ) -> Result<ListPage, ResourceError> {
        let response = self
            .client()
            .get(self.list_endpoint(), Some(query), self.auth().as_ref())?;
        ListPage::from_http_response(response, self.list_endpoint())
    }

    pub(crate) fn count_query(
        &self,
        mut query: HashMap<String, String>,
    ) -> Result<u64, ResourceError> {
        query.insert("limit".to_string(), "1".to_string());
        let page = self.list_page(query)?;
        page.meta().total_count.ok_or_else(|| {
            ResourceError::unexpected(self.list_endpoint(), "response carries no total_count")
        })
    }

    fn locate_created(
        self: &Arc<Self>,
        fields: &[(String, FieldValue)],
    ) -> Result<Resource, ResourceError> {
        let not_found = || ResourceError::CreatedResourceNotFound {
            resource: self.name().to_string(),
        };

        let filters: Filters = fields
            .iter()
            .filter(|(name, value)| {
                self.schema.allows_filter(name, "exact")
                    && matches!(
                        value,
                        FieldValue::Bool(_)
                            | FieldValue::Int(_)
                            | FieldValue::Float(_)
                            | FieldValue::Text(_)
                            | FieldValue::DateTime(_)
                            | FieldValue::Related(_)
                    )
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        if filters.is_empty() {
            tracing::debug!(resource = %self.name, "created resource has no filterable fields");
            return Err(not_found());
        }

        match self.get(filters) {
            Err(ResourceError::NoResourcesExist { .. }) => Err(not_found()),
            other => other,
        }
    }
}
