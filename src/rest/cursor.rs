//! Lazy, restartable query results.
//!
//! A [`QueryCursor`] holds a validated query; nothing is fetched until it is
//! iterated. Each iteration walks the list endpoint from offset 0, asking for
//! pages of the binding's page size and advancing by the number of objects
//! actually received, so a server that caps pages below the requested size
//! is paged past transparently.
//!
//! Paging stops when a page comes back empty, the caller's `limit` is
//! reached, the reported `total_count` is reached, or a short page arrives
//! with no `next` link.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::rest::filter::describe_query;
use crate::rest::{Filters, Resource, ResourceError, ResourceType};

/// A lazy query over one resource type.
///
/// Iterating yields `Result<Resource, ResourceError>`. A query with no
/// matches yields a single [`ResourceError::NoResourcesExist`] rather than
/// nothing.
///
/// # Example
///
/// ```rust,ignore
/// let cursor = trees.filter(Filters::new().order_by("-name").limit(5))?;
/// for tree in &cursor {
///     let mut tree = tree?;
///     println!("{:?}", tree.get("name")?);
/// }
///
/// // Iterating again re-issues the requests.
/// let again = cursor.to_vec()?;
/// ```
#[derive(Clone, Debug)]
pub struct QueryCursor {
    binding: Arc<ResourceType>,
    query: HashMap<String, String>,
    order_by: Vec<String>,
    limit: Option<u32>,
    page_size: u32,
}

impl QueryCursor {
    pub(crate) fn new(
        binding: Arc<ResourceType>,
        filters: &Filters,
    ) -> Result<Self, ResourceError> {
        let query = binding.translate(filters)?;
        let page_size = binding.page_size();
        Ok(Self {
            binding,
            query,
            order_by: filters.get_order_by().to_vec(),
            limit: filters.get_limit().filter(|limit| *limit > 0),
            page_size,
        })
    }

    pub(crate) fn unfiltered(binding: Arc<ResourceType>) -> Self {
        let page_size = binding.page_size();
        Self {
            binding,
            query: HashMap::new(),
            order_by: Vec::new(),
            limit: None,
            page_size,
        }
    }

    /// Returns the binding the results belong to.
    #[must_use]
    pub const fn resource_type(&self) -> &Arc<ResourceType> {
        &self.binding
    }

    /// Starts a new walk from the first page.
    #[must_use]
    pub fn iter(&self) -> ResourceIter<'_> {
        ResourceIter {
            cursor: self,
            buffer: VecDeque::new(),
            offset: 0,
            fetched: 0,
            done: false,
        }
    }

    /// Fetches every result.
    ///
    /// # Errors
    ///
    /// Returns the first error met while paging, including
    /// [`ResourceError::NoResourcesExist`] for an empty result.
    pub fn to_vec(&self) -> Result<Vec<Resource>, ResourceError> {
        self.iter().collect()
    }

    /// Counts the matches with a count-only request, capped by the limit.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError`] if the request fails or the server does not
    /// report a total.
    pub fn count(&self) -> Result<u64, ResourceError> {
        let total = self.binding.count_query(self.query.clone())?;
        Ok(self
            .limit
            .map_or(total, |limit| total.min(u64::from(limit))))
    }

    fn page_query(&self, offset: u64, size: u64) -> HashMap<String, String> {
        let mut query = self.query.clone();
        query.insert("limit".to_string(), size.to_string());
        query.insert("offset".to_string(), offset.to_string());
        if !self.order_by.is_empty() {
            query.insert("order_by".to_string(), self.order_by.join(","));
        }
        query
    }
}

impl<'a> IntoIterator for &'a QueryCursor {
    type Item = Result<Resource, ResourceError>;
    type IntoIter = ResourceIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One walk over a [`QueryCursor`]'s pages.
#[derive(Debug)]
pub struct ResourceIter<'a> {
    cursor: &'a QueryCursor,
    buffer: VecDeque<Map<String, Value>>,
    offset: u64,
    fetched: u64,
    done: bool,
}

impl ResourceIter<'_> {
    fn fetch_page(&mut self) -> Result<(), ResourceError> {
        let page_size = u64::from(self.cursor.page_size);
        let remaining = self
            .cursor
            .limit
            .map(|limit| u64::from(limit).saturating_sub(self.fetched));
        if remaining == Some(0) {
            self.done = true;
            return Ok(());
        }
        let request_size = remaining.map_or(page_size, |r| r.min(page_size));

        let query = self.cursor.page_query(self.offset, request_size);
        let page = self.cursor.binding.list_page(query.clone())?;
        let received = page.len() as u64;
        tracing::debug!(
            resource = self.cursor.binding.name(),
            offset = self.offset,
            requested = request_size,
            received,
            "fetched page"
        );

        if received == 0 {
            self.done = true;
            if self.fetched == 0 {
                return Err(ResourceError::NoResourcesExist {
                    resource: self.cursor.binding.name().to_string(),
                    filters: describe_query(&self.cursor.query),
                });
            }
            return Ok(());
        }

        self.offset += received;
        self.fetched += received;
        let total_reached = page
            .meta()
            .total_count
            .is_some_and(|total| self.offset >= total);
        let short_last_page = received < request_size && !page.has_next_page();
        let limit_reached = remaining.is_some_and(|r| received >= r);
        if total_reached || short_last_page || limit_reached {
            self.done = true;
        }

        let mut objects = page.into_objects();
        if let Some(remaining) = remaining {
            objects.truncate(usize::try_from(remaining).unwrap_or(usize::MAX));
        }
        self.buffer.extend(objects);
        Ok(())
    }
}

impl Iterator for ResourceIter<'_> {
    type Item = Result<Resource, ResourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.done {
            if let Err(e) = self.fetch_page() {
                self.done = true;
                return Some(Err(e));
            }
        }
        let object = self.buffer.pop_front()?;
        Some(Resource::from_object(&self.cursor.binding, &object))
    }
}
