//! In-memory resource store.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use kassabok_shared::types::ResourceId;

use super::error::ResourceError;
use super::repository::ResourceRepository;
use super::types::{Resource, ResourceFilter};

/// Resource store backed by a concurrent hash map.
///
/// Used by tests and by the `memory` storage backend. Contents are lost on
/// restart.
#[derive(Debug, Default)]
pub struct InMemoryResourceRepository {
    resources: DashMap<ResourceId, Resource>,
}

impl InMemoryResourceRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored resources, regardless of owner.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl ResourceRepository for InMemoryResourceRepository {
    async fn insert(&self, resource: Resource) -> Result<Resource, ResourceError> {
        self.resources.insert(resource.id, resource.clone());
        Ok(resource)
    }

    async fn find_by_id(&self, id: ResourceId) -> Result<Option<Resource>, ResourceError> {
        Ok(self.resources.get(&id).map(|entry| entry.value().clone()))
    }

    async fn count(&self, filter: &ResourceFilter) -> Result<u64, ResourceError> {
        let count = self
            .resources
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn list(
        &self,
        filter: &ResourceFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Resource>, ResourceError> {
        let mut matching: Vec<Resource> = self
            .resources
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        matching.sort_by_key(|r| (Reverse(r.invoice_date), Reverse(r.created_at), Reverse(r.id)));

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn set_done(
        &self,
        id: ResourceId,
        done: bool,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, ResourceError> {
        Ok(self
            .resources
            .get_mut(&id)
            .map(|mut entry| {
                entry.done = done;
                entry.updated_at = updated_at;
            })
            .is_some())
    }

    async fn replace(&self, resource: Resource) -> Result<bool, ResourceError> {
        Ok(self
            .resources
            .get_mut(&resource.id)
            .map(|mut entry| *entry = resource)
            .is_some())
    }

    async fn delete(&self, id: ResourceId) -> Result<bool, ResourceError> {
        Ok(self.resources.remove(&id).is_some())
    }
}
