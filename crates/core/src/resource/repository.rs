//! Storage seam for resources.

use chrono::{DateTime, Utc};

use kassabok_shared::types::ResourceId;

use super::error::ResourceError;
use super::types::{Resource, ResourceFilter};

/// Repository trait for resource persistence.
///
/// Implemented in-memory here and over PostgreSQL by the db crate.
/// Listings are ordered by invoice date, newest first, ties broken by
/// creation time, newest first.
pub trait ResourceRepository: Send + Sync {
    /// Store a new resource.
    fn insert(
        &self,
        resource: Resource,
    ) -> impl std::future::Future<Output = Result<Resource, ResourceError>> + Send;

    /// Find a resource by ID.
    fn find_by_id(
        &self,
        id: ResourceId,
    ) -> impl std::future::Future<Output = Result<Option<Resource>, ResourceError>> + Send;

    /// Count resources matching `filter`.
    fn count(
        &self,
        filter: &ResourceFilter,
    ) -> impl std::future::Future<Output = Result<u64, ResourceError>> + Send;

    /// List one window of resources matching `filter`.
    fn list(
        &self,
        filter: &ResourceFilter,
        offset: u64,
        limit: u64,
    ) -> impl std::future::Future<Output = Result<Vec<Resource>, ResourceError>> + Send;

    /// Set the done flag. Returns false if the resource does not exist.
    fn set_done(
        &self,
        id: ResourceId,
        done: bool,
        updated_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<bool, ResourceError>> + Send;

    /// Overwrite a stored resource. Returns false if it does not exist.
    fn replace(
        &self,
        resource: Resource,
    ) -> impl std::future::Future<Output = Result<bool, ResourceError>> + Send;

    /// Delete a resource. Returns false if it did not exist.
    fn delete(
        &self,
        id: ResourceId,
    ) -> impl std::future::Future<Output = Result<bool, ResourceError>> + Send;
}
