//! Core resource storage trait.
//!
//! This module defines the [`ResourceStorage`] trait, the primitive
//! operations a backend provides to the containment/membership engine.
//! Backends store resources keyed by path; they know nothing about
//! Link headers, RDF syntaxes or principals.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ldp_model::ResourcePath;

use crate::error::StorageResult;
use crate::types::StoredResource;

/// Core storage trait for LDP resources.
///
/// # Atomicity
///
/// Every mutating method is a single atomic unit: either all of its effects
/// (including the parent's `lastModified` bump) are visible afterwards, or
/// none are.
///
/// # Containment
///
/// The containment edge is the parent path of each stored resource. A
/// backend must refuse to insert a resource whose parent does not exist,
/// and [`delete_tree`](Self::delete_tree) removes every descendant.
///
/// # Example
///
/// ```ignore
/// use ldp_persistence::core::ResourceStorage;
///
/// async fn example<S: ResourceStorage>(storage: &S, child: StoredResource) -> StorageResult<()> {
///     storage.insert(&child).await?;
///     let parent = child.parent().expect("non-root");
///     assert!(storage.children(&parent).await?.contains(child.path()));
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait ResourceStorage: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Reads a resource by path.
    async fn read(&self, path: &ResourcePath) -> StorageResult<Option<StoredResource>>;

    /// Checks whether a resource exists.
    async fn exists(&self, path: &ResourcePath) -> StorageResult<bool> {
        Ok(self.read(path).await?.is_some())
    }

    /// Lists the paths of the direct children of `path`, sorted.
    async fn children(&self, path: &ResourcePath) -> StorageResult<Vec<ResourcePath>>;

    /// Stores a new resource and bumps its parent's modification metadata.
    ///
    /// # Errors
    ///
    /// * `ResourceError::AlreadyExists` - If the path is taken
    /// * `ResourceError::ParentNotFound` - If the parent does not exist
    async fn insert(&self, resource: &StoredResource) -> StorageResult<()>;

    /// Replaces an existing resource.
    ///
    /// `expected_version` is the version the caller read before computing
    /// `resource`.
    ///
    /// # Errors
    ///
    /// * `ResourceError::NotFound` - If the resource does not exist
    /// * `ConcurrencyError::VersionConflict` - If the stored version differs
    async fn replace(&self, resource: &StoredResource, expected_version: u64)
    -> StorageResult<()>;

    /// Deletes a resource and all of its descendants, then bumps the parent's
    /// modification metadata.
    ///
    /// Returns the number of resources removed.
    ///
    /// # Errors
    ///
    /// * `ResourceError::NotFound` - If the resource does not exist
    async fn delete_tree(
        &self,
        path: &ResourcePath,
        modified_by: &str,
        at: DateTime<Utc>,
    ) -> StorageResult<u64>;

    /// Finds the Direct and Indirect containers whose membership resource is
    /// `iri`.
    async fn find_by_membership_resource(&self, iri: &str) -> StorageResult<Vec<StoredResource>>;

    /// Returns the number of stored resources.
    async fn count(&self) -> StorageResult<u64>;

    /// Checks that the backend can serve requests.
    async fn ping(&self) -> StorageResult<()> {
        self.count().await.map(|_| ())
    }
}
