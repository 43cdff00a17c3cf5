//! In-memory backend.
//!
//! Resources live in a path-ordered map behind a single `RwLock`. Each
//! mutating call holds the write lock for its whole duration, which makes it
//! atomic. Nothing survives a restart.

use std::collections::BTreeMap;
use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ldp_model::ResourcePath;
use parking_lot::RwLock;

use crate::core::ResourceStorage;
use crate::error::{ConcurrencyError, ResourceError, StorageError, StorageResult};
use crate::types::StoredResource;

/// Volatile storage for development and tests.
#[derive(Default)]
pub struct MemoryBackend {
    resources: RwLock<BTreeMap<ResourcePath, StoredResource>>,
}

impl Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("resources", &self.resources.read().len())
            .finish()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResourceStorage for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn read(&self, path: &ResourcePath) -> StorageResult<Option<StoredResource>> {
        Ok(self.resources.read().get(path).cloned())
    }

    async fn children(&self, path: &ResourcePath) -> StorageResult<Vec<ResourcePath>> {
        let resources = self.resources.read();
        Ok(resources
            .keys()
            .filter(|p| p.parent().as_ref() == Some(path))
            .cloned()
            .collect())
    }

    async fn insert(&self, resource: &StoredResource) -> StorageResult<()> {
        let mut resources = self.resources.write();

        if resources.contains_key(resource.path()) {
            return Err(ResourceError::AlreadyExists {
                path: resource.path().clone(),
            }
            .into());
        }
        if let Some(parent_path) = resource.parent() {
            let parent = resources
                .get_mut(&parent_path)
                .ok_or(ResourceError::ParentNotFound { path: parent_path })?;
            parent.touch(resource.created_by(), resource.created_at());
        }

        resources.insert(resource.path().clone(), resource.clone());
        Ok(())
    }

    async fn replace(
        &self,
        resource: &StoredResource,
        expected_version: u64,
    ) -> StorageResult<()> {
        let mut resources = self.resources.write();
        let current = resources
            .get_mut(resource.path())
            .ok_or_else(|| StorageError::not_found(resource.path()))?;

        if current.version() != expected_version {
            return Err(ConcurrencyError::VersionConflict {
                path: resource.path().clone(),
                expected: expected_version,
                actual: current.version(),
            }
            .into());
        }

        *current = resource.clone();
        Ok(())
    }

    async fn delete_tree(
        &self,
        path: &ResourcePath,
        modified_by: &str,
        at: DateTime<Utc>,
    ) -> StorageResult<u64> {
        let mut resources = self.resources.write();
        if !resources.contains_key(path) {
            return Err(StorageError::not_found(path));
        }

        let before = resources.len();
        resources.retain(|p, _| p != path && !p.is_descendant_of(path));
        let removed = (before - resources.len()) as u64;

        if let Some(parent) = path.parent().and_then(|p| resources.get_mut(&p)) {
            parent.touch(modified_by, at);
        }
        Ok(removed)
    }

    async fn find_by_membership_resource(&self, iri: &str) -> StorageResult<Vec<StoredResource>> {
        let resources = self.resources.read();
        Ok(resources
            .values()
            .filter(|r| {
                r.membership()
                    .is_some_and(|m| m.membership_resource().as_str() == iri)
            })
            .cloned()
            .collect())
    }

    async fn count(&self) -> StorageResult<u64> {
        Ok(self.resources.read().len() as u64)
    }
}
