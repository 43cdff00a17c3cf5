//! Per-path write locks.
//!
//! Mutations of a resource are serialized by an async mutex keyed by its
//! path. A structure lock sits above the path locks: ordinary mutations hold
//! it shared, recursive deletes hold it exclusively so no write can land
//! inside a subtree that is being removed.
//!
//! Path locks are always acquired in sorted order, so two requests locking
//! overlapping path sets cannot deadlock.

use std::collections::HashMap;
use std::sync::Arc;

use ldp_model::ResourcePath;
use parking_lot::Mutex;
use tokio::sync::{
    Mutex as AsyncMutex, OwnedMutexGuard, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock,
};
use tracing::trace;

/// Registry size above which unused entries are pruned.
const PRUNE_THRESHOLD: usize = 1024;

/// Hands out path and structure locks.
#[derive(Debug, Default)]
pub struct LockManager {
    paths: Mutex<HashMap<ResourcePath, Arc<AsyncMutex<()>>>>,
    structure: Arc<RwLock<()>>,
}

/// Held for the duration of an ordinary mutation.
#[derive(Debug)]
pub struct PathLocks {
    // drop order: path guards first, then the structure guard
    _paths: Vec<OwnedMutexGuard<()>>,
    _structure: OwnedRwLockReadGuard<()>,
}

/// Held for the duration of a recursive delete.
#[derive(Debug)]
pub struct ExclusiveLock {
    _structure: OwnedRwLockWriteGuard<()>,
}

impl LockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks `paths` for writing, after taking the structure lock shared.
    pub async fn lock_paths(&self, paths: &[&ResourcePath]) -> PathLocks {
        let structure = self.structure.clone().read_owned().await;

        let mut sorted: Vec<&ResourcePath> = paths.to_vec();
        sorted.sort();
        sorted.dedup();

        let mutexes: Vec<Arc<AsyncMutex<()>>> = {
            let mut registry = self.paths.lock();
            if registry.len() > PRUNE_THRESHOLD {
                registry.retain(|_, m| Arc::strong_count(m) > 1);
            }
            sorted
                .iter()
                .map(|p| registry.entry((*p).clone()).or_default().clone())
                .collect()
        };

        let mut guards = Vec::with_capacity(mutexes.len());
        for mutex in mutexes {
            guards.push(mutex.lock_owned().await);
        }
        trace!(paths = ?sorted, "Acquired path locks");

        PathLocks {
            _paths: guards,
            _structure: structure,
        }
    }

    /// Waits for every in-flight mutation to finish and blocks new ones.
    pub async fn lock_all(&self) -> ExclusiveLock {
        let structure = self.structure.clone().write_owned().await;
        trace!("Acquired exclusive structure lock");
        ExclusiveLock {
            _structure: structure,
        }
    }

    /// Number of paths currently in the registry.
    pub fn registered(&self) -> usize {
        self.paths.lock().len()
    }
}
