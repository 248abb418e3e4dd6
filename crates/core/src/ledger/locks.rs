//! Per-key mutation queues.
//!
//! Each (base, asset type) balance and each individual asset has its own
//! mutex. Mutations take every key they touch in sorted order, so two
//! requests sharing keys serialize and requests on disjoint keys never
//! wait on each other. Acquisition is bounded by the configured timeout and
//! fails with `ConcurrentModification` rather than blocking indefinitely.
//!
//! Asset keys additionally hold the registry gate in shared mode; registry
//! reconciliation takes it exclusively. Queues nobody holds are dropped
//! from the table on release, so it only grows with concurrent mutations.

use std::sync::Arc;
use std::time::Duration;

use armory_shared::types::{AssetId, BaseId};
use dashmap::DashMap;
use parking_lot::lock_api::{ArcMutexGuard, ArcRwLockReadGuard, ArcRwLockWriteGuard};
use parking_lot::{Mutex, RawMutex, RawRwLock, RwLock};
use tracing::debug;

use super::error::LedgerError;
use crate::asset::AssetType;

/// A serialization domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LockKey {
    /// On-hand balance of one asset type at one base.
    Balance(BaseId, AssetType),
    /// Registry state of one asset.
    Asset(AssetId),
}

impl LockKey {
    /// Returns true for keys that guard registry state.
    #[must_use]
    pub const fn is_asset(&self) -> bool {
        matches!(self, Self::Asset(_))
    }
}

/// Guards held for the duration of one mutation.
#[must_use = "locks are released as soon as the set is dropped"]
pub struct LockSet<'a> {
    table: &'a LockTable,
    keys: Vec<LockKey>,
    guards: Vec<ArcMutexGuard<RawMutex, ()>>,
    _registry: Option<ArcRwLockReadGuard<RawRwLock, ()>>,
}

impl LockSet<'_> {
    /// Number of keys held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Returns true if no keys are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl Drop for LockSet<'_> {
    fn drop(&mut self) {
        self.guards.clear();
        for key in &self.keys {
            self.table.prune(*key);
        }
    }
}

/// Exclusive hold on the asset registry.
#[must_use = "the registry is released as soon as the lock is dropped"]
pub struct RegistryLock {
    _guard: ArcRwLockWriteGuard<RawRwLock, ()>,
}

/// Lazily populated table of mutation queues.
#[derive(Debug)]
pub struct LockTable {
    queues: DashMap<LockKey, Arc<Mutex<()>>>,
    registry: Arc<RwLock<()>>,
    timeout: Duration,
}

impl LockTable {
    /// Creates a table whose acquisitions give up after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            queues: DashMap::new(),
            registry: Arc::new(RwLock::new(())),
            timeout,
        }
    }

    /// Acquires every key in `keys`, in sorted order.
    ///
    /// On timeout, keys already taken are released before returning.
    pub fn acquire(&self, mut keys: Vec<LockKey>) -> Result<LockSet<'_>, LedgerError> {
        keys.sort_unstable();
        keys.dedup();

        let registry = if keys.iter().any(LockKey::is_asset) {
            let Some(guard) = self.registry.try_read_arc_for(self.timeout) else {
                debug!(timeout_ms = self.timeout.as_millis(), "asset registry busy");
                return Err(LedgerError::ConcurrentModification);
            };
            Some(guard)
        } else {
            None
        };

        let mut set = LockSet {
            table: self,
            keys: Vec::with_capacity(keys.len()),
            guards: Vec::with_capacity(keys.len()),
            _registry: registry,
        };
        for key in keys {
            let queue = self.queue(key);
            set.keys.push(key);
            let Some(guard) = queue.try_lock_arc_for(self.timeout) else {
                debug!(?key, timeout_ms = self.timeout.as_millis(), "mutation queue busy");
                return Err(LedgerError::ConcurrentModification);
            };
            set.guards.push(guard);
        }

        Ok(set)
    }

    /// Takes the registry gate exclusively, waiting out every mutation
    /// that holds an asset key.
    pub fn acquire_registry(&self) -> Result<RegistryLock, LedgerError> {
        match self.registry.try_write_arc_for(self.timeout) {
            Some(guard) => Ok(RegistryLock { _guard: guard }),
            None => {
                debug!(timeout_ms = self.timeout.as_millis(), "asset registry busy");
                Err(LedgerError::ConcurrentModification)
            }
        }
    }

    /// Number of queues currently in the table.
    #[must_use]
    pub fn queue_count(&self) -> usize {
        self.queues.len()
    }

    fn queue(&self, key: LockKey) -> Arc<Mutex<()>> {
        // The shard guard must drop before the caller blocks on the mutex.
        self.queues
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    /// Drops `key`'s queue once the table holds the only handle to it.
    fn prune(&self, key: LockKey) {
        self.queues
            .remove_if(&key, |_, queue| Arc::strong_count(queue) == 1);
    }
}
