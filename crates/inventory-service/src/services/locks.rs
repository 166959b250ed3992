//! Per-material write serialization
//!
//! Every stock mutation for a material runs its read-validate-commit sequence
//! while holding that material's async mutex. Different materials never share
//! a lock, so unrelated writes proceed in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use inventory_core::Snowflake;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Number of entries above which idle locks are pruned
const PRUNE_THRESHOLD: usize = 4096;

/// Lock table keyed by material id
#[derive(Debug, Default)]
pub struct MaterialLocks {
    locks: DashMap<Snowflake, Arc<Mutex<()>>>,
}

impl MaterialLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to one material
    ///
    /// The guard releases the lock when dropped.
    pub async fn acquire(&self, material_id: Snowflake) -> OwnedMutexGuard<()> {
        if self.locks.len() > PRUNE_THRESHOLD {
            self.prune();
        }

        // The shard guard must be released before awaiting
        let lock = self
            .locks
            .entry(material_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();

        lock.lock_owned().await
    }

    /// Number of tracked materials
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    /// Drop locks nobody is holding or waiting on
    pub fn prune(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}
