//! Per-resource leases
//!
//! Serialises adjustments that target the same resource within this
//! process. The read and write of one adjustment are separate round trips
//! with no version token, so concurrent adjustments of one resource can
//! overwrite each other; holding a lease across the pass prevents that for
//! callers sharing a `ResourceLeases`. It does not coordinate across
//! processes.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-resource locks, keyed by resource identifier
#[derive(Debug, Clone, Default)]
pub struct ResourceLeases {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

/// Exclusive hold on one resource, released on drop
#[derive(Debug)]
pub struct Lease {
    key: String,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl ResourceLeases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn acquire(&self, key: impl Into<String>) -> Lease {
        let key = key.into();
        let lock = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let guard = lock.lock_owned().await;

        Lease {
            key,
            locks: Arc::clone(&self.locks),
            guard: Some(guard),
        }
    }

    /// Number of resources with an outstanding lease or waiter
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Lease {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map still references the lock: nobody is waiting on it
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
