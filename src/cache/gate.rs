//! Phone Number Cache
//!
//! Thread-safe deduplication gate shared by all request handlers.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{Admission, CacheStats, PendingStore};

// == Phone Number Cache ==
/// Keyed gate mapping a normalized phone number to its pending-request marker.
///
/// All operations, including lazy eviction, run under one mutex. The lock is
/// only held for map manipulation and never across an `.await`.
#[derive(Debug)]
pub struct PhoneNumberCache {
    store: Mutex<PendingStore>,
}

impl PhoneNumberCache {
    /// Creates an empty gate whose markers live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: Mutex::new(PendingStore::new(ttl)),
        }
    }

    /// True iff a live marker exists for `key`; evicts an expired one.
    pub fn is_in_cache(&self, key: &str) -> bool {
        self.lock().contains_live(key, current_timestamp_ms())
    }

    /// Inserts a marker for `key`, overwriting any existing one.
    ///
    /// Callers deciding whether to admit a request must use
    /// [`try_admit`](Self::try_admit) instead of pairing this with
    /// [`is_in_cache`](Self::is_in_cache).
    pub fn add_to_cache(&self, key: &str) {
        self.lock().insert(key, current_timestamp_ms());
    }

    /// Removes any marker for `key`. Never fails.
    pub fn remove_from_cache(&self, key: &str) {
        let released = self.lock().remove(key, current_timestamp_ms());
        if released {
            debug!("Released pending marker");
        }
    }

    /// Admits `key` if no live marker exists, inserting one atomically.
    pub fn try_admit(&self, key: &str) -> Admission {
        self.lock().admit(key, current_timestamp_ms())
    }

    /// Removes the marker for `key` only if it was created by `ticket`.
    pub fn rollback(&self, key: &str, ticket: u64) -> bool {
        self.lock().rollback(key, ticket)
    }

    /// Removes all expired markers. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        self.lock().purge_expired(current_timestamp_ms())
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    pub fn ttl(&self) -> Duration {
        self.lock().ttl()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // The store is consistent between statements, so a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, PendingStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
