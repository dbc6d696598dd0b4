//! Pending Store Module
//!
//! Unsynchronized map of phone number to pending-request marker with lazy
//! TTL expiration. Every operation takes the current time explicitly;
//! [`PhoneNumberCache`](super::PhoneNumberCache) supplies the wall clock and
//! the lock.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats};

// == Admission ==
/// Outcome of an atomic check-then-insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// No live entry existed; a fresh one was inserted with this ticket
    Admitted { ticket: u64 },
    /// A live entry exists; it expires after `retry_after`
    Pending { retry_after: Duration },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

// == Pending Store ==
/// Pending-request storage keyed by normalized phone number.
#[derive(Debug)]
pub struct PendingStore {
    /// Marker storage
    entries: HashMap<String, CacheEntry>,
    /// Activity counters
    stats: CacheStats,
    /// Lifetime of every marker
    ttl: Duration,
    /// Ticket handed to the next admission
    next_ticket: u64,
}

impl PendingStore {
    // == Constructor ==
    /// Creates an empty store whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            ttl,
            next_ticket: 1,
        }
    }

    // == Contains Live ==
    /// Returns true iff a live entry exists for `key` at `now_ms`.
    ///
    /// An expired entry is evicted as part of the check.
    pub fn contains_live(&mut self, key: &str, now_ms: u64) -> bool {
        self.evict_if_expired(key, now_ms);
        self.entries.contains_key(key)
    }

    // == Insert ==
    /// Inserts a fresh entry for `key`, overwriting any existing one.
    ///
    /// Returns the ticket of the new entry.
    pub fn insert(&mut self, key: &str, now_ms: u64) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        self.entries
            .insert(key.to_string(), CacheEntry::new(now_ms, self.ttl, ticket));
        self.stats.set_pending(self.entries.len());
        ticket
    }

    // == Admit ==
    /// Check-then-insert in one step.
    pub fn admit(&mut self, key: &str, now_ms: u64) -> Admission {
        self.evict_if_expired(key, now_ms);

        if let Some(entry) = self.entries.get(key) {
            let retry_after = entry.remaining_at(now_ms);
            self.stats.record_rejection();
            return Admission::Pending { retry_after };
        }

        let ticket = self.insert(key, now_ms);
        self.stats.record_admission();
        Admission::Admitted { ticket }
    }

    // == Remove ==
    /// Removes any entry for `key`. No-op if absent.
    ///
    /// Returns true if a live entry was released.
    pub fn remove(&mut self, key: &str, now_ms: u64) -> bool {
        let released = match self.entries.remove(key) {
            Some(entry) if entry.is_expired_at(now_ms) => {
                self.stats.record_expirations(1);
                false
            }
            Some(_) => {
                self.stats.record_release();
                true
            }
            None => false,
        };

        self.stats.set_pending(self.entries.len());
        released
    }

    // == Rollback ==
    /// Removes the entry for `key` only if it still carries `ticket`.
    pub fn rollback(&mut self, key: &str, ticket: u64) -> bool {
        let matches = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.ticket == ticket);

        if matches {
            self.entries.remove(key);
            self.stats.record_rollback();
            self.stats.set_pending(self.entries.len());
        }
        matches
    }

    // == Purge Expired ==
    /// Removes every expired entry. Returns the number removed.
    pub fn purge_expired(&mut self, now_ms: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now_ms));
        let removed = before - self.entries.len();

        self.stats.record_expirations(removed);
        self.stats.set_pending(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_pending(self.entries.len());
        stats
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_if_expired(&mut self, key: &str, now_ms: u64) {
        let expired = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now_ms));

        if expired {
            self.entries.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_pending(self.entries.len());
        }
    }
}
