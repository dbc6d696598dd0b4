//! Cache Entry Module
//!
//! Defines the pending-request marker stored per phone number.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// Marker for an outstanding OTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Admission timestamp (Unix milliseconds)
    pub inserted_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Admission number, unique within the process
    pub ticket: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry admitted at `now_ms` that lives for `ttl`.
    pub fn new(now_ms: u64, ttl: Duration, ticket: u64) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        Self {
            inserted_at: now_ms,
            expires_at: now_ms.saturating_add(ttl_ms),
            ticket,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// Boundary condition: an entry is expired once `now_ms >= expires_at`,
    /// so a zero TTL produces an entry that is never live.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }

    /// Checks if the entry has expired against the wall clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    // == Time To Live ==
    /// Returns the time left before expiry at `now_ms`, zero once expired.
    pub fn remaining_at(&self, now_ms: u64) -> Duration {
        Duration::from_millis(self.expires_at.saturating_sub(now_ms))
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
