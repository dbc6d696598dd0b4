//! Cache Statistics Module
//!
//! Tracks gate activity: admissions, rejections, releases and expirations.

use serde::Serialize;

// == Cache Stats ==
/// Counters describing how the gate has been used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Requests admitted (an OTP was allowed to be issued)
    pub admitted: u64,
    /// Requests rejected because one was already pending
    pub rejected: u64,
    /// Live entries removed explicitly (successful validation)
    pub released: u64,
    /// Entries evicted after their TTL elapsed
    pub expired: u64,
    /// Admissions undone after a failed issuance
    pub rolled_back: u64,
    /// Entries currently stored
    pub pending: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Rejection Rate ==
    /// Share of gate checks that were rejected.
    ///
    /// Returns rejected / (admitted + rejected), or 0.0 if nothing was checked.
    pub fn rejection_rate(&self) -> f64 {
        let total = self.admitted + self.rejected;
        if total == 0 {
            0.0
        } else {
            self.rejected as f64 / total as f64
        }
    }

    pub fn record_admission(&mut self) {
        self.admitted += 1;
    }

    pub fn record_rejection(&mut self) {
        self.rejected += 1;
    }

    pub fn record_release(&mut self) {
        self.released += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expired += count as u64;
    }

    pub fn record_rollback(&mut self) {
        self.rolled_back += 1;
    }

    pub fn set_pending(&mut self, count: usize) {
        self.pending = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.pending, 0);
    }

    #[test]
    fn test_rejection_rate_no_checks() {
        assert_eq!(CacheStats::new().rejection_rate(), 0.0);
    }

    #[test]
    fn test_rejection_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_admission();
        stats.record_rejection();
        stats.record_rejection();
        stats.record_admission();
        assert_eq!(stats.rejection_rate(), 0.5);
    }

    #[test]
    fn test_record_expirations() {
        let mut stats = CacheStats::new();
        stats.record_expirations(3);
        stats.record_expirations(0);
        stats.record_expirations(2);
        assert_eq!(stats.expired, 5);
    }
}
