//! Cache Module
//!
//! Deduplication gate holding one pending marker per phone number, with
//! lazy TTL expiration.

mod entry;
mod gate;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use gate::PhoneNumberCache;
pub use stats::CacheStats;
pub use store::{Admission, PendingStore};

// == Public Constants ==
/// Default lifetime of a pending marker (the OTP validity window)
pub const DEFAULT_TTL_SECS: u64 = 300;
