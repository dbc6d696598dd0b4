//! Expired Marker Sweep
//!
//! Background task that periodically purges expired pending markers, so
//! numbers that are never looked up again do not accumulate. Lazy expiry on
//! access does not depend on it.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::PhoneNumberCache;

/// Spawns a background task that periodically purges expired markers.
///
/// # Arguments
/// * `cache` - Shared deduplication gate
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(PhoneNumberCache::new(Duration::from_secs(300)));
/// let sweep_handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: Arc<PhoneNumberCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting expired marker sweep with interval of {:?}",
            interval
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired();

            if removed > 0 {
                info!("Sweep: removed {} expired markers", removed);
            } else {
                debug!("Sweep: no expired markers found");
            }
        }
    })
}
