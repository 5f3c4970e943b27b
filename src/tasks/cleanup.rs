//! TTL Sweep Task
//!
//! Background task that periodically removes expired cache entries.
//!
//! Purely an optimization: expiry is already enforced lazily on every read,
//! so the sweep only reclaims memory held by entries nobody reads anymore.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::MemoryDriver;

/// Spawns a background task that periodically purges expired cache entries.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. It never removes a logically unexpired entry.
///
/// # Arguments
/// * `driver` - Shared storage driver to sweep
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(
    driver: Arc<MemoryDriver>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting TTL sweep task with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            match driver.purge_expired() {
                Ok(removed) if removed > 0 => {
                    info!("TTL sweep: removed {} expired entries", removed);
                }
                Ok(_) => {
                    debug!("TTL sweep: no expired entries found");
                }
                Err(err) => {
                    warn!("TTL sweep failed: {err}");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ManualClock, StorageDriver};
    use std::time::Duration;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let driver = Arc::new(MemoryDriver::with_clock(clock.clone()));

        driver.set("expire_soon", b"value".to_vec(), 1).unwrap();
        clock.advance_secs(2);

        // Sweep every second of real time; the manual clock already elapsed
        let handle = spawn_cleanup_task(driver.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(driver.len().unwrap(), 0, "Expired entry should have been swept");

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let driver = Arc::new(MemoryDriver::with_clock(clock));

        driver.set("long_lived", b"value".to_vec(), 3600).unwrap();

        let handle = spawn_cleanup_task(driver.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(
            driver.get("long_lived").unwrap(),
            Some(b"value".to_vec()),
            "Valid entry should not be removed"
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let driver = Arc::new(MemoryDriver::new());

        let handle = spawn_cleanup_task(driver, 1);

        // Abort immediately
        handle.abort();

        // Wait a bit and verify task is finished
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
