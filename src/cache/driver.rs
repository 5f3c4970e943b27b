//! Storage Driver Module
//!
//! The raw byte-string storage contract beneath the cache facade, and the
//! in-memory implementation of it.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::cache::{CacheEntry, CacheStats, Clock, StatsSnapshot, SystemClock};
use crate::error::{CacheError, Result};

// == Storage Driver Trait ==
/// Raw get/set/forget over byte payloads with TTL semantics.
///
/// Implementations own the physical storage and enforce expiry: a key whose
/// TTL has elapsed behaves as absent on read whether or not any proactive
/// cleanup has run. Backend failures are reported as
/// [`CacheError::StorageUnavailable`], never as a miss.
pub trait StorageDriver: Send + Sync + 'static {
    /// Returns the stored payload if the key exists and is unexpired.
    ///
    /// `Ok(None)` covers both "never stored" and "stored but expired";
    /// callers cannot tell the two apart.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores a payload with an expiry of now + `ttl_seconds`.
    ///
    /// A TTL of zero means the entry never expires. Overwrites any previous
    /// entry for the key, replacing its TTL with the new one.
    fn set(&self, key: &str, payload: Vec<u8>, ttl_seconds: u64) -> Result<()>;

    /// Removes the key unconditionally.
    ///
    /// Returns `Ok(true)` if a live entry was present and removed,
    /// `Ok(false)` if the key was absent or already expired. Forgetting an
    /// absent key is not an error.
    fn forget(&self, key: &str) -> Result<bool>;
}

// == Memory Driver ==
/// In-memory storage driver backed by a read-write-locked hash map.
///
/// Expiry is lazy: reads check the clock and treat elapsed entries as
/// absent without removing them. Reclamation happens on overwrite, on
/// `forget`, or through [`MemoryDriver::purge_expired`] (driven by the
/// background sweep).
#[derive(Debug)]
pub struct MemoryDriver {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Time source for expiry decisions
    clock: Arc<dyn Clock>,
    /// Performance counters
    stats: CacheStats,
}

impl MemoryDriver {
    // == Constructors ==
    /// Creates a new MemoryDriver on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a new MemoryDriver on the given clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            stats: CacheStats::new(),
        }
    }

    // == Purge Expired ==
    /// Removes every entry whose TTL has elapsed.
    ///
    /// Returns the number of entries removed. Never removes a logically
    /// unexpired entry.
    pub fn purge_expired(&self) -> Result<usize> {
        let now = self.clock.now_ms();
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CacheError::StorageUnavailable("memory store lock poisoned".into()))?;

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        Ok(before - entries.len())
    }

    // == Stats ==
    /// Returns a snapshot of the driver's performance counters.
    pub fn stats(&self) -> Result<StatsSnapshot> {
        Ok(self.stats.snapshot(self.len()?))
    }

    // == Length ==
    /// Returns the current number of stored entries, expired-but-unswept
    /// entries included.
    pub fn len(&self) -> Result<usize> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CacheError::StorageUnavailable("memory store lock poisoned".into()))?;
        Ok(entries.len())
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries at all.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageDriver for MemoryDriver {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = self.clock.now_ms();
        let entries = self
            .entries
            .read()
            .map_err(|_| CacheError::StorageUnavailable("memory store lock poisoned".into()))?;

        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                // Left in place for the sweep; behaves as absent here
                self.stats.record_expiration();
                Ok(None)
            }
            Some(entry) => {
                self.stats.record_hit();
                Ok(Some(entry.payload.clone()))
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    fn set(&self, key: &str, payload: Vec<u8>, ttl_seconds: u64) -> Result<()> {
        let now = self.clock.now_ms();
        let entry = CacheEntry::new(payload, ttl_seconds, now);

        let mut entries = self
            .entries
            .write()
            .map_err(|_| CacheError::StorageUnavailable("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    fn forget(&self, key: &str) -> Result<bool> {
        let now = self.clock.now_ms();
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CacheError::StorageUnavailable("memory store lock poisoned".into()))?;

        // An expired leftover is already logically absent
        match entries.remove(key) {
            Some(entry) => Ok(!entry.is_expired(now)),
            None => Ok(false),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    const START: u64 = 1_700_000_000_000;

    fn driver_with_manual_clock() -> (MemoryDriver, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(START));
        let driver = MemoryDriver::with_clock(clock.clone());
        (driver, clock)
    }

    #[test]
    fn test_miss_then_hit() {
        let (driver, _clock) = driver_with_manual_clock();

        assert_eq!(driver.get("key1").unwrap(), None);

        driver.set("key1", b"value1".to_vec(), 60).unwrap();
        assert_eq!(driver.get("key1").unwrap(), Some(b"value1".to_vec()));
    }

    #[test]
    fn test_expired_key_behaves_as_absent() {
        let (driver, clock) = driver_with_manual_clock();

        driver.set("key1", b"value1".to_vec(), 1).unwrap();
        assert!(driver.get("key1").unwrap().is_some());

        clock.advance_secs(1);
        assert_eq!(driver.get("key1").unwrap(), None);

        // Still physically present until swept, logically gone
        assert_eq!(driver.len().unwrap(), 1);
    }

    #[test]
    fn test_zero_ttl_never_expires() {
        let (driver, clock) = driver_with_manual_clock();

        driver.set("key1", b"value1".to_vec(), 0).unwrap();
        clock.advance_secs(100_000_000);

        assert_eq!(driver.get("key1").unwrap(), Some(b"value1".to_vec()));
    }

    #[test]
    fn test_overwrite_replaces_value_and_ttl() {
        let (driver, clock) = driver_with_manual_clock();

        driver.set("key1", b"a".to_vec(), 100).unwrap();
        driver.set("key1", b"b".to_vec(), 50).unwrap();

        assert_eq!(driver.get("key1").unwrap(), Some(b"b".to_vec()));

        // New expiry is now+50, not the earlier now+100
        clock.advance_secs(50);
        assert_eq!(driver.get("key1").unwrap(), None);
    }

    #[test]
    fn test_overwrite_extends_a_shorter_ttl() {
        let (driver, clock) = driver_with_manual_clock();

        driver.set("key1", b"a".to_vec(), 10).unwrap();
        clock.advance_secs(5);
        driver.set("key1", b"b".to_vec(), 10).unwrap();

        // Expiry restarted at the second set
        clock.advance_secs(7);
        assert_eq!(driver.get("key1").unwrap(), Some(b"b".to_vec()));
    }

    #[test]
    fn test_forget_present_key() {
        let (driver, _clock) = driver_with_manual_clock();

        driver.set("key1", b"value1".to_vec(), 60).unwrap();
        assert!(driver.forget("key1").unwrap());
        assert_eq!(driver.get("key1").unwrap(), None);
    }

    #[test]
    fn test_forget_absent_key_is_not_an_error() {
        let (driver, _clock) = driver_with_manual_clock();

        assert!(!driver.forget("missing").unwrap());
    }

    #[test]
    fn test_forget_expired_key_reports_absent() {
        let (driver, clock) = driver_with_manual_clock();

        driver.set("key1", b"value1".to_vec(), 1).unwrap();
        clock.advance_secs(2);

        assert!(!driver.forget("key1").unwrap());
    }

    #[test]
    fn test_purge_expired_removes_only_elapsed_entries() {
        let (driver, clock) = driver_with_manual_clock();

        driver.set("short", b"v".to_vec(), 1).unwrap();
        driver.set("long", b"v".to_vec(), 100).unwrap();
        driver.set("forever", b"v".to_vec(), 0).unwrap();

        clock.advance_secs(2);

        assert_eq!(driver.purge_expired().unwrap(), 1);
        assert_eq!(driver.len().unwrap(), 2);
        assert!(driver.get("long").unwrap().is_some());
        assert!(driver.get("forever").unwrap().is_some());
    }

    #[test]
    fn test_purge_on_empty_store() {
        let (driver, _clock) = driver_with_manual_clock();

        assert_eq!(driver.purge_expired().unwrap(), 0);
        assert!(driver.is_empty().unwrap());
    }

    #[test]
    fn test_stats_counts() {
        let (driver, clock) = driver_with_manual_clock();

        driver.set("key1", b"v".to_vec(), 1).unwrap();
        driver.get("key1").unwrap(); // hit
        let _ = driver.get("missing").unwrap(); // miss

        clock.advance_secs(1);
        let _ = driver.get("key1").unwrap(); // expired read

        let stats = driver.stats().unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
