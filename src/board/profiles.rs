//! User Profiles Module
//!
//! The expensive lookup the cache exists to memoize: profile resolution
//! against a (simulated) slow user directory, wrapped in `remember`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::{Cache, MemoryDriver};
use crate::error::Result;

/// The cache handle type used for profiles.
pub type ProfileCache = Cache<UserProfile, MemoryDriver>;

// == User Profile ==
/// A resolved user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id
    pub id: u32,
    /// Display name
    pub name: String,
}

impl UserProfile {
    /// The profile returned for ids the directory does not know.
    pub fn unknown(id: u32) -> Self {
        Self {
            id,
            name: "Unknown".to_string(),
        }
    }
}

// == Profile Directory ==
/// User directory with memoized lookups.
///
/// Each resolution goes through the cache under `user_profile:{id}`; only a
/// miss pays the (simulated) directory latency. The lookup counter exposes
/// how many times the directory itself was actually hit.
#[derive(Debug)]
pub struct ProfileDirectory {
    /// The backing user table standing in for a user database
    users: HashMap<u32, UserProfile>,
    cache: ProfileCache,
    /// TTL applied to memoized profiles, in seconds
    profile_ttl: u64,
    /// Simulated per-lookup directory latency
    lookup_latency: Duration,
    /// Number of real directory lookups performed
    lookups: AtomicU64,
}

impl ProfileDirectory {
    // == Constructor ==
    /// Creates the demo directory (users 1 and 2) over the given cache.
    ///
    /// # Arguments
    /// * `cache` - Cache handle profiles are memoized through
    /// * `profile_ttl` - TTL in seconds for memoized profiles
    /// * `lookup_latency` - Artificial delay charged to each real lookup
    pub fn new(cache: ProfileCache, profile_ttl: u64, lookup_latency: Duration) -> Self {
        let users = HashMap::from([
            (
                1,
                UserProfile {
                    id: 1,
                    name: "Alice".to_string(),
                },
            ),
            (
                2,
                UserProfile {
                    id: 2,
                    name: "Bob".to_string(),
                },
            ),
        ]);

        Self {
            users,
            cache,
            profile_ttl,
            lookup_latency,
            lookups: AtomicU64::new(0),
        }
    }

    // == Profile ==
    /// Resolves a user profile, serving from cache when possible.
    ///
    /// Unknown ids resolve to the `Unknown` profile rather than an error,
    /// and are memoized like any other result.
    pub fn profile(&self, user_id: u32) -> Result<UserProfile> {
        let key = format!("user_profile:{user_id}");

        self.cache.remember(&key, self.profile_ttl, || {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            info!("directory lookup for user id {user_id}");

            if !self.lookup_latency.is_zero() {
                thread::sleep(self.lookup_latency);
            }

            Ok(self
                .users
                .get(&user_id)
                .cloned()
                .unwrap_or_else(|| UserProfile::unknown(user_id)))
        })
    }

    // == Lookup Count ==
    /// Returns how many real directory lookups have run so far.
    pub fn lookup_count(&self) -> u64 {
        self.lookups.load(Ordering::SeqCst)
    }

    // == Forget Profile ==
    /// Drops a user's memoized profile, forcing the next resolution to hit
    /// the directory.
    pub fn forget_profile(&self, user_id: u32) -> Result<bool> {
        self.cache.forget(&format!("user_profile:{user_id}"))
    }
}

/// Builds a directory over a fresh in-memory cache. Convenience for the
/// server wiring and tests.
pub fn directory_over(
    driver: Arc<MemoryDriver>,
    profile_ttl: u64,
    lookup_latency: Duration,
) -> ProfileDirectory {
    ProfileDirectory::new(Cache::new(driver), profile_ttl, lookup_latency)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn test_directory() -> (ProfileDirectory, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let driver = Arc::new(MemoryDriver::with_clock(clock.clone()));
        let directory = directory_over(driver, 3600, Duration::ZERO);
        (directory, clock)
    }

    #[test]
    fn test_known_user_resolves() {
        let (directory, _clock) = test_directory();

        let profile = directory.profile(1).unwrap();
        assert_eq!(profile.id, 1);
        assert_eq!(profile.name, "Alice");
    }

    #[test]
    fn test_unknown_user_resolves_to_placeholder() {
        let (directory, _clock) = test_directory();

        let profile = directory.profile(99).unwrap();
        assert_eq!(profile, UserProfile::unknown(99));
    }

    #[test]
    fn test_repeat_resolutions_hit_cache() {
        let (directory, _clock) = test_directory();

        directory.profile(1).unwrap();
        directory.profile(1).unwrap();
        directory.profile(1).unwrap();

        assert_eq!(directory.lookup_count(), 1);
    }

    #[test]
    fn test_distinct_users_each_pay_one_lookup() {
        let (directory, _clock) = test_directory();

        directory.profile(1).unwrap();
        directory.profile(2).unwrap();
        directory.profile(1).unwrap();

        assert_eq!(directory.lookup_count(), 2);
    }

    #[test]
    fn test_expired_profile_is_looked_up_again() {
        let (directory, clock) = test_directory();

        directory.profile(1).unwrap();
        clock.advance_secs(3600);
        directory.profile(1).unwrap();

        assert_eq!(directory.lookup_count(), 2);
    }

    #[test]
    fn test_forget_profile_forces_fresh_lookup() {
        let (directory, _clock) = test_directory();

        directory.profile(1).unwrap();
        assert!(directory.forget_profile(1).unwrap());
        directory.profile(1).unwrap();

        assert_eq!(directory.lookup_count(), 2);
    }
}
