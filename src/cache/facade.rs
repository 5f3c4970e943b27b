//! Cache Facade Module
//!
//! Typed read-through layer over a storage driver: JSON serialization of
//! structured values, defaulted reads, and the `remember` memoization
//! pattern.

use std::marker::PhantomData;
use std::sync::{Arc, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::locks::KeyLocks;
use crate::cache::{MemoryDriver, StorageDriver};
use crate::error::{CacheError, Result};

/// The encoded form of JSON `null`, reserved as the absence sentinel.
const NULL_PAYLOAD: &[u8] = b"null";

// == Cache Facade ==
/// A typed cache handle over a storage driver.
///
/// Values of type `V` are encoded to canonical JSON before reaching the
/// driver's byte-string interface and decoded back on retrieval. The handle
/// is cheap to clone and shares the underlying driver.
///
/// Keys are opaque strings composed by callers (e.g. `user_profile:42`);
/// the cache enforces no namespacing.
#[derive(Debug)]
pub struct Cache<V, D = MemoryDriver> {
    driver: Arc<D>,
    locks: Option<Arc<KeyLocks>>,
    _value: PhantomData<fn() -> V>,
}

impl<V, D> Clone for Cache<V, D> {
    fn clone(&self) -> Self {
        Self {
            driver: self.driver.clone(),
            locks: self.locks.clone(),
            _value: PhantomData,
        }
    }
}

impl<V, D> Cache<V, D>
where
    V: Serialize + DeserializeOwned,
    D: StorageDriver,
{
    // == Constructor ==
    /// Creates a cache handle over the given driver.
    ///
    /// By default concurrent `remember` misses on the same key each invoke
    /// their producer independently (no cross-caller deduplication).
    pub fn new(driver: Arc<D>) -> Self {
        Self {
            driver,
            locks: None,
            _value: PhantomData,
        }
    }

    // == Exclusive Producers ==
    /// Enables per-key mutual exclusion for `remember` producers.
    ///
    /// With this mode on, at most one producer runs per key at a time;
    /// concurrent callers for the same key wait and re-check the cache
    /// instead of recomputing. Unrelated keys are never serialized against
    /// each other.
    pub fn with_exclusive_producers(mut self) -> Self {
        self.locks = Some(Arc::new(KeyLocks::new()));
        self
    }

    // == Get ==
    /// Retrieves and decodes the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the driver reports absence (never stored,
    /// expired, or forgotten). A corrupt payload is a
    /// [`CacheError::Serialization`] error, not a silent miss.
    pub fn get(&self, key: &str) -> Result<Option<V>> {
        match self.driver.get(key)? {
            Some(payload) => {
                let value = serde_json::from_slice(&payload).map_err(|source| {
                    CacheError::Serialization {
                        key: key.to_string(),
                        source,
                    }
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    // == Get Or ==
    /// Retrieves the value stored under `key`, or `default` on a miss.
    pub fn get_or(&self, key: &str, default: V) -> Result<V> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    // == Set ==
    /// Encodes `value` and stores it under `key` with the given TTL.
    ///
    /// A TTL of zero means the entry never expires. A value that encodes to
    /// JSON `null` is rejected with [`CacheError::NullValue`]: null is the
    /// cache's absence signal, and a stored null would be indistinguishable
    /// from a miss on read.
    pub fn set(&self, key: &str, value: &V, ttl_seconds: u64) -> Result<()> {
        let payload = serde_json::to_vec(value).map_err(|source| CacheError::Serialization {
            key: key.to_string(),
            source,
        })?;

        if payload == NULL_PAYLOAD {
            return Err(CacheError::NullValue(key.to_string()));
        }

        self.driver.set(key, payload, ttl_seconds)
    }

    // == Forget ==
    /// Removes `key` from the cache.
    ///
    /// Returns `Ok(true)` if a live entry was removed, `Ok(false)` if the
    /// key was already absent.
    pub fn forget(&self, key: &str) -> Result<bool> {
        self.driver.forget(key)
    }

    // == Remember ==
    /// Returns the cached value for `key`, computing and storing it on a
    /// miss.
    ///
    /// On a hit the producer is never invoked. On a miss the producer runs
    /// exactly once, synchronously, on the calling thread, and its value is
    /// stored under `key` with the given TTL before being returned. A
    /// failing producer propagates as [`CacheError::Producer`] and caches
    /// nothing.
    ///
    /// The producer may block (e.g. a slow database call); no lock is held
    /// across it unless [`with_exclusive_producers`](Self::with_exclusive_producers)
    /// is enabled, in which case only that key's own lock is held.
    pub fn remember<F>(&self, key: &str, ttl_seconds: u64, producer: F) -> Result<V>
    where
        F: FnOnce() -> anyhow::Result<V>,
    {
        if let Some(value) = self.get(key)? {
            return Ok(value);
        }

        match &self.locks {
            Some(locks) => {
                let slot = locks.slot(key);
                let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);

                // Another caller may have filled the key while we waited
                if let Some(value) = self.get(key)? {
                    return Ok(value);
                }
                self.produce_and_store(key, ttl_seconds, producer)
            }
            None => self.produce_and_store(key, ttl_seconds, producer),
        }
    }

    fn produce_and_store<F>(&self, key: &str, ttl_seconds: u64, producer: F) -> Result<V>
    where
        F: FnOnce() -> anyhow::Result<V>,
    {
        let value = producer().map_err(|source| CacheError::Producer {
            key: key.to_string(),
            source,
        })?;

        self.set(key, &value, ttl_seconds)?;
        Ok(value)
    }
}
