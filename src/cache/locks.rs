//! Per-Key Lock Registry
//!
//! Backs the facade's opt-in exclusive-producer mode: at most one producer
//! runs per key at a time, without serializing unrelated keys.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

// == Key Locks ==
/// Lazily-allocated `Mutex<()>` per key.
///
/// One slot is kept per distinct key seen; the key space of a cache is the
/// bound on registry growth.
#[derive(Debug, Default)]
pub(crate) struct KeyLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    /// Creates an empty lock registry.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the lock slot for a key, allocating it on first use.
    ///
    /// Callers lock the returned mutex around their critical section; the
    /// registry mutex is only held long enough to look the slot up.
    pub(crate) fn slot(&self, key: &str) -> Arc<Mutex<()>> {
        let mut slots = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        slots
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
