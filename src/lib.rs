//! Memocache - An in-memory TTL cache with read-through memoization
//!
//! The cache core is a typed `remember`/`get`/`set`/`forget` facade over a
//! raw byte-string storage driver; the rest of the crate is the
//! message-board service built on it.

pub mod api;
pub mod board;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{Cache, Clock, ManualClock, MemoryDriver, StorageDriver, SystemClock};
pub use config::Config;
pub use error::{ApiError, CacheError};
pub use tasks::spawn_cleanup_task;
