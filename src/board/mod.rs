//! Message Board Module
//!
//! The collaborators around the cache: a flat-file message log and a user
//! directory whose lookups are memoized through the cache.

pub mod messages;
pub mod profiles;

pub use messages::{Message, MessageLog};
pub use profiles::{ProfileCache, ProfileDirectory, UserProfile};
