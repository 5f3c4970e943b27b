//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds for memoized user profiles
    pub profile_ttl: u64,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    /// Path of the flat-file message log
    pub message_log: PathBuf,
    /// Simulated directory lookup latency in milliseconds
    pub profile_lookup_latency_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `PROFILE_TTL` - Profile TTL in seconds (default: 3600)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `MESSAGE_LOG` - Message log path (default: messages.json)
    /// - `PROFILE_LOOKUP_LATENCY_MS` - Simulated lookup latency (default: 1000)
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            profile_ttl: env::var("PROFILE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            message_log: env::var("MESSAGE_LOG")
                .ok()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("messages.json")),
            profile_lookup_latency_ms: env::var("PROFILE_LOOKUP_LATENCY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            profile_ttl: 3600,
            cleanup_interval: 60,
            message_log: PathBuf::from("messages.json"),
            profile_lookup_latency_ms: 1000,
        }
    }
}
