//! Response DTOs for the message-board API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::board::{Message, UserProfile};
use crate::cache::StatsSnapshot;

/// A message annotated with its author's profile (GET /messages)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMessage {
    /// Author's user id
    pub user_id: u32,
    /// Message text
    pub text: String,
    /// Posted-at Unix timestamp in seconds
    pub time: i64,
    /// The author's resolved profile
    pub user: UserProfile,
}

impl EnrichedMessage {
    /// Attaches a profile to a stored message
    pub fn new(message: Message, user: UserProfile) -> Self {
        Self {
            user_id: message.user_id,
            text: message.text,
            time: message.time,
            user,
        }
    }
}

/// Response body for posting a message (POST /messages)
#[derive(Debug, Clone, Serialize)]
pub struct PostMessageResponse {
    /// Outcome marker
    pub status: String,
}

impl PostMessageResponse {
    /// Creates the standard ok response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of reads that found an expired entry
    pub expirations: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a stats snapshot
    pub fn from_snapshot(snapshot: &StatsSnapshot) -> Self {
        Self {
            hits: snapshot.hits,
            misses: snapshot.misses,
            expirations: snapshot.expirations,
            total_entries: snapshot.total_entries,
            hit_rate: snapshot.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enriched_message_serialize() {
        let message = Message {
            user_id: 1,
            text: "hello".to_string(),
            time: 1_700_000_000,
        };
        let enriched = EnrichedMessage::new(
            message,
            UserProfile {
                id: 1,
                name: "Alice".to_string(),
            },
        );

        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["userId"], 1);
        assert_eq!(json["text"], "hello");
        assert_eq!(json["user"]["name"], "Alice");
    }

    #[test]
    fn test_post_message_response_serialize() {
        let json = serde_json::to_string(&PostMessageResponse::ok()).unwrap();
        assert!(json.contains("ok"));
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let snapshot = StatsSnapshot {
            hits: 80,
            misses: 20,
            expirations: 5,
            total_entries: 100,
        };
        let resp = StatsResponse::from_snapshot(&snapshot);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::from_snapshot(&StatsSnapshot::default());
        assert_eq!(resp.hit_rate, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
