//! API Handlers
//!
//! HTTP request handlers for the message-board endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, Json};

use crate::board::{profiles::directory_over, MessageLog, ProfileDirectory};
use crate::cache::MemoryDriver;
use crate::error::ApiError;
use crate::models::{
    EnrichedMessage, HealthResponse, PostMessageRequest, PostMessageResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache is an injected handle owned here, not ambient global state;
/// its lifetime is the state's.
#[derive(Clone)]
pub struct AppState {
    /// Flat-file message store
    pub log: Arc<MessageLog>,
    /// User directory with memoized lookups
    pub profiles: Arc<ProfileDirectory>,
    /// The storage driver, kept for stats and the background sweep
    pub driver: Arc<MemoryDriver>,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(
        log: Arc<MessageLog>,
        profiles: Arc<ProfileDirectory>,
        driver: Arc<MemoryDriver>,
    ) -> Self {
        Self {
            log,
            profiles,
            driver,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        let driver = Arc::new(MemoryDriver::new());
        let profiles = directory_over(
            driver.clone(),
            config.profile_ttl,
            Duration::from_millis(config.profile_lookup_latency_ms),
        );

        Self::new(
            Arc::new(MessageLog::new(config.message_log.clone())),
            Arc::new(profiles),
            driver,
        )
    }

    /// Loads the message log and annotates every entry with its author's
    /// profile, newest message first.
    ///
    /// Profile resolution may block on a cache miss, so callers on an async
    /// runtime should run this on a blocking thread.
    pub fn build_feed(&self) -> Result<Vec<EnrichedMessage>, ApiError> {
        let messages = self.log.load()?;

        let mut feed = Vec::with_capacity(messages.len());
        for message in messages {
            let user = self.profiles.profile(message.user_id)?;
            feed.push(EnrichedMessage::new(message, user));
        }

        feed.reverse();
        Ok(feed)
    }
}

/// Handler for GET /messages
///
/// Returns the full message feed, newest first, each entry enriched with
/// its author's cached profile.
pub async fn get_messages_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<EnrichedMessage>>, ApiError> {
    // Cache misses pay the directory latency; keep that off the runtime
    let feed = tokio::task::spawn_blocking(move || state.build_feed())
        .await
        .map_err(|err| ApiError::Internal(format!("feed task failed: {err}")))??;

    Ok(Json(feed))
}

/// Handler for POST /messages
///
/// Appends a message to the log. No cache interaction.
pub async fn post_message_handler(
    State(state): State<AppState>,
    Json(req): Json<PostMessageRequest>,
) -> Result<Json<PostMessageResponse>, ApiError> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    state.log.append(req.user_id, req.text)?;

    Ok(Json(PostMessageResponse::ok()))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, ApiError> {
    let snapshot = state.driver.stats()?;

    Ok(Json(StatsResponse::from_snapshot(&snapshot)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
