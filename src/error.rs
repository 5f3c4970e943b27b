//! Error types for the cache library and the message-board service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Error kinds surfaced by the cache core.
///
/// None of these are retried internally; recovery is the caller's
/// responsibility. A storage failure is never downgraded to a miss, and a
/// decode failure never silently falls back to a default.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The storage backend is unreachable or failed mid-operation
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A value could not be encoded for storage, or a stored payload could
    /// not be decoded back
    #[error("serialization failed for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The value encodes to the JSON `null` sentinel, which is reserved as
    /// the cache's absence signal and must never be stored
    #[error("refusing to cache null for key '{0}'")]
    NullValue(String),

    /// The `remember` producer itself failed; nothing was stored
    #[error("producer failed for key '{key}'")]
    Producer {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

// == Api Error Enum ==
/// Error type for the HTTP service layer.
///
/// Wraps cache failures and message-log I/O so handlers can use `?`
/// uniformly.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A cache operation failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Reading or writing the message log failed
    #[error("message log I/O: {0}")]
    MessageLog(#[from] std::io::Error),

    /// Invalid request data
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Cache(CacheError::StorageUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Cache(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MessageLog(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_error_display() {
        let err = CacheError::StorageUnavailable("lock poisoned".to_string());
        assert_eq!(err.to_string(), "storage unavailable: lock poisoned");

        let err = CacheError::NullValue("user_profile:1".to_string());
        assert!(err.to_string().contains("user_profile:1"));
    }

    #[test]
    fn test_producer_error_keeps_source() {
        let err = CacheError::Producer {
            key: "k".to_string(),
            source: anyhow::anyhow!("database down"),
        };
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "database down");
    }

    #[test]
    fn test_api_error_status_codes() {
        let resp = ApiError::InvalidRequest("bad".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiError::Cache(CacheError::StorageUnavailable("down".to_string()))
            .into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let resp = ApiError::Internal("oops".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
