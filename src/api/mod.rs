//! API Module
//!
//! HTTP handlers and routing for the message-board REST API.
//!
//! # Endpoints
//! - `GET /messages` - The enriched message feed, newest first
//! - `POST /messages` - Append a message to the log
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
