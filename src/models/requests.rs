//! Request DTOs for the message-board API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Maximum accepted message length in characters
pub const MAX_MESSAGE_LENGTH: usize = 500;

/// Request body for posting a message (POST /messages)
///
/// # Fields
/// - `user_id`: Author's user id
/// - `text`: The message text
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    /// Author's user id
    pub user_id: u32,
    /// The message text
    pub text: String,
}

impl PostMessageRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.user_id == 0 {
            return Some("User id must be nonzero".to_string());
        }
        if self.text.trim().is_empty() {
            return Some("Message text cannot be empty".to_string());
        }
        if self.text.chars().count() > MAX_MESSAGE_LENGTH {
            return Some(format!(
                "Message exceeds maximum length of {} characters",
                MAX_MESSAGE_LENGTH
            ));
        }
        None
    }
}
