//! Message Log Module
//!
//! Append-only flat-file JSON storage for board messages. The whole log is
//! one JSON array; appends rewrite the file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

// == Message ==
/// A single board message as stored in the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Author's user id
    pub user_id: u32,
    /// Message text
    pub text: String,
    /// Posted-at Unix timestamp in seconds
    pub time: i64,
}

// == Message Log ==
/// Flat-file JSON message store.
///
/// Reads tolerate a missing file (empty log). Appends are serialized by an
/// internal mutex so concurrent posts cannot interleave the
/// read-modify-rewrite cycle.
#[derive(Debug)]
pub struct MessageLog {
    path: PathBuf,
    write_guard: Mutex<()>,
}

impl MessageLog {
    // == Constructor ==
    /// Creates a message log stored at the given path.
    ///
    /// The file is created lazily on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_guard: Mutex::new(()),
        }
    }

    /// Returns the log's file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // == Load ==
    /// Reads all messages in append order (oldest first).
    pub fn load(&self) -> io::Result<Vec<Message>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    // == Append ==
    /// Appends a message and returns it with its assigned timestamp.
    pub fn append(&self, user_id: u32, text: String) -> io::Result<Message> {
        let _guard = self
            .write_guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut messages = self.load()?;
        let message = Message {
            user_id,
            text,
            time: chrono::Utc::now().timestamp(),
        };
        messages.push(message.clone());

        let raw = serde_json::to_string(&messages)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(&self.path, raw)?;

        Ok(message)
    }
}
