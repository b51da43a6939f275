//! ChatSession domain model.

use serde::{Deserialize, Serialize};

/// A conversation thread tracked by the backend.
///
/// The client only ever holds a read-only copy of the most recent sessions;
/// the backend owns titles and counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Opaque session identifier
    #[serde(rename = "session_id")]
    pub id: String,
    /// Human-readable title ("New Chat" until the backend renames it)
    pub title: String,
    /// Last update as reported by the backend (ISO 8601, may lack an offset)
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Number of messages stored in the session
    #[serde(default)]
    pub message_count: u32,
}
