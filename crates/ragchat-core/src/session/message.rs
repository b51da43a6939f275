//! Transcript message types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// Message typed by the person at the terminal.
    #[serde(rename = "user")]
    User,
    /// Reply generated by the backend (`"ai"` on the wire).
    #[serde(rename = "ai", alias = "assistant")]
    Assistant,
}

/// A single entry of the active transcript.
///
/// Messages live only in memory; they are reloaded from the backend whenever
/// the active session changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "type")]
    pub role: MessageRole,
    pub content: String,
    /// Creation time (ISO 8601 format).
    #[serde(default = "now_rfc3339")]
    pub timestamp: String,
    /// Set while an assistant reply is outstanding.
    #[serde(default, skip_serializing)]
    pub loading: bool,
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl Message {
    /// A finalized message typed by the user.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: format!("user-{}", Uuid::new_v4()),
            role: MessageRole::User,
            content: content.into(),
            timestamp: now_rfc3339(),
            loading: false,
        }
    }

    /// An empty assistant message standing in for a reply still in flight.
    pub fn placeholder() -> Self {
        Self {
            id: format!("ai-{}", Uuid::new_v4()),
            role: MessageRole::Assistant,
            content: String::new(),
            timestamp: now_rfc3339(),
            loading: true,
        }
    }

    /// A finalized message from history or another source.
    pub fn finalized(id: impl Into<String>, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            content: content.into(),
            timestamp: now_rfc3339(),
            loading: false,
        }
    }
}
