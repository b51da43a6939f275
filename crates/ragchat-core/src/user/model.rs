//! User domain model.

use serde::{Deserialize, Serialize};

/// Display name given to every synthesized guest identity.
pub const GUEST_NAME: &str = "Guest";

/// Whether the identity is a local guest or an account known to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserKind {
    Anonymous,
    Registered,
}

/// The identity the client is currently acting as.
///
/// Exactly one `User` is active at a time; login and logout replace it
/// wholesale rather than mutating fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "user_id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "user_type")]
    pub kind: UserKind,
}

impl User {
    /// Builds the guest identity for a locally stored anonymous id.
    pub fn anonymous(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: String::new(),
            name: GUEST_NAME.to_string(),
            kind: UserKind::Anonymous,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.kind == UserKind::Anonymous
    }

    /// Name shown in headers; falls back to the email when the name is blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}
