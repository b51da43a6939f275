//! Navigation state for the client.
//!
//! The client is either on the homepage or inside one chat. Being inside a
//! chat always means having a session id, so the two are one tagged union
//! rather than a view flag next to an optional id.

/// Text typed on the homepage that must be sent once the new chat opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMessage(String);

impl PendingMessage {
    /// Returns `None` for blank text; a blank homepage submission opens an
    /// empty chat.
    pub fn new(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Which top-level view is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Welcome screen; no active session.
    Home,
    /// A transcript for `session_id`, optionally with a one-shot message to send.
    Chat {
        session_id: String,
        pending: Option<PendingMessage>,
    },
}

impl Default for ViewState {
    fn default() -> Self {
        Self::Home
    }
}

impl ViewState {
    pub fn select_home(&mut self) {
        *self = Self::Home;
    }

    pub fn select_session(&mut self, session_id: impl Into<String>) {
        *self = Self::Chat {
            session_id: session_id.into(),
            pending: None,
        };
    }

    /// Enters a freshly created session, remembering the homepage text (if any).
    pub fn session_created(&mut self, session_id: impl Into<String>, initial: Option<&str>) {
        *self = Self::Chat {
            session_id: session_id.into(),
            pending: initial.and_then(PendingMessage::new),
        };
    }

    /// Hands out the pending message at most once.
    pub fn take_pending(&mut self) -> Option<PendingMessage> {
        match self {
            Self::Chat { pending, .. } => pending.take(),
            Self::Home => None,
        }
    }

    /// Back to the initial state; used when the identity changes.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn active_session_id(&self) -> Option<&str> {
        match self {
            Self::Chat { session_id, .. } => Some(session_id),
            Self::Home => None,
        }
    }

    pub fn is_home(&self) -> bool {
        matches!(self, Self::Home)
    }
}
