//! In-memory transcript of the active chat.
//!
//! The transcript never talks to the network. Callers split every backend
//! round trip in two: a `begin_*` call that mutates local state and returns a
//! ticket, and an `apply_*`/`resolve_*` call that reconciles the response.
//! Tickets carry enough information to recognise answers that arrive after
//! the user has moved on.

use crate::session::{Message, MessageRole};

/// Content shown in place of a reply when the prompt request fails.
pub const ERROR_REPLY: &str = "Sorry, there was an error processing your request.";

/// Issued by [`Transcript::begin_load`]; must be handed back with the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTicket {
    pub session_id: String,
    generation: u64,
}

/// Issued by [`Transcript::begin_submit`]; the prompt that has to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub session_id: String,
    pub placeholder_id: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// Nothing but whitespace was entered.
    Blank,
    /// No session is open.
    NoSession,
    /// A previous prompt is still waiting for its reply.
    Busy,
}

#[derive(Debug, Default)]
pub struct Transcript {
    session_id: Option<String>,
    messages: Vec<Message>,
    generation: u64,
    in_flight: Option<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_waiting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Switches to `session_id`, dropping every message of the previous one.
    ///
    /// Bumps the generation so history for an earlier switch is ignored.
    pub fn begin_load(&mut self, session_id: impl Into<String>) -> HistoryTicket {
        let session_id = session_id.into();
        self.generation += 1;
        self.messages.clear();
        self.in_flight = None;
        self.session_id = Some(session_id.clone());
        HistoryTicket {
            session_id,
            generation: self.generation,
        }
    }

    /// Installs fetched history. Returns `false` when the ticket is stale.
    pub fn apply_history(&mut self, ticket: &HistoryTicket, history: Vec<Message>) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        // Keep anything sent while the history request was outstanding.
        let local = std::mem::take(&mut self.messages);
        self.messages = history;
        self.messages.extend(local);
        true
    }

    /// Drops everything, e.g. when returning to the homepage.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.session_id = None;
        self.messages.clear();
        self.in_flight = None;
    }

    /// Appends the user's message and a loading placeholder, in that order.
    pub fn begin_submit(&mut self, input: &str) -> Result<PendingReply, SubmitRejection> {
        let prompt = input.trim();
        if prompt.is_empty() {
            return Err(SubmitRejection::Blank);
        }
        let Some(session_id) = self.session_id.clone() else {
            return Err(SubmitRejection::NoSession);
        };
        if self.in_flight.is_some() {
            return Err(SubmitRejection::Busy);
        }

        self.messages.push(Message::user(prompt));
        let placeholder = Message::placeholder();
        let placeholder_id = placeholder.id.clone();
        self.messages.push(placeholder);
        self.in_flight = Some(placeholder_id.clone());

        Ok(PendingReply {
            session_id,
            placeholder_id,
            prompt: prompt.to_string(),
        })
    }

    /// Finalizes the placeholder with the reply, or with [`ERROR_REPLY`].
    ///
    /// Returns `false` if the placeholder no longer exists (the transcript was
    /// switched while the request was outstanding).
    pub fn resolve_reply<E>(&mut self, pending: &PendingReply, reply: Result<String, E>) -> bool {
        if self.in_flight.as_deref() == Some(pending.placeholder_id.as_str()) {
            self.in_flight = None;
        }
        let Some(message) = self
            .messages
            .iter_mut()
            .find(|m| m.id == pending.placeholder_id)
        else {
            return false;
        };

        message.content = reply.unwrap_or_else(|_| ERROR_REPLY.to_string());
        message.loading = false;
        true
    }

    /// Number of assistant messages, finalized or not.
    pub fn assistant_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::Assistant)
            .count()
    }
}
