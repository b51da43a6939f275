//! Wire shapes of the chatbot service that have no domain counterpart.
//!
//! Users, sessions and history messages deserialize straight into the
//! `ragchat-core` models; only envelopes and request bodies live here.

use ragchat_core::session::{ChatSession, Message};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct PromptRequest<'a> {
    pub prompt: &'a str,
    pub session_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct PromptResponse {
    #[serde(rename = "userPrompt", default)]
    pub user_prompt: String,
    pub llm_response: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub session_id: Option<String>,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<ChatSession>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionRequest<'a> {
    pub user_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub name: &'a str,
}

/// FastAPI error body. `detail` is a string for `HTTPException` and a list
/// of objects for request validation failures.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub detail: Value,
}

impl ErrorResponse {
    pub fn detail_text(&self) -> String {
        match &self.detail {
            Value::String(text) => text.clone(),
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}
