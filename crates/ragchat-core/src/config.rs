//! Client configuration.

use serde::{Deserialize, Serialize};

use crate::error::{RagchatError, Result};
use crate::sidebar::MAX_SESSIONS;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Settings read from `config.toml`, then overridden from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the chat service.
    pub base_url: String,
    /// Messages fetched when a session is opened.
    pub history_limit: usize,
    /// Rows shown in the session list (never more than 10).
    pub session_list_limit: usize,
    /// Per-request timeout; `None` leaves the transport default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            session_list_limit: MAX_SESSIONS,
            request_timeout_secs: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Applies `RAGCHAT_*` overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("RAGCHAT_BASE_URL") {
            self.base_url = url;
        }
        if let Some(limit) = lookup("RAGCHAT_HISTORY_LIMIT") {
            self.history_limit = parse_number("RAGCHAT_HISTORY_LIMIT", &limit)?;
        }
        if let Some(secs) = lookup("RAGCHAT_TIMEOUT_SECS") {
            self.request_timeout_secs = Some(parse_number("RAGCHAT_TIMEOUT_SECS", &secs)?);
        }
        if let Some(level) = lookup("RAGCHAT_LOG") {
            self.log_level = level;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(RagchatError::config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.history_limit == 0 {
            return Err(RagchatError::config("history_limit must be at least 1"));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| RagchatError::config(format!("{key} must be a number, got '{raw}'")))
}
