//! The remote chat service as seen by the client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::{ChatSession, Message};
use crate::user::User;

/// Reply of the connectivity probe and the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub message: String,
}

/// Every operation the client needs from the backend.
///
/// Implementations are plain request wrappers: no retries, no caching. The
/// only state they may hold is the backend's auth cookie.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `GET /`
    async fn probe(&self) -> Result<ServiceStatus>;

    /// `GET /health`
    async fn health(&self) -> Result<ServiceStatus>;

    /// Resolves the logged-in user from the auth cookie.
    ///
    /// Fails with a 401 [`RagchatError::Http`](crate::RagchatError::Http) when
    /// nobody is logged in.
    async fn current_user(&self) -> Result<User>;

    async fn login(&self, email: &str, password: &str) -> Result<User>;

    /// Creates an account. A guest id, when given, lets the backend move the
    /// guest's sessions to the new account.
    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        anonymous_user_id: Option<&str>,
    ) -> Result<User>;

    async fn logout(&self) -> Result<()>;

    /// Returns the id of the new (or, for guests, recycled) session.
    async fn create_session(&self, user_id: &str) -> Result<String>;

    /// Sessions of `user_id`, newest first. Callers truncate the list.
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>>;

    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// Oldest-first history of a session, at most `limit` entries.
    async fn history(&self, session_id: &str, limit: usize) -> Result<Vec<Message>>;

    /// Sends a prompt and returns the generated reply text.
    async fn send_prompt(&self, session_id: &str, prompt: &str) -> Result<String>;

    /// The session cookie to persist, if the backend has set one.
    fn auth_cookie(&self) -> Option<String>;

    /// Re-installs a cookie saved by an earlier run.
    fn restore_auth_cookie(&self, cookie: &str);

    /// Forgets the session cookie locally, whatever the backend said.
    fn clear_auth_cookie(&self);
}
