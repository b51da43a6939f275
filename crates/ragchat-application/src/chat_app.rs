//! Top-level client state.
//!
//! `ChatApp` ties the identity, the view router, the transcript and the
//! session list together. Front ends own one instance and drive it through
//! `&mut self` calls; every backend round trip is awaited inside the call
//! that started it.

use std::sync::Arc;

use ragchat_core::backend::{ChatBackend, ServiceStatus};
use ragchat_core::config::ClientConfig;
use ragchat_core::error::Result;
use ragchat_core::identity::IdentityRepository;
use ragchat_core::sidebar::{SessionList, SessionRow};
use ragchat_core::transcript::{SubmitRejection, Transcript};
use ragchat_core::user::User;
use ragchat_core::view::ViewState;

use crate::auth_store::AuthStore;

/// How a submitted line ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was sent.
    Rejected(SubmitRejection),
    /// The placeholder now holds the reply.
    Answered { placeholder_id: String },
    /// The placeholder now holds the error reply.
    Failed { placeholder_id: String },
    /// The transcript moved on before the reply arrived.
    Discarded,
}

/// Result of the connectivity probe and the health check.
#[derive(Debug)]
pub struct ServiceReport {
    pub probe: Result<ServiceStatus>,
    pub health: Result<ServiceStatus>,
}

pub struct ChatApp {
    backend: Arc<dyn ChatBackend>,
    auth: AuthStore,
    view: ViewState,
    transcript: Transcript,
    sessions: SessionList,
    /// Bumped whenever the session list must be fetched again.
    refresh: u64,
    history_limit: usize,
}

impl ChatApp {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        identities: Arc<dyn IdentityRepository>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            auth: AuthStore::new(backend.clone(), identities),
            backend,
            view: ViewState::default(),
            transcript: Transcript::new(),
            sessions: SessionList::with_limit(config.session_list_limit),
            refresh: 0,
            history_limit: config.history_limit.max(1),
        }
    }

    /// Resolves the identity and loads its session list.
    pub async fn start(&mut self) {
        self.auth.initialize().await;
        self.sync_sessions().await;
    }

    pub fn user(&self) -> Option<&User> {
        self.auth.user()
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn sessions(&self) -> &SessionList {
        &self.sessions
    }

    pub fn refresh_counter(&self) -> u64 {
        self.refresh
    }

    /// Sidebar rows with the active session highlighted.
    pub fn session_rows(&self) -> Vec<SessionRow<'_>> {
        self.sessions.rows(self.view.active_session_id())
    }

    pub fn select_home(&mut self) {
        self.view.select_home();
        self.transcript.clear();
    }

    /// Opens an existing session and loads its history.
    ///
    /// Selecting the session that is already open does nothing.
    pub async fn select_session(&mut self, session_id: &str) {
        if self.view.active_session_id() == Some(session_id) {
            return;
        }
        tracing::info!(session_id, "Switching session");
        self.view.select_session(session_id);
        self.load_history(session_id).await;
    }

    /// Asks the backend for a new session and opens it.
    ///
    /// Non-blank `initial` text is sent as the first prompt, once. Returns
    /// `false` if the backend refused; nothing changes in that case.
    pub async fn new_chat(&mut self, initial: Option<&str>) -> bool {
        let user_id = self.auth.user_id().to_string();
        let session_id = match self.backend.create_session(&user_id).await {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Error creating session: {}", e);
                return false;
            }
        };
        tracing::info!(session_id = %session_id, "Created session");

        self.view.session_created(&session_id, initial);
        self.refresh += 1;
        self.sync_sessions().await;
        self.load_history(&session_id).await;

        if let Some(pending) = self.view.take_pending() {
            self.submit(pending.as_str()).await;
        }
        true
    }

    /// Sends `input` as a prompt in the open session.
    ///
    /// The transcript gets the user's line and a loading placeholder before
    /// the request goes out; the placeholder is finalized when it returns.
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        let pending = match self.transcript.begin_submit(input) {
            Ok(pending) => pending,
            Err(rejection) => return SubmitOutcome::Rejected(rejection),
        };

        let reply = self
            .backend
            .send_prompt(&pending.session_id, &pending.prompt)
            .await;
        let failed = reply.is_err();
        if let Err(e) = &reply {
            tracing::warn!(session_id = %pending.session_id, "Error sending message: {}", e);
        }

        if !self.transcript.resolve_reply(&pending, reply) {
            tracing::debug!(placeholder = %pending.placeholder_id, "Reply arrived for a closed transcript");
            return SubmitOutcome::Discarded;
        }

        let placeholder_id = pending.placeholder_id;
        if failed {
            SubmitOutcome::Failed { placeholder_id }
        } else {
            SubmitOutcome::Answered { placeholder_id }
        }
    }

    /// Fetches the session list if the user or the refresh counter changed
    /// since the last load.
    pub async fn sync_sessions(&mut self) {
        let user_id = self.auth.user_id().to_string();
        if user_id.is_empty() || !self.sessions.needs_reload(&user_id, self.refresh) {
            return;
        }

        match self.backend.list_sessions(&user_id).await {
            Ok(list) => {
                tracing::debug!(count = list.len(), "Loaded sessions");
                self.sessions.replace(&user_id, self.refresh, list);
            }
            Err(e) => {
                tracing::warn!("Error loading sessions: {}", e);
                self.sessions.mark_failed(&user_id, self.refresh);
            }
        }
    }

    /// Forces the next session list load.
    pub async fn refresh_sessions(&mut self) {
        self.refresh += 1;
        self.sync_sessions().await;
    }

    /// Deletes a session; closes it first if it is open.
    pub async fn delete_session(&mut self, session_id: &str) -> Result<()> {
        self.backend.delete_session(session_id).await?;
        tracing::info!(session_id, "Deleted session");
        if self.view.active_session_id() == Some(session_id) {
            self.select_home();
        }
        self.refresh_sessions().await;
        Ok(())
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        self.auth.login(email, password).await?;
        self.reset().await;
        Ok(())
    }

    pub async fn register(&mut self, email: &str, password: &str, name: &str) -> Result<()> {
        self.auth.register(email, password, name).await?;
        self.reset().await;
        Ok(())
    }

    /// Signs out and starts over as a new guest on the homepage.
    pub async fn logout(&mut self) {
        self.auth.logout().await;
        self.reset().await;
    }

    pub async fn status(&self) -> ServiceReport {
        ServiceReport {
            probe: self.backend.probe().await,
            health: self.backend.health().await,
        }
    }

    async fn load_history(&mut self, session_id: &str) {
        let ticket = self.transcript.begin_load(session_id);
        match self.backend.history(session_id, self.history_limit).await {
            Ok(history) => {
                if !self.transcript.apply_history(&ticket, history) {
                    tracing::debug!(session_id, "Dropped stale history");
                }
            }
            Err(e) => tracing::warn!(session_id, "Error loading messages: {}", e),
        }
    }

    async fn reset(&mut self) {
        self.view.reset();
        self.transcript.clear();
        self.sessions.invalidate();
        self.sync_sessions().await;
    }
}
