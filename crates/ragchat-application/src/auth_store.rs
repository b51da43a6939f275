//! Current identity of the client.
//!
//! The store resolves who the client is acting as: a registered account when
//! the backend accepts the persisted auth cookie, otherwise a guest backed by
//! a locally stored anonymous id.

use std::sync::Arc;

use ragchat_core::RagchatError;
use ragchat_core::backend::ChatBackend;
use ragchat_core::error::Result;
use ragchat_core::identity::{IdentityRepository, LocalIdentity};
use ragchat_core::user::{User, generate_anonymous_id};

pub struct AuthStore {
    backend: Arc<dyn ChatBackend>,
    identities: Arc<dyn IdentityRepository>,
    local: LocalIdentity,
    user: Option<User>,
}

impl AuthStore {
    pub fn new(backend: Arc<dyn ChatBackend>, identities: Arc<dyn IdentityRepository>) -> Self {
        Self {
            backend,
            identities,
            local: LocalIdentity::default(),
            user: None,
        }
    }

    /// Resolves the active user.
    ///
    /// Never fails: an unreadable identity file, an unreachable backend or a
    /// rejected cookie all end with a guest identity.
    pub async fn initialize(&mut self) -> &User {
        self.local = match self.identities.load().await {
            Ok(local) => local,
            Err(e) => {
                tracing::warn!("Failed to read local identity, starting fresh: {}", e);
                LocalIdentity::default()
            }
        };

        if let Some(cookie) = &self.local.auth_cookie {
            self.backend.restore_auth_cookie(cookie);
        }

        match self.backend.current_user().await {
            Ok(user) if !user.is_anonymous() => {
                tracing::info!(user_id = %user.id, "Restored login");
                self.user.insert(user)
            }
            Ok(_) => self.become_guest(false).await,
            Err(e) => {
                if e.is_unauthorized() {
                    tracing::debug!("No authenticated user");
                } else {
                    tracing::warn!("Could not resolve current user: {}", e);
                }
                if e.is_unauthorized() && self.local.auth_cookie.is_some() {
                    self.local.auth_cookie = None;
                    self.backend.clear_auth_cookie();
                }
                self.become_guest(false).await
            }
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Id used for session calls; empty until [`initialize`](Self::initialize) ran.
    pub fn user_id(&self) -> &str {
        self.user.as_ref().map(|u| u.id.as_str()).unwrap_or_default()
    }

    pub fn is_anonymous(&self) -> bool {
        self.user.as_ref().is_none_or(User::is_anonymous)
    }

    /// The stored guest id, if the client is (or was last) a guest.
    pub fn anonymous_user_id(&self) -> Option<&str> {
        self.local.anonymous_user_id.as_deref()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User> {
        let email = require("email", email)?;
        let password = require("password", password)?;

        let user = self.backend.login(email, password).await?;
        tracing::info!(user_id = %user.id, "Logged in");
        Ok(self.adopt_account(user).await)
    }

    /// Creates an account, handing the guest id over so the backend can move
    /// the guest's sessions to it.
    pub async fn register(&mut self, email: &str, password: &str, name: &str) -> Result<&User> {
        let email = require("email", email)?;
        let password = require("password", password)?;
        let name = require("name", name)?;

        let guest = self.local.anonymous_user_id.clone();
        let user = self
            .backend
            .register(email, password, name, guest.as_deref())
            .await?;
        tracing::info!(user_id = %user.id, migrated_from = ?guest, "Registered");
        Ok(self.adopt_account(user).await)
    }

    /// Ends the backend session and switches to a brand new guest.
    ///
    /// A failed backend call is logged; the local state is cleared anyway.
    pub async fn logout(&mut self) -> &User {
        if let Err(e) = self.backend.logout().await {
            tracing::warn!("Logout request failed: {}", e);
        }
        self.backend.clear_auth_cookie();
        self.local.auth_cookie = None;
        let guest = self.become_guest(true).await;
        tracing::info!(user_id = %guest.id, "Logged out");
        guest
    }

    async fn adopt_account(&mut self, user: User) -> &User {
        self.local.anonymous_user_id = None;
        self.local.auth_cookie = self.backend.auth_cookie();
        self.persist().await;
        self.user.insert(user)
    }

    async fn become_guest(&mut self, fresh: bool) -> &User {
        let existing = if fresh {
            None
        } else {
            self.local.anonymous_user_id.clone()
        };
        let id = match existing {
            Some(id) => id,
            None => {
                let id = generate_anonymous_id();
                self.local.anonymous_user_id = Some(id.clone());
                self.persist().await;
                id
            }
        };
        self.user.insert(User::anonymous(id))
    }

    async fn persist(&self) {
        if let Err(e) = self.identities.save(&self.local).await {
            tracing::warn!("Failed to save local identity: {}", e);
        }
    }
}

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(RagchatError::invalid_input(format!("{field} is required")))
    } else {
        Ok(value)
    }
}
