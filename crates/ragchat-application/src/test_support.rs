//! In-memory doubles for the backend and the identity file.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use ragchat_core::RagchatError;
use ragchat_core::backend::{ChatBackend, ServiceStatus};
use ragchat_core::error::Result;
use ragchat_core::identity::{IdentityRepository, LocalIdentity};
use ragchat_core::session::{ChatSession, Message, MessageRole};
use ragchat_core::user::{User, UserKind};

#[derive(Default)]
struct BackendState {
    online: bool,
    accounts: HashMap<String, (String, User)>,
    logged_in: Option<User>,
    cookie: Option<String>,
    sessions: HashMap<String, Vec<ChatSession>>,
    histories: HashMap<String, Vec<Message>>,
    next_session: u32,
    fail_create: bool,
    fail_prompt: bool,
    fail_logout: bool,
    register_calls: Vec<Option<String>>,
    prompts: Vec<(String, String)>,
    history_calls: Vec<(String, usize)>,
}

/// Backend that keeps everything in maps, mimicking the chat service.
pub struct MockBackend {
    state: Mutex<BackendState>,
}

impl MockBackend {
    pub fn online() -> Self {
        Self {
            state: Mutex::new(BackendState {
                online: true,
                ..Default::default()
            }),
        }
    }

    pub fn offline() -> Self {
        Self {
            state: Mutex::new(BackendState::default()),
        }
    }

    pub fn add_account(&self, email: &str, password: &str, user_id: &str, name: &str) {
        let user = User {
            id: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            kind: UserKind::Registered,
        };
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(email.to_string(), (password.to_string(), user));
    }

    pub fn add_sessions(&self, user_id: &str, count: usize) {
        let mut state = self.state.lock().unwrap();
        let list = state.sessions.entry(user_id.to_string()).or_default();
        for i in 0..count {
            list.push(ChatSession {
                id: format!("{user_id}-s{i}"),
                title: format!("Chat {i}"),
                updated_at: None,
                message_count: 0,
            });
        }
    }

    pub fn set_history(&self, session_id: &str, messages: &[(&str, MessageRole, &str)]) {
        let history = messages
            .iter()
            .map(|(id, role, content)| Message::finalized(*id, *role, *content))
            .collect();
        self.state
            .lock()
            .unwrap()
            .histories
            .insert(session_id.to_string(), history);
    }

    pub fn fail_create(&self) {
        self.state.lock().unwrap().fail_create = true;
    }

    pub fn fail_prompt(&self) {
        self.state.lock().unwrap().fail_prompt = true;
    }

    pub fn fail_logout(&self) {
        self.state.lock().unwrap().fail_logout = true;
    }

    pub fn register_calls(&self) -> Vec<Option<String>> {
        self.state.lock().unwrap().register_calls.clone()
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().prompts.clone()
    }

    pub fn history_calls(&self) -> Vec<(String, usize)> {
        self.state.lock().unwrap().history_calls.clone()
    }

    fn check_online(state: &BackendState) -> Result<()> {
        if state.online {
            Ok(())
        } else {
            Err(RagchatError::transport("connection refused"))
        }
    }

    fn sign_in(state: &mut BackendState, user: &User) {
        state.cookie = Some(format!("auth_token=token-{}", user.id));
        state.logged_in = Some(user.clone());
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn probe(&self) -> Result<ServiceStatus> {
        Self::check_online(&self.state.lock().unwrap())?;
        Ok(ServiceStatus {
            status: "running".to_string(),
            message: "RAG Chatbot API".to_string(),
        })
    }

    async fn health(&self) -> Result<ServiceStatus> {
        Self::check_online(&self.state.lock().unwrap())?;
        Ok(ServiceStatus {
            status: "healthy".to_string(),
            message: "ok".to_string(),
        })
    }

    async fn current_user(&self) -> Result<User> {
        let state = self.state.lock().unwrap();
        Self::check_online(&state)?;
        state
            .logged_in
            .clone()
            .ok_or_else(|| RagchatError::http(401, "Not authenticated"))
    }

    async fn login(&self, email: &str, password: &str) -> Result<User> {
        let mut state = self.state.lock().unwrap();
        Self::check_online(&state)?;
        let user = match state.accounts.get(email) {
            Some((stored, user)) if stored == password => user.clone(),
            _ => return Err(RagchatError::http(401, "Invalid email or password")),
        };
        Self::sign_in(&mut state, &user);
        Ok(user)
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        anonymous_user_id: Option<&str>,
    ) -> Result<User> {
        let mut state = self.state.lock().unwrap();
        Self::check_online(&state)?;
        state.register_calls.push(anonymous_user_id.map(str::to_string));
        if state.accounts.contains_key(email) {
            return Err(RagchatError::http(400, "Email already registered"));
        }
        let user = User {
            id: format!("user-{}", state.accounts.len() + 1),
            email: email.to_string(),
            name: name.to_string(),
            kind: UserKind::Registered,
        };
        if let Some(guest) = anonymous_user_id {
            let migrated = state.sessions.remove(guest).unwrap_or_default();
            state
                .sessions
                .entry(user.id.clone())
                .or_default()
                .extend(migrated);
        }
        state
            .accounts
            .insert(email.to_string(), (password.to_string(), user.clone()));
        Self::sign_in(&mut state, &user);
        Ok(user)
    }

    async fn logout(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_online(&state)?;
        if state.fail_logout {
            return Err(RagchatError::http(500, "logout failed"));
        }
        state.logged_in = None;
        state.cookie = None;
        Ok(())
    }

    async fn create_session(&self, user_id: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        Self::check_online(&state)?;
        if state.fail_create {
            return Err(RagchatError::http(500, "Failed to create session"));
        }
        state.next_session += 1;
        let id = format!("new-{}", state.next_session);
        state.sessions.entry(user_id.to_string()).or_default().insert(
            0,
            ChatSession {
                id: id.clone(),
                title: "New Chat".to_string(),
                updated_at: None,
                message_count: 0,
            },
        );
        Ok(id)
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>> {
        let state = self.state.lock().unwrap();
        Self::check_online(&state)?;
        Ok(state.sessions.get(user_id).cloned().unwrap_or_default())
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        Self::check_online(&state)?;
        let mut found = false;
        for list in state.sessions.values_mut() {
            let before = list.len();
            list.retain(|s| s.id != session_id);
            found |= list.len() != before;
        }
        if found {
            Ok(())
        } else {
            Err(RagchatError::http(404, "Session not found"))
        }
    }

    async fn history(&self, session_id: &str, limit: usize) -> Result<Vec<Message>> {
        let mut state = self.state.lock().unwrap();
        state.history_calls.push((session_id.to_string(), limit));
        Self::check_online(&state)?;
        let history = state.histories.get(session_id).cloned().unwrap_or_default();
        let skip = history.len().saturating_sub(limit);
        Ok(history.into_iter().skip(skip).collect())
    }

    async fn send_prompt(&self, session_id: &str, prompt: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        Self::check_online(&state)?;
        state
            .prompts
            .push((session_id.to_string(), prompt.to_string()));
        if state.fail_prompt {
            return Err(RagchatError::http(500, "Error generating response"));
        }
        Ok(format!("echo: {prompt}"))
    }

    fn auth_cookie(&self) -> Option<String> {
        self.state.lock().unwrap().cookie.clone()
    }

    fn restore_auth_cookie(&self, cookie: &str) {
        let mut state = self.state.lock().unwrap();
        let user = state
            .accounts
            .values()
            .map(|(_, user)| user.clone())
            .find(|user| cookie == format!("auth_token=token-{}", user.id));
        if let Some(user) = user {
            state.logged_in = Some(user);
        }
        state.cookie = Some(cookie.to_string());
    }

    fn clear_auth_cookie(&self) {
        let mut state = self.state.lock().unwrap();
        state.cookie = None;
        state.logged_in = None;
    }
}

/// Identity file kept in memory; counts writes.
#[derive(Default)]
pub struct MemoryIdentityRepository {
    identity: Mutex<LocalIdentity>,
    saves: Mutex<usize>,
}

impl MemoryIdentityRepository {
    pub fn with_identity(identity: LocalIdentity) -> Self {
        Self {
            identity: Mutex::new(identity),
            saves: Mutex::new(0),
        }
    }

    pub fn stored(&self) -> LocalIdentity {
        self.identity.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

#[async_trait]
impl IdentityRepository for MemoryIdentityRepository {
    async fn load(&self) -> Result<LocalIdentity> {
        Ok(self.identity.lock().unwrap().clone())
    }

    async fn save(&self, identity: &LocalIdentity) -> Result<()> {
        *self.identity.lock().unwrap() = identity.clone();
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}
