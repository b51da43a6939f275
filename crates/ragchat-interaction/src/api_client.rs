//! ApiClient - REST client for the chatbot service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ragchat_core::RagchatError;
use ragchat_core::backend::{ChatBackend, ServiceStatus};
use ragchat_core::config::ClientConfig;
use ragchat_core::error::Result;
use ragchat_core::session::{ChatSession, Message};
use ragchat_core::user::User;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::dto::{
    CreateSessionRequest, CreateSessionResponse, ErrorResponse, HistoryResponse, LoginRequest,
    PromptRequest, PromptResponse, RegisterRequest, SessionsResponse,
};

/// Client for the chatbot REST API.
///
/// Cheap to clone; clones share the connection pool and the cookie jar.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl ApiClient {
    /// Builds a client for `base_url` with an optional request timeout.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| RagchatError::config(format!("invalid base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RagchatError::config(format!(
                "base URL '{base_url}' cannot have paths"
            )));
        }
        // Url::join treats a path without trailing slash as a file name.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let jar = Arc::new(Jar::default());
        let mut builder = Client::builder().cookie_provider(Arc::clone(&jar));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RagchatError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            jar,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    /// Base URL extended with percent-encoded path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RagchatError::config("base URL cannot have paths"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let request = request
            .build()
            .map_err(|e| RagchatError::internal(format!("failed to build request: {e}")))?;
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(%method, %url, "backend request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|err| map_transport_error(&err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            tracing::debug!(%method, %url, status = status.as_u16(), "backend rejected request");
            return Err(map_http_error(status, &body));
        }

        response.json::<T>().await.map_err(|err| {
            if err.is_decode() {
                RagchatError::Serialization {
                    format: "JSON".to_string(),
                    message: format!("unexpected response from {url}: {err}"),
                }
            } else {
                map_transport_error(&err)
            }
        })
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn probe(&self) -> Result<ServiceStatus> {
        let url = self.endpoint(&[])?;
        self.send(self.client.get(url)).await
    }

    async fn health(&self) -> Result<ServiceStatus> {
        let url = self.endpoint(&["health"])?;
        self.send(self.client.get(url)).await
    }

    async fn current_user(&self) -> Result<User> {
        let url = self.endpoint(&["api", "auth", "me"])?;
        self.send(self.client.get(url)).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<User> {
        let url = self.endpoint(&["api", "auth", "login"])?;
        let body = LoginRequest { email, password };
        self.send(self.client.post(url).json(&body)).await
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        anonymous_user_id: Option<&str>,
    ) -> Result<User> {
        let url = self.endpoint(&["api", "auth", "register"])?;
        let body = RegisterRequest {
            email,
            password,
            name,
        };
        let mut request = self.client.post(url).json(&body);
        if let Some(anonymous_user_id) = anonymous_user_id {
            request = request.query(&[("anonymous_user_id", anonymous_user_id)]);
        }
        self.send(request).await
    }

    async fn logout(&self) -> Result<()> {
        let url = self.endpoint(&["api", "auth", "logout"])?;
        let _: serde_json::Value = self.send(self.client.post(url)).await?;
        Ok(())
    }

    async fn create_session(&self, user_id: &str) -> Result<String> {
        let url = self.endpoint(&["api", "sessions"])?;
        let body = CreateSessionRequest { user_id };
        let response: CreateSessionResponse = self.send(self.client.post(url).json(&body)).await?;
        Ok(response.session_id)
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<ChatSession>> {
        let url = self.endpoint(&["api", "users", user_id, "sessions"])?;
        let response: SessionsResponse = self.send(self.client.get(url)).await?;
        Ok(response.sessions)
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let url = self.endpoint(&["api", "sessions", session_id])?;
        let _: serde_json::Value = self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn history(&self, session_id: &str, limit: usize) -> Result<Vec<Message>> {
        let url = self.endpoint(&["api", "chat", "messages", session_id])?;
        let request = self.client.get(url).query(&[("limit", limit)]);
        let response: HistoryResponse = self.send(request).await?;
        Ok(response.messages)
    }

    async fn send_prompt(&self, session_id: &str, prompt: &str) -> Result<String> {
        let url = self.endpoint(&["api", "chat", "prompt"])?;
        let body = PromptRequest { prompt, session_id };
        let response: PromptResponse = self.send(self.client.post(url).json(&body)).await?;
        Ok(response.llm_response)
    }

    fn auth_cookie(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .filter(|value| !value.is_empty())
    }

    fn restore_auth_cookie(&self, cookie: &str) {
        // Path=/ as the backend sets it; clearing relies on the same path.
        for pair in cookie.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar
                .add_cookie_str(&format!("{pair}; Path=/"), &self.base_url);
        }
    }

    fn clear_auth_cookie(&self) {
        let Some(current) = self.auth_cookie() else {
            return;
        };
        // An already expired cookie evicts the stored one with the same name and path.
        for name in current.split(';').filter_map(|pair| pair.split('=').next()) {
            let expired = format!("{}=; Max-Age=0; Path=/", name.trim());
            self.jar.add_cookie_str(&expired, &self.base_url);
        }
    }
}

fn map_transport_error(err: &reqwest::Error) -> RagchatError {
    if err.is_timeout() {
        RagchatError::transport(format!("request timed out: {err}"))
    } else {
        RagchatError::transport(err.to_string())
    }
}

/// Turns a non-success response into an error carrying the backend's detail.
pub fn map_http_error(status: StatusCode, body: &str) -> RagchatError {
    let detail = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.detail_text())
        .unwrap_or_else(|_| body.trim().to_string());
    RagchatError::http(status.as_u16(), detail)
}
