//! HTTP access to the RAG chatbot service.
//!
//! [`ApiClient`] implements [`ragchat_core::backend::ChatBackend`] on top of
//! reqwest. Request and response bodies are passed through with no retries
//! and no caching; the only state kept is the backend's auth cookie.

pub mod api_client;
pub mod dto;

pub use api_client::ApiClient;
