//! Domain layer for the ragchat client.
//!
//! Everything in this crate is free of I/O: the identity and message models,
//! the view state machine, the transcript and session-list models, and the
//! traits that the infrastructure and interaction crates implement.

pub mod backend;
pub mod config;
pub mod error;
pub mod identity;
pub mod session;
pub mod sidebar;
pub mod transcript;
pub mod user;
pub mod view;

// Re-export common error type
pub use error::RagchatError;
