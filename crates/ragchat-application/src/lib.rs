//! Application layer for ragchat.
//!
//! Coordinates the identity, navigation, transcript and session list on top
//! of the `ChatBackend` and `IdentityRepository` seams from `ragchat-core`.

pub mod auth_store;
pub mod chat_app;

#[cfg(test)]
mod test_support;

pub use auth_store::AuthStore;
pub use chat_app::{ChatApp, ServiceReport, SubmitOutcome};
