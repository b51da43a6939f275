//! Locally persisted identity state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What the client keeps between runs.
///
/// `anonymous_user_id` is present while the user is a guest and removed on
/// login or registration. `auth_cookie` holds the backend's session cookie so
/// a login survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalIdentity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymous_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_cookie: Option<String>,
}

/// Repository for the local identity file.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Loads the stored identity; a missing file yields the default.
    async fn load(&self) -> Result<LocalIdentity>;

    async fn save(&self, identity: &LocalIdentity) -> Result<()>;
}
