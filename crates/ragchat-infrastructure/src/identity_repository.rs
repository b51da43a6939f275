//! TOML-backed identity repository.

use std::path::PathBuf;

use async_trait::async_trait;
use ragchat_core::RagchatError;
use ragchat_core::error::Result;
use ragchat_core::identity::{IdentityRepository, LocalIdentity};

use crate::paths::RagchatPaths;
use crate::storage::AtomicTomlFile;

/// Stores [`LocalIdentity`] in `identity.toml`.
pub struct TomlIdentityRepository {
    path: PathBuf,
}

impl TomlIdentityRepository {
    pub fn new(paths: &RagchatPaths) -> Self {
        Self::with_path(paths.identity_file())
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl IdentityRepository for TomlIdentityRepository {
    async fn load(&self) -> Result<LocalIdentity> {
        let file = AtomicTomlFile::<LocalIdentity>::new(self.path.clone());
        tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| RagchatError::internal(format!("identity load task failed: {e}")))?
            .map(Option::unwrap_or_default)
    }

    async fn save(&self, identity: &LocalIdentity) -> Result<()> {
        let file = AtomicTomlFile::<LocalIdentity>::new(self.path.clone());
        let identity = identity.clone();
        tokio::task::spawn_blocking(move || file.save(&identity))
            .await
            .map_err(|e| RagchatError::internal(format!("identity save task failed: {e}")))??;

        tracing::debug!(path = %self.path.display(), "identity saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_is_empty_identity() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TomlIdentityRepository::new(&RagchatPaths::with_root(temp_dir.path()));

        assert_eq!(repo.load().await.unwrap(), LocalIdentity::default());
    }

    #[tokio::test]
    async fn test_save_and_clear_anonymous_id() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RagchatPaths::with_root(temp_dir.path());
        let repo = TomlIdentityRepository::new(&paths);

        let identity = LocalIdentity {
            anonymous_user_id: Some("anon_1_abcdefghi".to_string()),
            auth_cookie: None,
        };
        repo.save(&identity).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), identity);

        let raw = std::fs::read_to_string(paths.identity_file()).unwrap();
        assert!(raw.contains("anonymous_user_id"));
        assert!(!raw.contains("auth_cookie"));

        repo.save(&LocalIdentity::default()).await.unwrap();
        assert_eq!(repo.load().await.unwrap().anonymous_user_id, None);
    }

    #[tokio::test]
    async fn test_save_replaces_stored_identity() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TomlIdentityRepository::new(&RagchatPaths::with_root(temp_dir.path()));

        repo.save(&LocalIdentity {
            anonymous_user_id: None,
            auth_cookie: Some("auth_token=abc123".to_string()),
        })
        .await
        .unwrap();

        let guest = LocalIdentity {
            anonymous_user_id: Some("anon_2_zyxwvutsr".to_string()),
            auth_cookie: None,
        };
        repo.save(&guest).await.unwrap();
        assert_eq!(repo.load().await.unwrap(), guest);
    }
}
