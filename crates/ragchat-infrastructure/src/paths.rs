//! Path management for ragchat's local files.

use std::path::PathBuf;

use ragchat_core::RagchatError;

const APP_DIR: &str = "ragchat";

/// Where ragchat keeps its files.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/ragchat/
/// ├── config.toml      # Client configuration
/// └── identity.toml    # Guest id and auth cookie
/// ```
///
/// The root can be overridden (`--config-dir`), which tests use to stay
/// inside a temporary directory.
#[derive(Debug, Clone)]
pub struct RagchatPaths {
    root: PathBuf,
}

impl RagchatPaths {
    /// Uses the platform config directory (XDG on Linux).
    pub fn platform_default() -> Result<Self, RagchatError> {
        let base = dirs::config_dir()
            .ok_or_else(|| RagchatError::config("Cannot find the configuration directory"))?;
        Ok(Self::with_root(base.join(APP_DIR)))
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// The terminal counterpart of the browser's local storage.
    pub fn identity_file(&self) -> PathBuf {
        self.root.join("identity.toml")
    }
}
