//! Configuration loading.
//!
//! Reads `config.toml` under the ragchat config directory and layers the
//! `RAGCHAT_*` environment variables on top.

use ragchat_core::config::ClientConfig;
use ragchat_core::error::Result;

use crate::paths::RagchatPaths;
use crate::storage::AtomicTomlFile;

pub struct ConfigService {
    file: AtomicTomlFile<ClientConfig>,
}

impl ConfigService {
    pub fn new(paths: &RagchatPaths) -> Self {
        Self {
            file: AtomicTomlFile::new(paths.config_file()),
        }
    }

    /// File values (or defaults when absent), then environment overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    pub fn load_with_env<F>(&self, lookup: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match self.file.load()? {
            Some(config) => {
                tracing::debug!(path = %self.file.path().display(), "loaded config file");
                config
            }
            None => ClientConfig::default(),
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Writes `config` back, creating the directory if needed.
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        config.validate()?;
        self.file.save(config)
    }
}
