//! Client configuration storage.
//!
//! Manages `~/.config/seedline/config.toml`. A missing file is not an error:
//! the built-in defaults apply until the user writes one.

use super::atomic_file::{AtomicFile, FileFormat};
use crate::paths::SeedlinePaths;
use seedline_core::config::ClientConfig;
use seedline_core::{Result, SeedlineError};
use std::path::PathBuf;

/// Storage for config.toml.
pub struct ConfigStorage {
    file: AtomicFile<ClientConfig>,
}

impl ConfigStorage {
    /// Creates storage at the default location.
    pub fn new() -> Result<Self> {
        let path = SeedlinePaths::new(None)
            .config_file()
            .map_err(|e| SeedlineError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates storage at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(path, FileFormat::Toml),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    /// Loads the configuration, falling back to defaults if the file is absent.
    pub fn load(&self) -> Result<ClientConfig> {
        match self.file.load() {
            Ok(Some(config)) => {
                tracing::debug!("[ConfigStorage] Loaded {}", self.file.path().display());
                Ok(config)
            }
            Ok(None) => {
                tracing::debug!(
                    "[ConfigStorage] No config at {}, using defaults",
                    self.file.path().display()
                );
                Ok(ClientConfig::default())
            }
            Err(e) => Err(SeedlineError::config(format!(
                "Failed to read {}: {}",
                self.file.path().display(),
                e
            ))),
        }
    }

    /// Loads the configuration and applies `SEEDLINE_*` environment overrides.
    pub fn load_with_env(&self) -> Result<ClientConfig> {
        let mut config = self.load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        self.file.save(config).map_err(Into::into)
    }
}
