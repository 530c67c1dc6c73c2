//! Unified path management for seedline files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/seedline/          # Config directory
//! ├── config.toml              # Client configuration
//! ├── session.json             # Persisted session (mode 600)
//! └── logs/                    # Optional CLI log files
//!     └── seedline.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "seedline";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path resolver for seedline.
///
/// With a base path every file lives directly under it (used by tests and by
/// `--config-dir`); otherwise the platform config directory is used.
#[derive(Debug, Clone, Default)]
pub struct SeedlinePaths {
    base: Option<PathBuf>,
}

impl SeedlinePaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the seedline configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to config.toml.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to session.json.
    ///
    /// # Security Note
    ///
    /// The file holds the bearer credential and is written with mode 600.
    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.json"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_dir_ends_with_app_name() {
        // Some CI sandboxes have no config dir at all
        if let Ok(dir) = SeedlinePaths::new(None).config_dir() {
            assert!(dir.ends_with("seedline"));
        }
    }

    #[test]
    fn test_base_path_overrides_everything() {
        let paths = SeedlinePaths::new(Some(Path::new("/tmp/seedline-test")));
        assert_eq!(
            paths.session_file().unwrap(),
            PathBuf::from("/tmp/seedline-test/session.json")
        );
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/seedline-test/config.toml")
        );
        assert!(paths.logs_dir().unwrap().ends_with("logs"));
    }
}
