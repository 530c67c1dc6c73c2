use anyhow::{Context as _, Result};
use seedline_application::ClientApp;
use seedline_core::config::ClientConfig;
use seedline_infrastructure::{ConfigStorage, FileCredentialStore, SeedlinePaths};
use std::path::PathBuf;
use std::sync::Arc;

pub mod auth;
pub mod config;
pub mod files;
pub mod nodes;

/// Options shared by every subcommand.
pub struct Context {
    pub config_dir: Option<PathBuf>,
    pub base_url: Option<String>,
}

impl Context {
    pub fn paths(&self) -> SeedlinePaths {
        SeedlinePaths::new(self.config_dir.as_deref())
    }

    pub fn config_storage(&self) -> Result<ConfigStorage> {
        let path = self
            .paths()
            .config_file()
            .context("Cannot resolve config file")?;
        Ok(ConfigStorage::with_path(path))
    }

    /// Effective configuration: file, then environment, then `--base-url`.
    pub fn load_config(&self) -> Result<ClientConfig> {
        let mut config = self.config_storage()?.load_with_env()?;
        if let Some(url) = &self.base_url {
            config.base_url = Some(url.clone());
        }
        Ok(config)
    }

    pub fn open_app(&self) -> Result<ClientApp> {
        let config = self.load_config()?;
        let session_file = self
            .paths()
            .session_file()
            .context("Cannot resolve session file")?;
        let store = Arc::new(FileCredentialStore::with_path(session_file));
        Ok(ClientApp::bootstrap(config, store)?)
    }

    /// App for commands that make their own requests and exit. Route changes
    /// do not start background polling.
    pub fn open_app_once(&self) -> Result<ClientApp> {
        let app = self.open_app()?;
        app.shutdown();
        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_base_url_flag_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("config.toml"),
            "base_url = \"http://10.0.0.1:5001\"\n",
        )
        .unwrap();

        let ctx = Context {
            config_dir: Some(temp_dir.path().to_path_buf()),
            base_url: Some("http://127.0.0.1:9000".to_string()),
        };
        let config = ctx.load_config().unwrap();
        assert_eq!(config.resolve_base_url(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn test_open_app_without_session_starts_on_login() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = Context {
            config_dir: Some(temp_dir.path().to_path_buf()),
            base_url: None,
        };
        let app = ctx.open_app().unwrap();
        assert!(!app.session().is_authenticated());
        assert_eq!(
            seedline_core::Navigator::current(app.router().as_ref()),
            seedline_core::Route::Login
        );
    }
}
