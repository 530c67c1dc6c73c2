//! Client configuration model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Fallback backend address when neither an explicit base URL nor a port
/// mapping applies.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001/";

/// Prefix of every backend endpoint.
pub const API_V1: &str = "api/v1/";

/// How the login endpoint expects credentials.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoginVariant {
    /// JSON `{username, password}` body; the reply carries the token.
    Json,
    /// `Authorization: Basic base64(user:pass)`; the digest itself becomes the token.
    Basic,
}

impl Default for LoginVariant {
    fn default() -> Self {
        LoginVariant::Basic
    }
}

/// Refresh policy per list view. `None` means fetch once on activation.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ViewSettings {
    pub catalog_poll_secs: Option<u64>,
    pub my_files_poll_secs: Option<u64>,
    pub nodes_poll_secs: Option<u64>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            catalog_poll_secs: Some(5),
            my_files_poll_secs: None,
            nodes_poll_secs: None,
        }
    }
}

/// Third-party messaging API reached with its own access token.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct MessagingConfig {
    pub base_url: Option<String>,
    pub access_token: Option<String>,
}

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Explicit backend address. Takes precedence over the port table.
    pub base_url: Option<String>,
    /// Port this client instance is served from, used to pick a backend from `port_table`.
    pub served_port: Option<u16>,
    pub default_base_url: String,
    /// Served port (as text) to backend base URL.
    pub port_table: BTreeMap<String, String>,
    pub login_variant: LoginVariant,
    pub accept_language: String,
    pub request_timeout_secs: u64,
    pub views: ViewSettings,
    pub messaging: MessagingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let port_table = [
            ("4200", "http://127.0.0.1:5001/"),
            ("4201", "http://127.0.0.1:5002/"),
            ("4202", "http://127.0.0.1:5003/"),
        ]
        .into_iter()
        .map(|(port, url)| (port.to_string(), url.to_string()))
        .collect();

        Self {
            base_url: None,
            served_port: None,
            default_base_url: DEFAULT_BASE_URL.to_string(),
            port_table,
            login_variant: LoginVariant::default(),
            accept_language: "vi".to_string(),
            request_timeout_secs: 30,
            views: ViewSettings::default(),
            messaging: MessagingConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Resolves the backend base URL. The result always ends with `/`.
    ///
    /// Order: explicit `base_url`, then `port_table[served_port]`, then
    /// `default_base_url`.
    pub fn resolve_base_url(&self) -> String {
        let from_port = self
            .served_port
            .and_then(|port| self.port_table.get(&port.to_string()));

        let url = self
            .base_url
            .as_ref()
            .filter(|u| !u.is_empty())
            .or(from_port)
            .unwrap_or(&self.default_base_url);

        if url.ends_with('/') {
            url.clone()
        } else {
            format!("{}/", url)
        }
    }

    /// Applies `SEEDLINE_BASE_URL` and `SEEDLINE_SERVED_PORT` overrides.
    ///
    /// `lookup` is usually `|k| std::env::var(k).ok()`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SEEDLINE_BASE_URL").filter(|u| !u.is_empty()) {
            self.base_url = Some(url);
        }
        if let Some(port) = lookup("SEEDLINE_SERVED_PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.served_port = Some(port),
                Err(_) => tracing::warn!("[Config] Ignoring invalid SEEDLINE_SERVED_PORT: {}", port),
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resolves_to_default_base() {
        let config = ClientConfig::default();
        assert_eq!(config.resolve_base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_served_port_selects_backend() {
        let config = ClientConfig {
            served_port: Some(4201),
            ..Default::default()
        };
        assert_eq!(config.resolve_base_url(), "http://127.0.0.1:5002/");

        let unknown = ClientConfig {
            served_port: Some(8080),
            ..Default::default()
        };
        assert_eq!(unknown.resolve_base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_explicit_base_url_wins_and_gets_trailing_slash() {
        let config = ClientConfig {
            base_url: Some("https://tracker.example".to_string()),
            served_port: Some(4200),
            ..Default::default()
        };
        assert_eq!(config.resolve_base_url(), "https://tracker.example/");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        config.apply_env_overrides(|key| match key {
            "SEEDLINE_SERVED_PORT" => Some("4202".to_string()),
            _ => None,
        });
        assert_eq!(config.resolve_base_url(), "http://127.0.0.1:5003/");

        config.apply_env_overrides(|key| match key {
            "SEEDLINE_SERVED_PORT" => Some("not-a-port".to_string()),
            _ => None,
        });
        assert_eq!(config.served_port, Some(4202));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            login_variant = "json"

            [views]
            nodes_poll_secs = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.login_variant, LoginVariant::Json);
        assert_eq!(config.views.nodes_poll_secs, Some(10));
        assert_eq!(config.views.catalog_poll_secs, Some(5));
        assert_eq!(config.accept_language, "vi");
        assert_eq!(config.port_table.len(), 3);
    }
}
