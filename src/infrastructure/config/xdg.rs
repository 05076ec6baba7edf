//! XDG config store adapter

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Config file under the platform config directory
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    /// `$XDG_CONFIG_HOME/safeguard/config.toml` or the platform equivalent
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("safeguard");

        Self {
            path: config_dir.join("config.toml"),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_toml(content: &str) -> Result<AppConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn to_toml(config: &AppConfig) -> Result<String, ConfigError> {
        toml::to_string_pretty(config).map_err(|e| ConfigError::WriteError(e.to_string()))
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.exists() {
            return Ok(AppConfig::empty());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Self::parse_toml(&content)
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content = Self::to_toml(config)?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.to_string_lossy().to_string(),
            ));
        }

        self.save(&AppConfig::defaults()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::{Severity, ZoneKind};

    #[test]
    fn default_path_is_xdg() {
        let path = XdgConfigStore::new().path();
        assert!(path.to_string_lossy().contains("safeguard"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn parse_flat_keys_and_zone_table() {
        let content = r#"
api_key = "dg-key"
sms_relay_url = "http://localhost:3000/send-sms"
clip_duration = "3s"
notify = false

[fallback_location]
latitude = 40.0
longitude = -70.0

[[zones]]
id = 9
latitude = 40.0
longitude = -70.0
radius_meters = 250.0
name = "Harbour"
type = "isolated"
severity = "medium"
"#;

        let config = XdgConfigStore::parse_toml(content).unwrap();
        assert_eq!(config.api_key(), Some("dg-key"));
        assert_eq!(config.clip_duration_or_default().as_millis(), 3000);
        assert_eq!(config.notify, Some(false));
        assert_eq!(config.fallback_location_or_default().latitude, 40.0);

        let zones = config.zones_or_default();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].kind, ZoneKind::Isolated);
        assert_eq!(zones[0].severity, Severity::Medium);
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        assert!(matches!(
            XdgConfigStore::parse_toml("api_key = "),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("nested/config.toml"));

        assert!(store.load().await.unwrap().api_key.is_none());
        store.init().await.unwrap();
        assert!(store.exists());

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.clip_duration, Some("5s".to_string()));
        assert_eq!(loaded.fallback_location, AppConfig::defaults().fallback_location);

        assert!(matches!(store.init().await, Err(ConfigError::AlreadyExists(_))));
    }
}
