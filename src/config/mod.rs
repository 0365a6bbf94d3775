use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_api_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_narrow_width() -> u16 {
    100
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the business-record API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Terminal width (in cells) below which the list auto-switches from
    /// table to cards.
    #[serde(default = "default_narrow_width")]
    pub narrow_width: u16,

    /// Background refresh interval in seconds. 0 disables it.
    #[serde(default)]
    pub refresh_secs: u64,

    /// Desktop notification when follow-ups are due.
    #[serde(default)]
    pub notifications: bool,

    /// Owner name stamped on leads created from this machine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_owner: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            narrow_width: default_narrow_width(),
            refresh_secs: 0,
            notifications: true,
            default_owner: None,
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("prospect");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
        }

        let config = AppConfig::default();
        let _ = config.save();
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig {
            api_url: "https://crm.example.com/api".to_string(),
            narrow_width: 90,
            refresh_secs: 120,
            notifications: true,
            default_owner: Some("sam".to_string()),
        };

        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();

        assert_eq!(config.api_url, deserialized.api_url);
        assert_eq!(config.narrow_width, deserialized.narrow_width);
        assert_eq!(config.default_owner, deserialized.default_owner);
    }

    #[test]
    fn test_config_defaults_for_missing_keys() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.api_url, default_api_url());
        assert_eq!(config.narrow_width, 100);
        assert_eq!(config.refresh_secs, 0);
    }
}
