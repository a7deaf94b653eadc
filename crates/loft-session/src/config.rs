//! Client configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! includes the backend server URL and the last used username.
//!
//! Configuration is stored at `~/.config/loft/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "loft";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default backend for a locally hosted instance
const DEFAULT_SERVER_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server_url: String,
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            last_username: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for durable client state, including the stored session key.
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_username_reads_as_none() {
        let config: Config = serde_json::from_str(r#"{"server_url": "https://loft.example/api"}"#)
            .expect("parse config");
        assert_eq!(config.server_url, "https://loft.example/api");
        assert!(config.last_username.is_none());
    }

    #[test]
    fn test_round_trip() {
        let config = Config {
            server_url: "https://loft.example/api".to_string(),
            last_username: Some("ada".to_string()),
        };
        let json = serde_json::to_string(&config).expect("serialize config");
        let parsed: Config = serde_json::from_str(&json).expect("parse config");
        assert_eq!(parsed.server_url, config.server_url);
        assert_eq!(parsed.last_username.as_deref(), Some("ada"));
    }
}
