//! Configuration management for the demo CLI

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Error;
use crate::Result;

/// Demo CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the login portal, e.g. "https://login.example.com/"
    pub login_url: String,

    /// OAuth client identifier registered with the portal
    pub client_id: String,

    /// Application identifier, also the custom redirect URI scheme
    pub app_uid: String,
}

impl Config {
    pub fn new(login_url: String, client_id: String, app_uid: String) -> Self {
        // The client expects a trailing slash when joining endpoint paths
        let login_url = if login_url.ends_with('/') {
            login_url
        } else {
            format!("{}/", login_url)
        };

        Self {
            login_url,
            client_id,
            app_uid,
        }
    }
}

/// Get the config directory path
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sesame")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Where the demo CLI keeps the token obtained at login
pub fn token_path() -> PathBuf {
    config_dir().join("token.json")
}

/// Load configuration from file
pub fn load() -> Result<Config> {
    let path = config_path();

    if !path.exists() {
        return Err(Error::Config(format!(
            "Config not found at {:?}. Run 'sesame init' first.",
            path
        )));
    }

    let content = std::fs::read_to_string(&path)?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save(config: &Config) -> Result<()> {
    let path = config_path();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_appends_trailing_slash() {
        let config = Config::new(
            "https://login.example.com".to_string(),
            "client".to_string(),
            "com.example.app".to_string(),
        );
        assert_eq!(config.login_url, "https://login.example.com/");
    }

    #[test]
    fn test_new_keeps_existing_slash() {
        let config = Config::new(
            "https://login.example.com/".to_string(),
            "client".to_string(),
            "com.example.app".to_string(),
        );
        assert_eq!(config.login_url, "https://login.example.com/");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::new(
            "https://login.example.com/".to_string(),
            "client".to_string(),
            "com.example.app".to_string(),
        );

        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.login_url, config.login_url);
        assert_eq!(parsed.client_id, config.client_id);
        assert_eq!(parsed.app_uid, config.app_uid);
    }
}
