//! User settings and preferences
//!
//! Manages application settings stored in ~/.dbtool/config.toml

use crate::config::ClusterEndpoint;
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub endpoint: ClusterEndpoint,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: ClusterEndpoint::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Apply command-line overrides on top of the file values
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.endpoint.host = host;
        }
        if let Some(port) = port {
            self.endpoint.port = port;
        }
        self
    }
}

/// Get the config directory path (~/.dbtool/)
pub fn config_dir() -> ConfigResult<PathBuf> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".dbtool"))
}

/// Load settings from the default config file
pub fn load_settings() -> ConfigResult<Settings> {
    load_settings_from(&config_dir()?.join("config.toml"))
}

/// Load settings from a specific file, falling back to defaults if absent
pub fn load_settings_from(path: &Path) -> ConfigResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}
