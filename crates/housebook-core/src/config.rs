//! Application configuration management.
//!
//! Configuration is stored at `~/.config/housebook/config.json` and holds an
//! optional data directory override and the title pre-selected on new
//! member forms.
//!
//! The data directory is resolved in this order: the `HOUSEBOOK_DATA_DIR`
//! environment variable, `data_dir` from the config file, the platform data
//! directory (`~/.local/share/housebook`), then `./data`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_TITLE;

/// Application name used for config/data directory paths
const APP_NAME: &str = "housebook";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "HOUSEBOOK_DATA_DIR";

/// Subdirectory of the data directory that holds log files
const LOG_DIR: &str = "logs";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub default_title: Option<String>,
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

    /// Load the config, writing a default file on first run so it can be edited
    pub fn load_or_create() -> Result<Self> {
        if Self::config_path()?.exists() {
            Self::load()
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
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

    /// Directory holding the key-value store files
    pub fn data_dir(&self) -> PathBuf {
        self.resolve_data_dir(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
    }

    fn resolve_data_dir(&self, env_override: Option<PathBuf>) -> PathBuf {
        env_override
            .or_else(|| self.data_dir.clone())
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_NAME)))
            .unwrap_or_else(|| PathBuf::from("./data"))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join(LOG_DIR)
    }

    /// Title for a fresh member form
    pub fn default_title(&self) -> &str {
        self.default_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_TITLE)
    }
}
