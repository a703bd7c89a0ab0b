//! Configuration handling for the contact book
//!
//! Configuration is stored in `~/.config/contacts/config.toml` (or the
//! platform equivalent), overridable with `CONTACTS_CONFIG`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV: &str = "CONTACTS_CONFIG";

/// Backing file used when neither the command line nor the config names one
pub const DEFAULT_STORE_FILE: &str = "contact.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DefaultFormat {
    #[default]
    Text,
    Json,
}

/// User configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Path of the backing contact file
    pub store_path: Option<PathBuf>,

    /// Output format used when `--format` is not given
    pub default_format: DefaultFormat,
}

impl Config {
    /// Loads configuration from `CONTACTS_CONFIG` or the default location
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Returns the config file in effect, if one can be determined
    pub fn config_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(|| Self::config_dir().map(|dir| dir.join("config.toml")))
    }

    /// Returns the platform config directory
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "contact-book", "contacts")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Resolves the backing file: explicit path, then config, then the default
    pub fn resolve_store_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.store_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE))
    }
}
