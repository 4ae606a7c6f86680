//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which holds an optional backend URL override and the last mobile number
//! an OTP was requested for.
//!
//! Configuration is stored at `~/.config/docvault/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "docvault";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable selecting the backend
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Backend used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub last_mobile_number: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
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

    /// Directory downloads go to when none is given
    pub fn download_dir(&self) -> Result<PathBuf> {
        dirs::download_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| anyhow::anyhow!("Could not find download directory"))
    }

    /// Pick the backend URL: explicit override, then `API_BASE_URL`, then
    /// the config file, then the built-in default.
    pub fn resolve_base_url(&self, cli_override: Option<&str>) -> String {
        let env_value = std::env::var(API_BASE_URL_ENV).ok();
        self.resolve_base_url_with(cli_override, env_value.as_deref())
    }

    fn resolve_base_url_with(&self, cli_override: Option<&str>, env_value: Option<&str>) -> String {
        [cli_override, env_value, self.api_base_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }
}
