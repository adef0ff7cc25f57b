//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which holds the backend URL, the storage backend for the session token and
//! the last email used to sign in.
//!
//! Configuration is stored at `~/.config/voltdesk/config.json`. The
//! `VOLTDESK_API_URL` and `VOLTDESK_EMAIL` environment variables take
//! precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_API_URL;
use crate::storage::StorageBackend;

/// Application name used for config/data directory paths
pub const APP_NAME: &str = "voltdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding `api_url`
pub const API_URL_ENV: &str = "VOLTDESK_API_URL";

/// Environment variable overriding `last_email`
pub const EMAIL_ENV: &str = "VOLTDESK_EMAIL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub last_email: Option<String>,
    #[serde(default)]
    pub storage: StorageBackend,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for durable client data (token storage, logs)
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Apply environment overrides. Empty variables are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(EMAIL_ENV).ok(),
        )
    }

    fn with_overrides(mut self, api_url: Option<String>, email: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = Some(url);
        }
        if let Some(email) = email.filter(|e| !e.trim().is_empty()) {
            self.last_email = Some(email);
        }
        self
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }
}
