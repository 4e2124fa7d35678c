//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base URL, where the session token is stored, the
//! last used email and optional weather coordinates.
//!
//! Configuration is stored at `~/.config/moodiary/config.json`. The
//! `MOODIARY_API_URL` and `MOODIARY_EMAIL` environment variables override
//! the file.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::{FileTokenStore, KeyringTokenStore, TokenStore};

/// Application name used for config/data/cache directory paths
pub const APP_NAME: &str = "moodiary";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend used when no URL is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Where the session token is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStorage {
    #[default]
    File,
    Keyring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub last_email: Option<String>,
    pub token_storage: TokenStorage,
    /// Seconds between background session checks; unset disables them
    pub reconcile_interval_secs: Option<u64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            last_email: None,
            token_storage: TokenStorage::default(),
            reconcile_interval_secs: None,
            latitude: None,
            longitude: None,
        }
    }
}

impl Config {
    /// Load the config file (or defaults) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::read_file(&Self::config_path()?)?;
        config.apply_env(|key| std::env::var(key).ok());
        debug!(api = %config.api_base_url, storage = ?config.token_storage, "Config loaded");
        Ok(config)
    }

    /// Record the last used email.
    ///
    /// Only `last_email` is written back; the rest of the file is kept as it
    /// is on disk, so environment overrides held in memory never leak into it.
    pub fn remember_email(&mut self, email: &str) -> Result<()> {
        self.last_email = Some(email.to_string());
        Self::write_email(&Self::config_path()?, email)
    }

    fn read_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn write_email(path: &Path, email: &str) -> Result<()> {
        let mut on_disk = Self::read_file(path)?;
        on_disk.last_email = Some(email.to_string());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&on_disk)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("MOODIARY_API_URL").filter(|v| !v.is_empty()) {
            self.api_base_url = url;
        }
        if let Some(email) = var("MOODIARY_EMAIL").filter(|v| !v.is_empty()) {
            self.last_email = Some(email);
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for the session file and logs
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Cache directory holding every user's entries
    pub fn cache_root(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Cache directory for one user's entries
    pub fn cache_dir(&self, user_id: i64) -> Result<PathBuf> {
        Ok(self.cache_root()?.join(format!("user-{}", user_id)))
    }

    /// Open the configured token store
    pub fn token_store(&self) -> Result<Arc<dyn TokenStore>> {
        match self.token_storage {
            TokenStorage::File => Ok(Arc::new(FileTokenStore::new(self.data_dir()?))),
            TokenStorage::Keyring => Ok(Arc::new(
                KeyringTokenStore::new().context("Failed to open keychain entry")?,
            )),
        }
    }

    pub fn reconcile_interval(&self) -> Option<Duration> {
        self.reconcile_interval_secs.map(Duration::from_secs)
    }

    /// Coordinates for weather suggestions, when both are configured
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}
