use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::DEFAULT_BASE_URL;
use crate::types::{Currency, ThemeMode};

pub const MIN_REFRESH_SECS: u64 = 30;
pub const MAX_LISTING_LIMIT: u32 = 250;

/// Startup settings. Read from YAML, never written back: anything the user
/// changes while the dashboard runs lives only in memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_refresh")]
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "default_asset")]
    pub default_asset: String,
    #[serde(default = "default_listing_limit")]
    pub listing_limit: u32,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    #[serde(default = "default_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_refresh() -> u64 {
    60
}

fn default_asset() -> String {
    "bitcoin".to_string()
}

fn default_listing_limit() -> u32 {
    100
}

fn default_history_days() -> u32 {
    7
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh(),
            currency: Currency::default(),
            theme: ThemeMode::default(),
            default_asset: default_asset(),
            listing_limit: default_listing_limit(),
            history_days: default_history_days(),
            api_base_url: default_base_url(),
            request_timeout_secs: default_timeout(),
        }
    }
}

impl Config {
    /// Loads `path`, or the default location when `None`. A missing file
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(contents)?;
        Ok(cfg.normalized())
    }

    pub fn normalized(mut self) -> Self {
        if self.refresh_interval_secs < MIN_REFRESH_SECS {
            self.refresh_interval_secs = MIN_REFRESH_SECS;
        }
        self.listing_limit = self.listing_limit.clamp(1, MAX_LISTING_LIMIT);
        self.history_days = self.history_days.max(1);
        self.request_timeout_secs = self.request_timeout_secs.max(1);
        self
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("pulse");
        path.push("config.yaml");
        path
    }
}
