//! Configuration loading and management
//!
//! Handles parsing of `.devboard.toml` configuration files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::activity::MAX_COMPACT_DAYS;
use crate::error::{Error, Result};
use crate::task::Column;

pub const CONFIG_FILE: &str = ".devboard.toml";
const USER_PLACEHOLDER: &str = "{user}";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Task board layout
    #[serde(default)]
    pub board: BoardConfig,

    /// Activity heatmap settings
    #[serde(default)]
    pub activity: ActivityConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint is joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Bearer token; the `DEVBOARD_TOKEN` env var takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Activity endpoint, `{user}` is replaced with the user handle
    #[serde(default = "default_activity_path")]
    pub activity_path: String,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_activity_path() -> String {
    "/users/{user}/activity".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            token: None,
            activity_path: default_activity_path(),
        }
    }
}

/// Board layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Ordered columns; task statuses must name one of these
    #[serde(default = "default_columns")]
    pub columns: Vec<Column>,
}

fn default_columns() -> Vec<Column> {
    vec![
        Column::new("ToDo", "To Do"),
        Column::new("InProgress", "In Progress"),
        Column::new("Done", "Done"),
    ]
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: default_columns(),
        }
    }
}

/// Activity heatmap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// Days shown on compact viewports
    #[serde(default = "default_compact_days")]
    pub compact_days: u32,

    /// Lower bounds of intensity levels 1..=N
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<u32>,
}

fn default_compact_days() -> u32 {
    crate::activity::DEFAULT_COMPACT_DAYS
}

fn default_thresholds() -> Vec<u32> {
    crate::activity::DEFAULT_THRESHOLDS.to_vec()
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            compact_days: default_compact_days(),
            thresholds: default_thresholds(),
        }
    }
}

impl Config {
    /// Load configuration from a `.devboard.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.board.validate()?;
        self.activity.validate()?;
        Ok(())
    }
}

impl ApiConfig {
    fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "api.base_url must be an http(s) URL, got '{base}'"
            )));
        }
        if self.timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "api.timeout_ms must be > 0".to_string(),
            ));
        }
        if !self.activity_path.contains(USER_PLACEHOLDER) {
            return Err(Error::InvalidConfig(format!(
                "api.activity_path must contain {USER_PLACEHOLDER}"
            )));
        }
        Ok(())
    }
}

impl BoardConfig {
    fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::InvalidConfig(
                "board.columns cannot be empty".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for column in &self.columns {
            let id = column.id.trim();
            if id.is_empty() {
                return Err(Error::InvalidConfig(
                    "board.columns cannot include empty ids".to_string(),
                ));
            }
            if !seen.insert(id) {
                return Err(Error::InvalidConfig(format!(
                    "board.columns has duplicate id '{id}'"
                )));
            }
        }
        Ok(())
    }
}

impl ActivityConfig {
    fn validate(&self) -> Result<()> {
        if self.compact_days == 0 {
            return Err(Error::InvalidConfig(
                "activity.compact_days must be > 0".to_string(),
            ));
        }
        if self.compact_days > MAX_COMPACT_DAYS {
            return Err(Error::InvalidConfig(format!(
                "activity.compact_days must be <= {MAX_COMPACT_DAYS}"
            )));
        }
        if self.thresholds.is_empty() {
            return Err(Error::InvalidConfig(
                "activity.thresholds cannot be empty".to_string(),
            ));
        }
        if self.thresholds[0] == 0 {
            return Err(Error::InvalidConfig(
                "activity.thresholds must start above 0".to_string(),
            ));
        }
        if self.thresholds.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::InvalidConfig(
                "activity.thresholds must be strictly increasing".to_string(),
            ));
        }
        Ok(())
    }
}
