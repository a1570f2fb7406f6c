//! Console settings from `config.toml`, the environment and CLI flags

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Overrides `api_base_url` when set.
pub const API_URL_ENV: &str = "SCHOOLCAST_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Backend base URL; endpoint paths are appended to it
    pub api_base_url: String,
    /// Rows requested per list page
    pub page_size: u32,
    /// Delay between the last search keystroke and the list request
    pub search_debounce_ms: u64,
    pub request_timeout_secs: u64,
    /// Log destination; defaults to the platform data directory
    pub log_file: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            page_size: 10,
            search_debounce_ms: 400,
            request_timeout_secs: 30,
            log_file: None,
        }
    }
}

impl ConsoleConfig {
    /// `~/.config/schoolcast/config.toml` or the platform equivalent.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("schoolcast").join("config.toml")
    }

    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply `SCHOOLCAST_API_URL` if it is set and non-empty.
    pub fn with_env(mut self) -> Self {
        if let Some(url) = std::env::var(API_URL_ENV).ok().filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "api_base_url must not be empty".to_string(),
            });
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ConfigError::ValidationError {
                message: format!("api_base_url '{}' is not an http(s) URL", self.api_base_url),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::ValidationError {
                message: "page_size must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("schoolcast")
                .join("console.log")
        })
    }
}
