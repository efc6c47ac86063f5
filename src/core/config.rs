//! Configuration management
//!
//! Settings are read from a YAML file, then overridden by environment
//! variables, then by command-line flags:
//!
//! 1. `$INVMAN_CONFIG`, or `config.yaml` in the platform config directory
//! 2. `INVMAN_BASE_URL`, `INVMAN_PAGE_SIZE`
//! 3. `--base-url`

use directories::ProjectDirs;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "INVMAN_CONFIG";
/// Environment variable overriding the service base URL
pub const BASE_URL_ENV: &str = "INVMAN_BASE_URL";
/// Environment variable overriding the page size
pub const PAGE_SIZE_ENV: &str = "INVMAN_PAGE_SIZE";

const CONFIG_FILE: &str = "config.yaml";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the inventory service
    pub base_url: String,

    /// Products requested per page
    pub page_size: usize,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9090".to_string(),
            page_size: 10,
            timeout_secs: 30,
        }
    }
}

/// Errors that can occur while loading configuration
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    #[diagnostic(code(invman::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {message}")]
    #[diagnostic(
        code(invman::config::parse),
        help("expected keys: base_url, page_size, timeout_secs")
    )]
    Parse { path: PathBuf, message: String },

    #[error("invalid value for {key}: {value}")]
    #[diagnostic(code(invman::config::value))]
    InvalidValue { key: &'static str, value: String },
}

impl Config {
    /// Load configuration from the default location plus environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file, without environment overrides
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Path of the config file that [`Config::load`] reads
    pub fn config_path() -> Option<PathBuf> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(explicit));
        }
        ProjectDirs::from("", "", "invman").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(PAGE_SIZE_ENV) {
            self.page_size = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    key: PAGE_SIZE_ENV,
                    value: raw.clone(),
                })?;
        }
        Ok(())
    }

    /// Override the base URL from the command line
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if reqwest::Url::parse(&self.base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "base_url",
                value: self.base_url.clone(),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "page_size",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
