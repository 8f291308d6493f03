//! Application configuration.
//!
//! Stored as JSON. A missing file means defaults; a present but malformed
//! file is an error.

use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::versioning::CacheConfig;
use crate::selection::DEFAULT_MEMO_CAPACITY;
use crate::worker::capability::HostCapabilities;

pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid origin `{origin}`: {reason}")]
    InvalidOrigin { origin: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub memo_capacity: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            memo_capacity: DEFAULT_MEMO_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub origin: String,
    /// Content list to load at startup; `None` serves the fallback item.
    pub content_path: Option<PathBuf>,
    pub cache: CacheConfig,
    pub selector: SelectorConfig,
    pub capabilities: HostCapabilities,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            content_path: None,
            cache: CacheConfig::v1(),
            selector: SelectorConfig::default(),
            capabilities: HostCapabilities::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.origin_url()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.origin).map_err(|e| ConfigError::InvalidOrigin {
            origin: self.origin.clone(),
            reason: e.to_string(),
        })
    }
}
