//! Configuration Management
//!
//! Handles persistent configuration storage for lbkit.

use crate::api::auth::{self, ApiCredentials};
use crate::api::http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::resource::BodyStyle;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// API key; `LBKIT_API_KEY` takes precedence
    #[serde(default)]
    pub api_key: Option<String>,
    /// API endpoint; `LBKIT_BASE_URL` takes precedence
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// How request bodies are wrapped
    #[serde(default)]
    pub body_style: Option<BodyStyle>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lbkit").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Get effective credentials (env > config)
    pub fn effective_credentials(&self) -> Option<ApiCredentials> {
        ApiCredentials::from_env().or_else(|| {
            self.api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(ApiCredentials::new)
        })
    }

    /// Get effective base URL (env > config > default)
    pub fn effective_base_url(&self) -> String {
        auth::base_url_from_env()
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Get effective request timeout
    pub fn effective_timeout(&self) -> Duration {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn effective_body_style(&self) -> BodyStyle {
        self.body_style.unwrap_or_default()
    }

    /// Set API key and save
    pub fn set_api_key(&mut self, api_key: &str) -> Result<()> {
        self.api_key = Some(api_key.to_string());
        self.save()
    }
}
