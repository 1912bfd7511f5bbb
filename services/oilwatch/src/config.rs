//! Configuration types for the oilwatch service

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides `api.base_url`
pub const API_URL_ENV: &str = "OILWATCH_API_URL";

/// Path of the latest-readings endpoint on the backend
pub const READINGS_PATH: &str = "/readings-latest";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL override. Empty means requests are relative to `origin`.
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_polling_interval")]
    pub polling_interval_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            origin: default_origin(),
            limit: default_limit(),
            polling_interval_seconds: default_polling_interval(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Full URL of the latest-readings request
    pub fn readings_url(&self) -> String {
        let base = if self.base_url.is_empty() {
            self.origin.as_str()
        } else {
            self.base_url.as_str()
        };
        format!(
            "{}{}?limit={}",
            base.trim_end_matches('/'),
            READINGS_PATH,
            self.limit
        )
    }
}

/// Dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dashboard_port")]
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dashboard_port(),
        }
    }
}

fn default_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_limit() -> u32 {
    1
}

fn default_polling_interval() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_dashboard_port() -> u16 {
    11120
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::OilwatchError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Reject values that would make the poller misbehave
    pub fn validate(&self) -> crate::Result<()> {
        if self.api.polling_interval_seconds == 0 {
            return Err(crate::OilwatchError::Config(
                "api.polling_interval_seconds must be greater than 0".to_string(),
            ));
        }
        if self.api.limit == 0 {
            return Err(crate::OilwatchError::Config(
                "api.limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
