use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::tasks::auto_refresh::DEFAULT_REFRESH_INTERVAL;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub panel: PanelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    pub refresh_interval_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            api: ApiConfig {
                base_url: env::var("NOTIFICATIONS_API_URL")?,
                auth_token: env::var("NOTIFICATIONS_API_TOKEN")
                    .ok()
                    .filter(|token| !token.trim().is_empty()),
                request_timeout_secs: parse_or(env::var("NOTIFICATIONS_REQUEST_TIMEOUT_SECS").ok(), 30),
            },

            panel: PanelConfig {
                refresh_interval_ms: parse_or(
                    env::var("NOTIFICATIONS_REFRESH_INTERVAL_MS").ok(),
                    DEFAULT_REFRESH_INTERVAL.as_millis() as u64,
                ),
            },
        })
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: None,
            request_timeout_secs: 30,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl PanelConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL.as_millis() as u64,
        }
    }
}

fn parse_or(value: Option<String>, default: u64) -> u64 {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
