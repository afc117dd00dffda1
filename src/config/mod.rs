//! User-level configuration for changewatch
//!
//! Supports loading config from:
//! - Environment variables
//! - ~/.config/changewatch/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackerConfig {
    /// Tracker root URL, e.g. https://example.atlassian.net
    pub base_url: Option<String>,

    /// Account the token belongs to
    pub user: Option<String>,

    /// API token sent as a bearer credential
    pub token: Option<String>,
}

impl UserConfig {
    /// Load config from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. User config (~/.config/changewatch/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = UserConfig::default();

        if let Some(user_config) = Self::user_config_path()
            .filter(|p| p.exists())
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|content| toml::from_str::<UserConfig>(&content).ok())
        {
            config.merge(user_config);
        }

        // Environment variables override everything
        if let Ok(url) = std::env::var("CHANGEWATCH_TRACKER_URL") {
            config.tracker.base_url = Some(url);
        }
        if let Ok(user) = std::env::var("CHANGEWATCH_TRACKER_USER") {
            config.tracker.user = Some(user);
        }
        if let Ok(token) = std::env::var("CHANGEWATCH_TRACKER_TOKEN") {
            config.tracker.token = Some(token);
        }

        Ok(config)
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("changewatch").join("config.toml"))
    }

    /// Merge another config into this one (other takes priority)
    fn merge(&mut self, other: UserConfig) {
        if other.tracker.base_url.is_some() {
            self.tracker.base_url = other.tracker.base_url;
        }
        if other.tracker.user.is_some() {
            self.tracker.user = other.tracker.user;
        }
        if other.tracker.token.is_some() {
            self.tracker.token = other.tracker.token;
        }
    }

    /// Check if enough is configured to attempt ticket lookups
    pub fn has_tracker(&self) -> bool {
        self.tracker.base_url.is_some()
    }
}
