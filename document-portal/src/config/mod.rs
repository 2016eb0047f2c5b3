use portal_core::observability::LogFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Fixed prefix every backend endpoint lives under.
pub const API_PREFIX: &str = "/api/v1";

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub listing: ListingSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    /// Backend origin, e.g. `https://portal.example.com` (no `/api/v1`).
    pub base_url: String,
    /// Whole-request timeout applied by the HTTP client.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiSettings {
    pub fn api_root(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), API_PREFIX)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Clone, Debug)]
pub struct SessionSettings {
    /// Where the bearer token is persisted between runs.
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            token_path: default_token_path(),
        }
    }
}

fn default_token_path() -> PathBuf {
    PathBuf::from(".document-portal").join("token.json")
}

#[derive(Deserialize, Clone, Debug)]
pub struct ListingSettings {
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
        }
    }
}

pub fn default_per_page() -> u32 {
    20
}

#[derive(Deserialize, Clone, Debug)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration(explicit_file: Option<&Path>) -> Result<Settings, config::ConfigError> {
    portal_core::config::load(explicit_file)
}
