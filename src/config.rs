//! Configuration management for diffscribe.
//!
//! Configuration is loaded from `~/.config/diffscribe/config.toml`. Every field
//! is optional; a missing file means all defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Messages API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Network timeouts.
    #[serde(default)]
    pub timeouts: Timeouts,
    /// Locations of the API key and profile files.
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Messages API endpoint and sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Value of the `anthropic-version` header.
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            version: default_version(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_model() -> String {
    "claude-3-7-sonnet-20250219".to_string()
}

fn default_version() -> String {
    "2023-06-01".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.5
}

/// Connect and overall request timeouts, in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Timeouts {
    #[serde(default = "default_connect_secs")]
    pub connect_secs: u64,
    #[serde(default = "default_request_secs")]
    pub request_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect_secs: default_connect_secs(),
            request_secs: default_request_secs(),
        }
    }
}

fn default_connect_secs() -> u64 {
    10
}

fn default_request_secs() -> u64 {
    120
}

impl Timeouts {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

/// Overrides for the default credential and profile locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<PathBuf>,
}

impl Config {
    /// Get the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("diffscribe"))
            .context("Could not determine config directory")
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Directory holding the API key and profile by default.
    fn claude_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|p| p.join(".config").join("claude"))
            .context("Could not determine home directory")
    }

    /// Default API key file: `~/.config/claude/api_key.txt`.
    pub fn default_api_key_path() -> Result<PathBuf> {
        Ok(Self::claude_dir()?.join("api_key.txt"))
    }

    /// Default profile file: `~/.config/claude/profile.txt`.
    pub fn default_profile_path() -> Result<PathBuf> {
        Ok(Self::claude_dir()?.join("profile.txt"))
    }

    /// API key path from config, or the default.
    pub fn api_key_path(&self) -> Result<PathBuf> {
        match &self.paths.api_key {
            Some(path) => Ok(path.clone()),
            None => Self::default_api_key_path(),
        }
    }

    /// Profile path from config, or the default.
    pub fn profile_path(&self) -> Result<PathBuf> {
        match &self.paths.profile {
            Some(path) => Ok(path.clone()),
            None => Self::default_profile_path(),
        }
    }

    /// Load configuration from file, using defaults if not found.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }
}
