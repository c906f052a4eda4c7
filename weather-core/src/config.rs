use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    controller::StalePolicy,
    model::UnitPreference,
    provider::{ipinfo, weatherapi},
    resolver::{DEFAULT_TIMEOUT, is_demo_key},
};

/// weatherapi.com credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherApiConfig {
    /// Absent or the placeholder key means demo mode.
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for WeatherApiConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: weatherapi::DEFAULT_BASE_URL.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IpInfoConfig {
    pub url: String,
}

impl Default for IpInfoConfig {
    fn default() -> Self {
        Self { url: ipinfo::DEFAULT_URL.to_string() }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// timeout_secs = 10
/// default_unit = "celsius"
/// stale_results = "accept"
///
/// [weatherapi]
/// api_key = "..."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-request limit for both providers.
    pub timeout_secs: u64,
    pub default_unit: UnitPreference,
    pub stale_results: StalePolicy,
    pub weatherapi: WeatherApiConfig,
    pub ipinfo: IpInfoConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            default_unit: UnitPreference::default(),
            stale_results: StalePolicy::default(),
            weatherapi: WeatherApiConfig::default(),
            ipinfo: IpInfoConfig::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, demo mode.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        if cfg.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be at least 1"));
        }
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Store a weatherapi.com key; blank input goes back to demo mode.
    pub fn set_api_key(&mut self, api_key: String) {
        let key = api_key.trim();
        self.weatherapi.api_key = if key.is_empty() { None } else { Some(key.to_string()) };
    }

    pub fn is_demo(&self) -> bool {
        is_demo_key(self.weatherapi.api_key.as_deref())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}
