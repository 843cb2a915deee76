use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::provider::{ForecastModel, nominatim, windy};

/// Geocoding service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub endpoint: String,
    /// Nominatim rejects requests without an identifying agent.
    pub user_agent: String,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: nominatim::DEFAULT_ENDPOINT.to_string(),
            user_agent: nominatim::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Point-forecast service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Model id, e.g. "gfs" or "iconEu".
    pub model: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            endpoint: windy::DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            model: ForecastModel::default().as_str().to_string(),
        }
    }
}

/// Search-as-you-type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a keystroke reaches the geocoder. Read by
    /// [`crate::controller_from_config`]; the one-shot `geoweather` commands
    /// search exactly once and run with no debounce regardless.
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// request_timeout_secs = 15
///
/// [forecast]
/// api_key = "..."
/// model = "gfs"
///
/// # Interactive front ends only; the CLI ignores it.
/// [search]
/// debounce_ms = 300
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Per-request timeout. Unset means requests may wait indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub geocoder: GeocoderConfig,
    pub forecast: ForecastConfig,
    pub search: SearchConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "geoweather", "geoweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_forecast_api_key(&mut self, api_key: String) {
        self.forecast.api_key = Some(api_key);
    }

    /// Returns the forecast API key, if a non-blank one is present.
    pub fn forecast_api_key(&self) -> Option<&str> {
        self.forecast.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Return the configured model as a strongly-typed ForecastModel.
    pub fn forecast_model(&self) -> Result<ForecastModel> {
        ForecastModel::try_from(self.forecast.model.as_str())
            .context("Invalid `forecast.model` in configuration")
    }

    pub fn set_forecast_model(&mut self, model: ForecastModel) {
        self.forecast.model = model.as_str().to_string();
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
