use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::model::Unit;

pub const DEFAULT_ENDPOINT_URL: &str = "http://127.0.0.1:5000/weather";

/// Where the widget sends its request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base address and path, without query string.
    #[serde(default = "default_endpoint_url")]
    pub url: String,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_endpoint_url() -> String {
    DEFAULT_ENDPOINT_URL.to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_endpoint_url(),
            timeout_secs: None,
        }
    }
}

impl EndpointConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Initial values for the unit and day-count inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Defaults {
    #[serde(default)]
    pub unit: Unit,

    #[serde(default = "default_days")]
    pub days: u8,
}

const fn default_days() -> u8 {
    3
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            unit: Unit::default(),
            days: default_days(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [endpoint]
/// url = "http://127.0.0.1:5000/weather"
///
/// [defaults]
/// unit = "°C"
/// days = 3
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,

    #[serde(default)]
    pub defaults: Defaults,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
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
        let dirs = ProjectDirs::from("dev", "weather-widget", "weather-widget")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the endpoint url, keeping any timeout already set.
    pub fn set_endpoint_url(&mut self, url: impl Into<String>) {
        self.endpoint.url = url.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = Config::from_toml("").unwrap();

        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.endpoint.url, DEFAULT_ENDPOINT_URL);
        assert_eq!(cfg.endpoint.timeout(), None);
        assert_eq!(cfg.defaults.unit, Unit::Celsius);
        assert_eq!(cfg.defaults.days, 3);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = Config::from_toml(
            r#"
            [endpoint]
            url = "http://weather.local/weather"
            timeout_secs = 15

            [defaults]
            unit = "F"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.endpoint.url, "http://weather.local/weather");
        assert_eq!(cfg.endpoint.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(cfg.defaults.unit, Unit::Fahrenheit);
        assert_eq!(cfg.defaults.days, 3);
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let err = Config::from_toml("[defaults]\nunit = \"K\"\n").unwrap_err();
        assert!(err.to_string().contains("Unknown unit"));
    }

    #[test]
    fn serialized_config_reads_back() {
        let mut cfg = Config::default();
        cfg.set_endpoint_url("http://10.0.0.2:5000/weather");
        cfg.defaults.unit = Unit::Fahrenheit;
        cfg.defaults.days = 7;

        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(!text.contains("timeout_secs"));
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }
}
