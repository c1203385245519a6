use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::calendar::WindowDefaults;
use crate::constants::calendar::{DEFAULT_MONTHS_BACK, DEFAULT_MONTHS_FORWARD};
use crate::constants::series::{
    DEFAULT_EPISODE_START, DEFAULT_RELEASE_INTERVAL_DAYS, DEFAULT_SEASON,
};
use crate::constants::storage::DEFAULT_DATA_PATH;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub calendar: CalendarConfig,

    pub defaults: SeriesDefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Path of the JSON data file holding series and watched marks.
    pub data_path: String,

    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,

    /// Number of tokio worker threads (default: 1)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_path: DEFAULT_DATA_PATH.to_string(),
            log_level: "warn".to_string(),
            log_json: false,
            worker_threads: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// How far back the event list reaches when no start is given.
    pub months_back: u32,

    /// How far ahead the event list reaches when no end is given.
    pub months_forward: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            months_back: DEFAULT_MONTHS_BACK,
            months_forward: DEFAULT_MONTHS_FORWARD,
        }
    }
}

impl CalendarConfig {
    #[must_use]
    pub fn window_defaults(&self) -> WindowDefaults {
        WindowDefaults {
            months_back: self.months_back,
            months_forward: self.months_forward,
        }
    }
}

/// Values used for fields the user leaves out when adding a series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesDefaultsConfig {
    pub season: u32,

    pub episode_start: u32,

    pub release_interval_days: u32,
}

impl Default for SeriesDefaultsConfig {
    fn default() -> Self {
        Self {
            season: DEFAULT_SEASON,
            episode_start: DEFAULT_EPISODE_START,
            release_interval_days: DEFAULT_RELEASE_INTERVAL_DAYS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("kalendarr").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".kalendarr").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.data_path.trim().is_empty() {
            anyhow::bail!("general.data_path cannot be empty");
        }

        if self.calendar.months_forward == 0 && self.calendar.months_back == 0 {
            anyhow::bail!("Calendar window must reach back or forward by at least one month");
        }

        if self.defaults.release_interval_days == 0 {
            anyhow::bail!("defaults.release_interval_days must be > 0");
        }

        if self.defaults.season == 0 || self.defaults.episode_start == 0 {
            anyhow::bail!("defaults.season and defaults.episode_start must be > 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.calendar.months_back, 6);
        assert_eq!(config.calendar.months_forward, 3);
        assert_eq!(config.defaults.release_interval_days, 7);
        assert_eq!(config.general.data_path, "data/kalendarr.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[calendar]"));
        assert!(toml_str.contains("[defaults]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [calendar]
            months_forward = 12
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.calendar.months_forward, 12);
        assert_eq!(config.calendar.months_back, 6);

        let window = config.calendar.window_defaults();
        assert_eq!(window.months_forward, 12);
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = Config::default();
        config.defaults.release_interval_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("kalendarr-config-{}.toml", uuid::Uuid::new_v4()));
        let mut config = Config::default();
        config.general.data_path = "/tmp/elsewhere.json".to_string();
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.general.data_path, "/tmp/elsewhere.json");

        std::fs::remove_file(path).ok();
    }
}
