//! TOML-based application configuration.
//!
//! Holds the fixed external facts the planner needs before it can touch
//! the database: the shift rotation pattern and notification preferences.
//! Stored at `~/.config/dayflow/config.toml`.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::rota::RotaPattern;

/// Rotation configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RotaConfig {
    #[serde(default = "default_anchor")]
    pub anchor: NaiveDate,
    #[serde(default = "default_days_on")]
    pub days_on: u32,
    #[serde(default = "default_days_off")]
    pub days_off: u32,
}

/// Notification configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dayflow/config.toml`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub rota: RotaConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

fn default_anchor() -> NaiveDate {
    RotaPattern::default().anchor
}
fn default_days_on() -> u32 {
    3
}
fn default_days_off() -> u32 {
    3
}
fn default_true() -> bool {
    true
}

impl Default for RotaConfig {
    fn default() -> Self {
        RotaConfig {
            anchor: default_anchor(),
            days_on: default_days_on(),
            days_off: default_days_off(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        NotificationsConfig { enabled: true }
    }
}

impl RotaConfig {
    pub fn pattern(&self) -> RotaPattern {
        RotaPattern {
            anchor: self.anchor,
            days_on: self.days_on,
            days_off: self.days_off,
        }
    }
}

impl AppConfig {
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the config, falling back to defaults when the file is absent.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(AppConfig::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let config = toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_three_on_three_off() {
        let config = AppConfig::default();
        assert_eq!(config.rota.days_on, 3);
        assert_eq!(config.rota.days_off, 3);
        assert!(config.notifications.enabled);
    }

    #[test]
    fn partial_toml_fills_missing_sections() {
        let config: AppConfig = toml::from_str("[rota]\ndays_on = 4\n").unwrap();
        assert_eq!(config.rota.days_on, 4);
        assert_eq!(config.rota.days_off, 3);
        assert!(config.notifications.enabled);
    }

    #[test]
    fn toml_roundtrip() {
        let config = AppConfig::default();
        let raw = toml::to_string_pretty(&config).unwrap();
        let decoded: AppConfig = toml::from_str(&raw).unwrap();
        assert_eq!(decoded.rota.anchor, config.rota.anchor);
    }
}
