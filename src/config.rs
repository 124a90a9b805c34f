//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{CONFIG_DIR_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME};

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Settings document opened when no `--settings` argument is given
    pub settings_file: Option<PathBuf>,
}

/// Device capability configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Whether the system allows push notifications for this app
    #[serde(default = "default_push_enabled")]
    pub push_enabled: bool,
}

fn default_push_enabled() -> bool {
    true
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            push_enabled: default_push_enabled(),
        }
    }
}

/// Save behaviour configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveConfig {
    /// How long quitting waits for in-flight saves, in milliseconds
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
}

fn default_shutdown_timeout_ms() -> u64 {
    3000
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
        }
    }
}

/// UI preferences configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Theme mode preference (Auto, Dark, Light)
    #[serde(default)]
    pub theme_mode: ThemeMode,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `NOTIFYPREFS_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/NotifyPrefs/config.toml`
/// - macOS: `~/Library/Application Support/NotifyPrefs/config.toml`
/// - Windows: `%APPDATA%\NotifyPrefs\config.toml`
///
/// The directory can be overridden with the `NOTIFYPREFS_CONFIG_DIR`
/// environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Device capability settings
    #[serde(default)]
    pub device: DeviceConfig,
    /// Save behaviour
    #[serde(default)]
    pub save: SaveConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to an explicit path (temp file + rename).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = path.with_extension("toml.tmp");

        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp config file: {}", temp_path.display())
        })?;

        fs::rename(&temp_path, path).with_context(|| {
            format!("Failed to rename temp config file to: {}", path.display())
        })?;

        info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            anyhow::bail!("logging.level must not be empty");
        }

        if self.save.shutdown_timeout_ms == 0 {
            anyhow::bail!("save.shutdown_timeout_ms must be greater than zero");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.paths.settings_file, None);
        assert!(config.device.push_enabled);
        assert_eq!(config.save.shutdown_timeout_ms, 3000);
        assert_eq!(config.ui.theme_mode, ThemeMode::Auto);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::new();
        assert!(config.validate().is_ok());

        config.save.shutdown_timeout_ms = 0;
        assert!(config.validate().is_err());

        config.save.shutdown_timeout_ms = 10;
        config.logging.level = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.device.push_enabled = false;
        config.ui.theme_mode = ThemeMode::Light;
        config.paths.settings_file = Some(PathBuf::from("/tmp/settings.json"));

        config.save_to(&config_file).unwrap();
        assert!(!config_file.with_extension("toml.tmp").exists());

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::new());
    }

    #[test]
    fn test_config_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[device]\npush_enabled = false\n").unwrap();

        let loaded = Config::load_from(&config_file).unwrap();
        assert!(!loaded.device.push_enabled);
        assert_eq!(loaded.save.shutdown_timeout_ms, 3000);
        assert_eq!(loaded.logging.level, "info");
    }

    #[test]
    fn test_config_load_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[device\npush_enabled = ").unwrap();

        assert!(Config::load_from(&config_file).is_err());
    }
}
