//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and file locations.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "NotifyPrefs";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "notifyprefs";

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "NotifyPrefs";

/// Config file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "NOTIFYPREFS_CONFIG_DIR";

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "NOTIFYPREFS_LOG";

/// Log file written in interactive mode, inside the config directory.
pub const LOG_FILE_NAME: &str = "notifyprefs.log";
