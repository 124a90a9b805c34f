//! Configuration management CLI commands.

use crate::cli::common::{load_config, CliError, CliResult};
use crate::config::{Config, ThemeMode};
use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

/// Configuration management commands
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Display current configuration
    Show(ConfigShowArgs),
    /// Set configuration values
    Set(ConfigSetArgs),
    /// Print the configuration file path
    Path,
}

/// Display current configuration
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Set configuration values
#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Default settings JSON document
    #[arg(long, value_name = "FILE")]
    settings_file: Option<PathBuf>,

    /// Whether the system allows push notifications (true or false)
    #[arg(long, value_name = "BOOL")]
    push_enabled: Option<bool>,

    /// Theme mode (auto, light, or dark)
    #[arg(long, value_name = "MODE")]
    theme: Option<String>,
}

/// JSON-serializable configuration for output
#[derive(Serialize, Debug)]
struct ConfigOutput {
    paths: PathsOutput,
    device: DeviceOutput,
    save: SaveOutput,
    ui: UiOutput,
    logging: LoggingOutput,
}

#[derive(Serialize, Debug)]
struct PathsOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    settings_file: Option<String>,
}

#[derive(Serialize, Debug)]
struct DeviceOutput {
    push_enabled: bool,
}

#[derive(Serialize, Debug)]
struct SaveOutput {
    shutdown_timeout_ms: u64,
}

#[derive(Serialize, Debug)]
struct UiOutput {
    theme: String,
}

#[derive(Serialize, Debug)]
struct LoggingOutput {
    level: String,
}

impl ConfigArgs {
    /// Execute config subcommand
    pub fn execute(&self) -> CliResult<()> {
        match &self.command {
            ConfigCommand::Show(args) => args.execute(),
            ConfigCommand::Set(args) => args.execute(),
            ConfigCommand::Path => {
                let path = Config::config_file_path()
                    .map_err(|e| CliError::io(format!("Failed to locate configuration: {e}")))?;
                println!("{}", path.display());
                Ok(())
            }
        }
    }
}

impl ConfigShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;

        if self.json {
            output_json(&config)?;
        } else {
            output_human_readable(&config);
        }

        Ok(())
    }
}

impl ConfigSetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        // At least one argument must be provided
        if self.settings_file.is_none() && self.push_enabled.is_none() && self.theme.is_none() {
            return Err(CliError::validation(
                "At least one configuration option must be specified: --settings-file, --push-enabled, or --theme",
            ));
        }

        let mut config = load_config()?;

        if let Some(path) = &self.settings_file {
            if !path.is_file() {
                return Err(CliError::validation(format!(
                    "Settings file does not exist: {}",
                    path.display()
                )));
            }
            config.paths.settings_file = Some(path.clone());
        }

        if let Some(enabled) = self.push_enabled {
            config.device.push_enabled = enabled;
        }

        if let Some(theme_str) = &self.theme {
            config.ui.theme_mode = parse_theme(theme_str)?;
        }

        config
            .save()
            .map_err(|e| CliError::io(format!("Failed to save configuration: {e}")))?;

        println!("Configuration updated successfully.");

        Ok(())
    }
}

fn parse_theme(value: &str) -> CliResult<ThemeMode> {
    match value.to_lowercase().as_str() {
        "auto" => Ok(ThemeMode::Auto),
        "light" => Ok(ThemeMode::Light),
        "dark" => Ok(ThemeMode::Dark),
        _ => Err(CliError::validation(
            "Invalid theme mode. Must be 'auto', 'light', or 'dark'",
        )),
    }
}

fn theme_name(mode: ThemeMode) -> String {
    format!("{mode:?}").to_lowercase()
}

/// Output configuration in JSON format
fn output_json(config: &Config) -> CliResult<()> {
    let output = ConfigOutput {
        paths: PathsOutput {
            settings_file: config
                .paths
                .settings_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        },
        device: DeviceOutput {
            push_enabled: config.device.push_enabled,
        },
        save: SaveOutput {
            shutdown_timeout_ms: config.save.shutdown_timeout_ms,
        },
        ui: UiOutput {
            theme: theme_name(config.ui.theme_mode),
        },
        logging: LoggingOutput {
            level: config.logging.level.clone(),
        },
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| CliError::io(format!("Failed to serialize configuration to JSON: {e}")))?;

    println!("{json}");
    Ok(())
}

/// Output configuration in human-readable format
fn output_human_readable(config: &Config) {
    println!("Configuration:");
    println!();
    println!("Paths:");
    match &config.paths.settings_file {
        Some(path) => println!("  Settings file: {}", path.display()),
        None => println!("  Settings file: (not set)"),
    }
    println!();
    println!("Device:");
    println!("  Push notifications: {}", if config.device.push_enabled { "enabled" } else { "disabled" });
    println!();
    println!("Save:");
    println!("  Shutdown timeout: {}ms", config.save.shutdown_timeout_ms);
    println!();
    println!("UI:");
    println!("  Theme: {}", theme_name(config.ui.theme_mode));
    println!();
    println!("Logging:");
    println!("  Level: {}", config.logging.level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_theme() {
        assert_eq!(parse_theme("Dark").unwrap(), ThemeMode::Dark);
        assert_eq!(parse_theme("auto").unwrap(), ThemeMode::Auto);
        assert!(parse_theme("sepia").is_err());
    }

    #[test]
    fn test_theme_name() {
        assert_eq!(theme_name(ThemeMode::Light), "light");
    }
}
