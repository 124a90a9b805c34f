//! Error types and loading helpers shared by the CLI commands.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::models::{NotificationSettings, StreamKind};

/// Process exit codes used by the headless commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Invalid input: bad arguments, unknown stream, malformed document
    ValidationError = 1,
    /// Reading or writing a file failed, or the update was rejected
    IoError = 2,
}

impl ExitCode {
    /// Numeric code passed to `std::process::exit`.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error returned by a CLI command.
#[derive(Debug)]
pub struct CliError {
    /// Message printed to stderr
    pub message: String,
    /// Exit code for the process
    pub exit_code: ExitCode,
}

impl CliError {
    /// Invalid input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: ExitCode::ValidationError,
        }
    }

    /// File or service failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: ExitCode::IoError,
        }
    }

    /// Prints the error and terminates the process.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self.message);
        std::process::exit(self.exit_code.code())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Loads the configuration, mapping failures to a validation error.
pub fn load_config() -> CliResult<Config> {
    Config::load().map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))
}

/// Picks the settings document: the explicit path, else `paths.settings_file`.
pub fn resolve_settings_path(explicit: Option<&Path>, config: &Config) -> CliResult<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| config.paths.settings_file.clone())
        .ok_or_else(|| {
            CliError::validation(
                "No settings file given. Pass --settings or set paths.settings_file in the config",
            )
        })
}

/// Loads a settings document. A missing file is an I/O error, a malformed
/// one a validation error.
pub fn load_settings(path: &Path) -> CliResult<NotificationSettings> {
    if !path.exists() {
        return Err(CliError::io(format!(
            "Settings file not found: {}",
            path.display()
        )));
    }
    NotificationSettings::load(path).map_err(|e| CliError::validation(format!("{e:#}")))
}

/// Parses a stream name and checks the settings contain it.
pub fn parse_stream(value: &str, settings: &NotificationSettings) -> CliResult<StreamKind> {
    let kind = StreamKind::parse(value).map_err(|e| CliError::validation(e.to_string()))?;
    if settings.stream(kind).is_none() {
        return Err(CliError::validation(format!(
            "Settings have no '{kind}' stream"
        )));
    }
    Ok(kind)
}
