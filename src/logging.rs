//! Tracing subscriber setup.
//!
//! Interactive sessions log to a file in the config directory so output
//! does not tear the terminal UI; headless commands log to stderr.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::constants::{LOG_ENV, LOG_FILE_NAME};

/// Where log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error, for headless commands
    Stderr,
    /// Append to a file, for the interactive editor
    File(PathBuf),
}

impl LogTarget {
    /// Log file inside the config directory.
    pub fn default_file() -> Result<Self> {
        Ok(Self::File(Config::config_dir()?.join(LOG_FILE_NAME)))
    }
}

/// Filter directive: `NOTIFYPREFS_LOG` wins, then `--verbose`, then the
/// configured level.
#[must_use]
pub fn filter_directive(env_value: Option<&str>, verbose: bool, configured: &str) -> String {
    match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => value.to_string(),
        None if verbose => "debug".to_string(),
        None => configured.to_string(),
    }
}

/// Installs the global subscriber.
pub fn init(config: &Config, verbose: bool, target: &LogTarget) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(env_value.as_deref(), verbose, &config.logging.level);
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("Invalid log filter '{directive}'"))?;

    match target {
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .context("Failed to install log subscriber")?,
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
                .context("Failed to install log subscriber")?;
        }
    }

    Ok(())
}

fn open_log_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}
