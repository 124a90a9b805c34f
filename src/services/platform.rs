//! Opens the system-level notification settings for this app.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::info;

use crate::config::Config;

/// Navigates the user to the system-level settings for this app.
pub trait SystemSettingsOpener {
    /// Opens the settings; returns once the request has been handed off.
    fn open_system_settings(&self) -> Result<()>;
}

/// Hands the config file, where push permission lives, to the desktop opener.
#[derive(Debug, Clone)]
pub struct ConfigFileOpener {
    path: PathBuf,
}

impl ConfigFileOpener {
    /// Creates an opener for the given config file.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The platform command used to open a file.
    fn command(&self) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(&self.path);
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]).arg(&self.path);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(&self.path);
            cmd
        }
    }
}

impl SystemSettingsOpener for ConfigFileOpener {
    fn open_system_settings(&self) -> Result<()> {
        if !self.path.exists() {
            Config::default().save_to(&self.path)?;
        }

        info!(path = %self.path.display(), "opening system settings");
        self.command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        Ok(())
    }
}
