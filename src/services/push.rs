//! Queries whether the system currently allows push notifications.

use std::path::PathBuf;

use tracing::warn;

use crate::config::Config;

/// Answers whether push notifications are enabled at the system level.
pub trait PushCapability {
    /// Returns true when the system allows push notifications for this app.
    fn notifications_enabled(&self) -> bool;
}

/// Reads `device.push_enabled` from the config file on every query.
///
/// Re-reading means a refresh after the user edits the file picks up the
/// new value without restarting.
#[derive(Debug, Clone)]
pub struct ConfigPushCapability {
    path: PathBuf,
}

impl ConfigPushCapability {
    /// Creates a capability backed by the given config file.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl PushCapability for ConfigPushCapability {
    fn notifications_enabled(&self) -> bool {
        match Config::load_from(&self.path) {
            Ok(config) => config.device.push_enabled,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read push capability, assuming enabled");
                true
            }
        }
    }
}

/// A capability with a fixed answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPushCapability(pub bool);

impl PushCapability for FixedPushCapability {
    fn notifications_enabled(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_capability_tracks_file_changes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let capability = ConfigPushCapability::new(path.clone());

        // Missing file means defaults
        assert!(capability.notifications_enabled());

        let mut config = Config::new();
        config.device.push_enabled = false;
        config.save_to(&path).unwrap();
        assert!(!capability.notifications_enabled());

        config.device.push_enabled = true;
        config.save_to(&path).unwrap();
        assert!(capability.notifications_enabled());
    }

    #[test]
    fn test_config_capability_unreadable_file_assumes_enabled() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        assert!(ConfigPushCapability::new(path).notifications_enabled());
    }

    #[test]
    fn test_fixed_capability() {
        assert!(FixedPushCapability(true).notifications_enabled());
        assert!(!FixedPushCapability(false).notifications_enabled());
    }
}
