//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test file uses every fixture

use notifyprefs::models::{Channel, NotificationSettings, Stream, StreamKind};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Path to the notifyprefs binary
pub fn notifyprefs_bin() -> String {
    std::env::var("CARGO_BIN_EXE_notifyprefs")
        .unwrap_or_else(|_| "target/release/notifyprefs".to_string())
}

/// Creates a Command with an isolated config directory.
pub fn isolated_command(args: &[&str], config_dir: &Path) -> Command {
    let mut cmd = Command::new(notifyprefs_bin());
    cmd.env("NOTIFYPREFS_CONFIG_DIR", config_dir);
    cmd.env_remove("NOTIFYPREFS_LOG");
    cmd.args(args);
    cmd
}

/// Builds a stream with the given stored values.
pub fn stream(kind: StreamKind, values: &[(&str, bool)]) -> Stream {
    let mut stream = Stream::new(kind);
    for (key, value) in values {
        stream.preferences.insert((*key).to_string(), *value);
    }
    stream
}

/// Account-wide settings with two keys on the timeline and an empty email stream.
pub fn remote_service_settings() -> NotificationSettings {
    NotificationSettings::new(
        Channel::RemoteService,
        vec![
            stream(
                StreamKind::Timeline,
                &[("comment_like", true), ("comment_reply", true)],
            ),
            Stream::new(StreamKind::Email),
        ],
    )
}

/// Settings for a named site with all three streams.
pub fn site_settings() -> NotificationSettings {
    NotificationSettings::new(
        Channel::Site {
            id: 42,
            name: Some("Garden Log".to_string()),
        },
        vec![
            stream(
                StreamKind::Timeline,
                &[("new_comment", true), ("comment_like", false), ("follow", true)],
            ),
            stream(StreamKind::Email, &[("new_comment", false)]),
            stream(StreamKind::Device, &[("new_comment", true)]),
        ],
    )
}

/// Writes settings as JSON into the temp dir and returns the path.
pub fn write_settings(dir: &TempDir, settings: &NotificationSettings) -> PathBuf {
    let path = dir.path().join("settings.json");
    let json = serde_json::to_string_pretty(settings).expect("Failed to serialize settings");
    fs::write(&path, json).expect("Failed to write settings");
    path
}

/// Reads a settings document back.
pub fn read_settings(path: &Path) -> NotificationSettings {
    NotificationSettings::load(path).expect("Failed to load settings")
}
