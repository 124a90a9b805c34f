//! End-to-end tests for `notifyprefs config` commands.

use notifyprefs::config::{Config, ThemeMode};
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

// ============================================================================
// Show Command Tests
// ============================================================================

#[test]
fn test_config_show_default() {
    let temp_dir = TempDir::new().unwrap();

    let output = isolated_command(&["config", "show"], temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "Show config should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Settings file: (not set)"));
    assert!(stdout.contains("Push notifications: enabled"));
}

#[test]
fn test_config_show_json_schema() {
    let temp_dir = TempDir::new().unwrap();

    let output = isolated_command(&["config", "show", "--json"], temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let result: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON output");

    assert!(result["paths"].is_object(), "Should have paths object");
    assert_eq!(result["device"]["push_enabled"], true);
    assert_eq!(result["save"]["shutdown_timeout_ms"], 3000);
    assert_eq!(result["ui"]["theme"], "auto");
    assert_eq!(result["logging"]["level"], "info");
}

#[test]
fn test_config_path_respects_override() {
    let temp_dir = TempDir::new().unwrap();

    let output = isolated_command(&["config", "path"], temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim(),
        temp_dir.path().join("config.toml").display().to_string()
    );
}

// ============================================================================
// Set Command Tests
// ============================================================================

#[test]
fn test_config_set_values() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = write_settings(&temp_dir, &remote_service_settings());

    let output = isolated_command(
        &[
            "config",
            "set",
            "--settings-file",
            settings_path.to_str().unwrap(),
            "--push-enabled",
            "false",
            "--theme",
            "dark",
        ],
        temp_dir.path(),
    )
    .output()
    .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "Set config should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();
    assert_eq!(config.paths.settings_file, Some(settings_path));
    assert!(!config.device.push_enabled);
    assert_eq!(config.ui.theme_mode, ThemeMode::Dark);
}

#[test]
fn test_config_set_requires_an_option() {
    let temp_dir = TempDir::new().unwrap();

    let output = isolated_command(&["config", "set"], temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_config_set_invalid_theme() {
    let temp_dir = TempDir::new().unwrap();

    let output = isolated_command(&["config", "set", "--theme", "sepia"], temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(!temp_dir.path().join("config.toml").exists());
}

#[test]
fn test_push_disabled_in_config_hides_device_toggles() {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = write_settings(&temp_dir, &site_settings());

    let output = isolated_command(
        &["config", "set", "--push-enabled", "false"],
        temp_dir.path(),
    )
    .output()
    .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));

    let output = isolated_command(
        &[
            "show",
            "--settings",
            settings_path.to_str().unwrap(),
            "--stream",
            "device",
            "--json",
        ],
        temp_dir.path(),
    )
    .output()
    .expect("Failed to execute command");
    assert_eq!(output.status.code(), Some(0));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["sections"][0]["rows"][0]["kind"], "info");
}

#[test]
fn test_config_show_rejects_broken_file() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("config.toml"), "[save]\nshutdown_timeout_ms = 0\n").unwrap();

    let output = isolated_command(&["config", "show"], temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_config_set_logs_to_stderr() {
    let temp_dir = TempDir::new().unwrap();

    let output = isolated_command(
        &["--verbose", "config", "set", "--push-enabled", "false"],
        temp_dir.path(),
    )
    .output()
    .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration saved"));
}
