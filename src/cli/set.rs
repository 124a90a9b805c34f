//! `set` command: records toggles and saves them through the edit coordinator.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::common::{
    load_config, load_settings, parse_stream, resolve_settings_path, CliError, CliResult,
};
use crate::models::{NotificationSettings, StreamKind};
use crate::services::{EditCoordinator, JsonFileSettingsService, SaveEvent, TracingAnalytics};

/// Change notification preferences for a stream
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Settings JSON document (defaults to paths.settings_file)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Stream to edit (timeline, email, device)
    #[arg(long, value_name = "KIND")]
    stream: String,

    /// Preference key; repeat together with --value
    #[arg(long = "key", value_name = "KEY", required = true)]
    keys: Vec<String>,

    /// New value for the matching --key (on/off, true/false)
    #[arg(long = "value", value_name = "BOOL", required = true)]
    values: Vec<String>,
}

impl SetArgs {
    /// Execute set command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let path = resolve_settings_path(self.settings.as_deref(), &config)?;
        let settings = load_settings(&path)?;
        let kind = parse_stream(&self.stream, &settings)?;
        let edits = self.edits(&settings, kind)?;

        let mut coordinator = EditCoordinator::new(
            settings,
            kind,
            Arc::new(JsonFileSettingsService::new(path)),
            Arc::new(TracingAnalytics),
        )
        .map_err(|e| CliError::validation(e.to_string()))?;

        for (key, value) in edits {
            coordinator.record_toggle(key, value);
        }
        coordinator.save_if_needed();

        let timeout = Duration::from_millis(config.save.shutdown_timeout_ms);
        match coordinator.wait(timeout) {
            Some(SaveEvent::Saved { stream, values }) => {
                println!(
                    "Updated {} preference(s) on {}",
                    values.len(),
                    stream.description()
                );
                Ok(())
            }
            Some(SaveEvent::Failed { error }) => Err(CliError::io(format!(
                "Failed to update notification settings: {error}"
            ))),
            None => Err(CliError::io(format!(
                "Timed out after {}ms waiting for the settings update",
                config.save.shutdown_timeout_ms
            ))),
        }
    }

    /// Pairs keys with parsed values, rejecting keys the stream cannot show.
    fn edits(
        &self,
        settings: &NotificationSettings,
        kind: StreamKind,
    ) -> CliResult<Vec<(String, bool)>> {
        if self.keys.len() != self.values.len() {
            return Err(CliError::validation(format!(
                "Got {} --key but {} --value arguments",
                self.keys.len(),
                self.values.len()
            )));
        }

        let known = settings
            .stream(kind)
            .map(|stream| settings.sorted_preference_keys(stream))
            .unwrap_or_default();

        self.keys
            .iter()
            .zip(&self.values)
            .map(|(key, value)| {
                if !known.contains(key) {
                    return Err(CliError::validation(format!(
                        "Unknown preference '{key}'. Known keys: {}",
                        known.join(", ")
                    )));
                }
                Ok((key.clone(), parse_bool(value)?))
            })
            .collect()
    }
}

/// Parses `on/off`, `true/false`, `yes/no` and `1/0`.
fn parse_bool(value: &str) -> CliResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(CliError::validation(format!(
            "Invalid value '{other}'. Use on/off or true/false"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("On").unwrap());
        assert!(parse_bool("true").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }
}
