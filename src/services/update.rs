//! Settings-update service: pushes changed preference values to the store.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::models::{NotificationSettings, PendingEdits, StreamKind};

/// Applies new preference values for one stream.
///
/// Calls are blocking; callers that must not block run them on a worker
/// thread. The whole `new_values` map is one unit: implementations either
/// apply all of it or fail.
pub trait SettingsUpdateService: Send + Sync {
    /// Stores `new_values` for `stream` of `settings`.
    fn update_settings(
        &self,
        settings: &NotificationSettings,
        stream: StreamKind,
        new_values: &PendingEdits,
    ) -> Result<()>;
}

/// Suffix counter for temp files written by this process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Stores settings in the JSON document they were loaded from.
///
/// Updates are read-modify-write on the whole document, so clones share one
/// lock and writes from concurrent saves apply one after the other.
#[derive(Debug, Clone)]
pub struct JsonFileSettingsService {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileSettingsService {
    /// Creates a service writing to the given settings document.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Path of the settings document.
    #[must_use]
    pub const fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SettingsUpdateService for JsonFileSettingsService {
    fn update_settings(
        &self,
        settings: &NotificationSettings,
        stream: StreamKind,
        new_values: &PendingEdits,
    ) -> Result<()> {
        debug!(path = %self.path.display(), %stream, count = new_values.len(), "updating settings");

        // The document is only replaced by rename, so a poisoned lock is still usable
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut stored = NotificationSettings::load(&self.path)?;
        if stored.channel != settings.channel {
            anyhow::bail!(
                "Settings document {} belongs to a different channel",
                self.path.display()
            );
        }

        stored.apply(stream, new_values)?;
        stored.updated_at = Some(Utc::now());

        let content =
            serde_json::to_string_pretty(&stored).context("Failed to serialize settings")?;
        let temp_path = temp_path_for(&self.path);

        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp settings file: {}", temp_path.display())
        })?;
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!("Failed to rename temp settings file to: {}", self.path.display())
        })?;

        info!(path = %self.path.display(), %stream, count = new_values.len(), "settings updated");
        Ok(())
    }
}

/// Unique sibling temp file, so separate writers never share one.
fn temp_path_for(path: &Path) -> PathBuf {
    let suffix = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    path.with_extension(format!("json.{}-{suffix}.tmp", std::process::id()))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::SettingsUpdateService;
    use crate::models::{NotificationSettings, PendingEdits, StreamKind};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Records calls and answers from a script; succeeds once the script runs out.
    #[derive(Debug, Default)]
    pub struct ScriptedService {
        calls: Mutex<Vec<(StreamKind, PendingEdits)>>,
        failures: Mutex<VecDeque<String>>,
    }

    impl ScriptedService {
        /// Fails the next `messages.len()` calls with the given messages.
        pub fn failing(messages: &[&str]) -> Self {
            Self {
                calls: Mutex::default(),
                failures: Mutex::new(messages.iter().map(|m| (*m).to_string()).collect()),
            }
        }

        pub fn calls(&self) -> Vec<(StreamKind, PendingEdits)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SettingsUpdateService for ScriptedService {
        fn update_settings(
            &self,
            _settings: &NotificationSettings,
            stream: StreamKind,
            new_values: &PendingEdits,
        ) -> anyhow::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((stream, new_values.clone()));
            match self.failures.lock().unwrap().pop_front() {
                Some(message) => Err(anyhow::anyhow!(message)),
                None => Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Channel, Stream};
    use tempfile::TempDir;

    fn write_settings(dir: &TempDir) -> (PathBuf, NotificationSettings) {
        let settings = NotificationSettings::new(
            Channel::Other,
            vec![Stream::new(StreamKind::Timeline), Stream::new(StreamKind::Email)],
        );
        let path = dir.path().join("settings.json");
        fs::write(&path, serde_json::to_string(&settings).unwrap()).unwrap();
        (path, settings)
    }

    #[test]
    fn test_update_writes_values_and_timestamp() {
        let dir = TempDir::new().unwrap();
        let (path, settings) = write_settings(&dir);
        let service = JsonFileSettingsService::new(path.clone());

        let values: PendingEdits = [("comment_reply".to_string(), false)].into_iter().collect();
        service
            .update_settings(&settings, StreamKind::Email, &values)
            .unwrap();

        let stored = NotificationSettings::load(&path).unwrap();
        assert!(!stored.stream(StreamKind::Email).unwrap().value("comment_reply"));
        assert!(stored
            .stream(StreamKind::Timeline)
            .unwrap()
            .preferences
            .is_empty());
        assert!(stored.updated_at.is_some());

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_concurrent_updates_keep_both_streams() {
        let dir = TempDir::new().unwrap();
        let (path, settings) = write_settings(&dir);
        let service = Arc::new(JsonFileSettingsService::new(path.clone()));
        let values: PendingEdits = [("comment_like".to_string(), false)].into_iter().collect();

        for _ in 0..25 {
            fs::write(&path, serde_json::to_string(&settings).unwrap()).unwrap();

            let handles: Vec<_> = [StreamKind::Timeline, StreamKind::Email]
                .into_iter()
                .map(|stream| {
                    let service = Arc::clone(&service);
                    let settings = settings.clone();
                    let values = values.clone();
                    std::thread::spawn(move || service.update_settings(&settings, stream, &values))
                })
                .collect();
            for handle in handles {
                handle.join().unwrap().unwrap();
            }

            let stored = NotificationSettings::load(&path).unwrap();
            assert!(!stored.stream(StreamKind::Timeline).unwrap().value("comment_like"));
            assert!(!stored.stream(StreamKind::Email).unwrap().value("comment_like"));
        }
    }

    #[test]
    fn test_temp_paths_are_unique() {
        let path = Path::new("/tmp/settings.json");
        assert_ne!(temp_path_for(path), temp_path_for(path));
    }

    #[test]
    fn test_update_missing_document_fails() {
        let dir = TempDir::new().unwrap();
        let settings = NotificationSettings::new(Channel::Other, vec![]);
        let service = JsonFileSettingsService::new(dir.path().join("missing.json"));

        let result = service.update_settings(&settings, StreamKind::Email, &PendingEdits::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_update_rejects_other_channel() {
        let dir = TempDir::new().unwrap();
        let (path, _) = write_settings(&dir);
        let service = JsonFileSettingsService::new(path);
        let foreign = NotificationSettings::new(Channel::RemoteService, vec![]);

        let values: PendingEdits = [("research".to_string(), false)].into_iter().collect();
        assert!(service
            .update_settings(&foreign, StreamKind::Email, &values)
            .is_err());
    }

    #[test]
    fn test_update_unknown_stream_fails_without_writing() {
        let dir = TempDir::new().unwrap();
        let (path, settings) = write_settings(&dir);
        let before = fs::read_to_string(&path).unwrap();
        let service = JsonFileSettingsService::new(path.clone());

        let values: PendingEdits = [("comment_like".to_string(), false)].into_iter().collect();
        assert!(service
            .update_settings(&settings, StreamKind::Device, &values)
            .is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }
}
