//! Pending-edit tracking and background saving for one screen visit.
//!
//! Toggles are recorded synchronously. When the screen closes the whole
//! pending map is handed to the update service on a worker thread; the UI
//! loop calls [`EditCoordinator::poll`] to pick up the result on its own
//! thread.

use anyhow::Result;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::models::{NotificationSettings, PendingEdits, StreamKind};
use crate::services::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::services::update::SettingsUpdateService;

/// Save progress for the current visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveState {
    /// Nothing pending
    Clean,
    /// Edits recorded but not sent
    Dirty,
    /// A save is in flight
    Saving,
    /// The last save failed; edits are still pending
    Failed {
        /// Error reported by the service
        error: String,
    },
}

impl std::fmt::Display for SaveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveState::Clean => write!(f, "Saved"),
            SaveState::Dirty => write!(f, "Unsaved changes"),
            SaveState::Saving => write!(f, "Saving..."),
            SaveState::Failed { .. } => write!(f, "✗ Save failed"),
        }
    }
}

/// Outcome of a finished save, reported by [`EditCoordinator::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveEvent {
    /// The service stored the values
    Saved {
        /// Stream that was updated
        stream: StreamKind,
        /// Values that were sent
        values: PendingEdits,
    },
    /// The service rejected the update
    Failed {
        /// Error reported by the service
        error: String,
    },
}

/// Message sent from the save worker back to the UI thread.
#[derive(Debug)]
struct SaveMessage {
    sent: PendingEdits,
    result: std::result::Result<(), String>,
}

/// Records toggles for one stream and saves them when asked.
pub struct EditCoordinator {
    settings: NotificationSettings,
    stream: StreamKind,
    pending: PendingEdits,
    state: SaveState,
    service: Arc<dyn SettingsUpdateService>,
    analytics: Arc<dyn AnalyticsSink>,
    receiver: Option<Receiver<SaveMessage>>,
}

impl std::fmt::Debug for EditCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditCoordinator")
            .field("stream", &self.stream)
            .field("pending", &self.pending)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl EditCoordinator {
    /// Creates a coordinator for `stream` of `settings`.
    ///
    /// Fails when the settings have no stream of that kind.
    pub fn new(
        settings: NotificationSettings,
        stream: StreamKind,
        service: Arc<dyn SettingsUpdateService>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Result<Self> {
        if settings.stream(stream).is_none() {
            anyhow::bail!("Settings have no '{stream}' stream");
        }

        Ok(Self {
            settings,
            stream,
            pending: PendingEdits::new(),
            state: SaveState::Clean,
            service,
            analytics,
            receiver: None,
        })
    }

    /// Settings as last known to this visit, including saved edits.
    #[must_use]
    pub const fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    /// Stream being edited.
    #[must_use]
    pub const fn stream(&self) -> StreamKind {
        self.stream
    }

    /// Current save state.
    #[must_use]
    pub const fn state(&self) -> &SaveState {
        &self.state
    }

    /// Edits not yet confirmed by the service.
    #[must_use]
    pub const fn pending(&self) -> &PendingEdits {
        &self.pending
    }

    /// Returns true while a save is in flight.
    #[must_use]
    pub const fn is_saving(&self) -> bool {
        matches!(self.state, SaveState::Saving)
    }

    /// Records a toggle. Later values for the same key replace earlier ones.
    pub fn record_toggle(&mut self, key: impl Into<String>, value: bool) {
        let key = key.into();
        debug!(stream = %self.stream, %key, value, "toggle recorded");
        self.pending.insert(key, value);

        if !self.is_saving() {
            self.state = SaveState::Dirty;
        }
    }

    /// Value a switch should display: the pending edit, else the row's value,
    /// else `true`.
    #[must_use]
    pub fn value_for(&self, key: &str, initial: Option<bool>) -> bool {
        self.pending
            .get(key)
            .copied()
            .or(initial)
            .unwrap_or(true)
    }

    /// Sends all pending edits to the update service in the background.
    ///
    /// Does nothing when there is nothing pending or a save is already in
    /// flight. Returns true when a save was dispatched.
    pub fn save_if_needed(&mut self) -> bool {
        if self.pending.is_empty() {
            debug!(stream = %self.stream, "nothing to save");
            return false;
        }

        if self.is_saving() {
            debug!(stream = %self.stream, "save already in flight");
            return false;
        }

        let (sender, receiver) = channel();
        let service = Arc::clone(&self.service);
        let settings = self.settings.clone();
        let stream = self.stream;
        let values = self.pending.clone();

        info!(%stream, count = values.len(), "saving notification settings");

        thread::spawn(move || {
            let result = service
                .update_settings(&settings, stream, &values)
                .map_err(|e| format!("{e:#}"));
            let _ = sender.send(SaveMessage {
                sent: values,
                result,
            });
        });

        self.receiver = Some(receiver);
        self.state = SaveState::Saving;
        true
    }

    /// Re-sends the pending edits after a failure.
    ///
    /// Returns true when a save was dispatched.
    pub fn retry(&mut self) -> bool {
        if !matches!(self.state, SaveState::Failed { .. }) {
            return false;
        }
        info!(stream = %self.stream, "retrying notification settings save");
        self.save_if_needed()
    }

    /// Checks for a finished save without blocking.
    pub fn poll(&mut self) -> Option<SaveEvent> {
        let receiver = self.receiver.as_ref()?;
        match receiver.try_recv() {
            Ok(message) => Some(self.complete(message)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(self.worker_vanished()),
        }
    }

    /// Blocks up to `timeout` for the in-flight save to finish.
    pub fn wait(&mut self, timeout: Duration) -> Option<SaveEvent> {
        let receiver = self.receiver.as_ref()?;
        match receiver.recv_timeout(timeout) {
            Ok(message) => Some(self.complete(message)),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(self.worker_vanished()),
        }
    }

    fn worker_vanished(&mut self) -> SaveEvent {
        let sent = self.pending.clone();
        self.complete(SaveMessage {
            sent,
            result: Err("save worker stopped without reporting a result".to_string()),
        })
    }

    fn complete(&mut self, message: SaveMessage) -> SaveEvent {
        self.receiver = None;

        match message.result {
            Ok(()) => {
                // Keep edits made after the save was dispatched
                self.pending
                    .retain(|key, value| message.sent.get(key).copied() != Some(*value));
                self.state = if self.pending.is_empty() {
                    SaveState::Clean
                } else {
                    SaveState::Dirty
                };

                if let Err(e) = self.settings.apply(self.stream, &message.sent) {
                    warn!(stream = %self.stream, error = %e, "could not merge saved values");
                }

                info!(stream = %self.stream, count = message.sent.len(), "notification settings saved");
                self.analytics
                    .track(AnalyticsEvent::SettingsUpdated { success: true });

                SaveEvent::Saved {
                    stream: self.stream,
                    values: message.sent,
                }
            }
            Err(error) => {
                warn!(stream = %self.stream, %error, "notification settings save failed");
                self.analytics
                    .track(AnalyticsEvent::SettingsUpdated { success: false });
                self.state = SaveState::Failed {
                    error: error.clone(),
                };

                SaveEvent::Failed { error }
            }
        }
    }
}
