//! Fire-and-forget usage events.

use tracing::info;

use crate::models::StreamKind;

/// Events recorded by the settings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsEvent {
    /// The details screen for a stream was shown
    SettingsDetailsOpened {
        /// Stream being shown
        stream: StreamKind,
    },
    /// A settings update finished
    SettingsUpdated {
        /// Whether the service accepted the update
        success: bool,
    },
}

impl AnalyticsEvent {
    /// Stable event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SettingsDetailsOpened { .. } => "notification_settings_details_opened",
            Self::SettingsUpdated { .. } => "notification_settings_updated",
        }
    }
}

/// Receives analytics events. Implementations must not block.
pub trait AnalyticsSink: Send + Sync {
    /// Records an event.
    fn track(&self, event: AnalyticsEvent);
}

/// Emits analytics events as structured `tracing` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn track(&self, event: AnalyticsEvent) {
        match event {
            AnalyticsEvent::SettingsDetailsOpened { stream } => {
                info!(target: "analytics", event = event.name(), %stream);
            }
            AnalyticsEvent::SettingsUpdated { success } => {
                info!(target: "analytics", event = event.name(), success);
            }
        }
    }
}
