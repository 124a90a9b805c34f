//! Projection of notification settings into display sections.
//!
//! Each time the details screen is shown or refreshed the sections are
//! rebuilt from scratch; nothing here keeps state between calls.

use crate::models::{Channel, NotificationSettings, Row, Section, Stream, StreamKind};
use crate::services::push::PushCapability;

/// Label of the row shown when push notifications are off system-wide.
pub const OPEN_SYSTEM_SETTINGS: &str = "Open System Settings";

/// Footer explaining why the device stream shows no toggles.
pub const PUSH_DISABLED_FOOTER: &str = "Push notifications have been turned off in your system \
settings. Allow notifications for this app to turn them back on.";

/// Returns true when the device stream cannot deliver because the system
/// has push notifications turned off.
pub fn is_device_stream_disabled(stream: &Stream, push: &dyn PushCapability) -> bool {
    stream.kind == StreamKind::Device && !push.notifications_enabled()
}

/// Builds the display sections for one stream.
///
/// - Device stream with push disabled: a single informational section.
/// - Remote-service channel: every toggle in one section.
/// - Any other channel: one section per toggle, each with its own footer.
///
/// The first section carries the channel title as its header.
pub fn build_sections(
    settings: &NotificationSettings,
    stream: &Stream,
    push: &dyn PushCapability,
) -> Vec<Section> {
    let mut sections = if is_device_stream_disabled(stream, push) {
        sections_for_disabled_device_stream()
    } else {
        sections_for_settings(settings, stream)
    };

    if let Some(first) = sections.first_mut() {
        first.header = Some(settings.header_title());
    }

    sections
}

fn sections_for_settings(settings: &NotificationSettings, stream: &Stream) -> Vec<Section> {
    let rows: Vec<Row> = settings
        .sorted_preference_keys(stream)
        .into_iter()
        .map(|key| {
            let description = settings.localized_description(&key);
            let value = stream.value(&key);
            Row::toggle(description, key, value)
        })
        .collect();

    if rows.is_empty() {
        return Vec::new();
    }

    if settings.channel == Channel::RemoteService {
        return vec![Section::new(rows)];
    }

    rows.into_iter()
        .map(|row| {
            let footer = row
                .key()
                .map(|key| settings.localized_details(key))
                .unwrap_or_default();
            Section::with_footer(vec![row], footer)
        })
        .collect()
}

fn sections_for_disabled_device_stream() -> Vec<Section> {
    vec![Section::with_footer(
        vec![Row::info(OPEN_SYSTEM_SETTINGS)],
        PUSH_DISABLED_FOOTER,
    )]
}
