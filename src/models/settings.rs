//! Notification settings model: channels, streams and preference catalogs.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Unsaved toggle changes keyed by preference key.
pub type PendingEdits = BTreeMap<String, bool>;

/// Where a set of notification settings applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Channel {
    /// A single site the user follows or administers
    Site {
        /// Remote site identifier
        id: u64,
        /// Site title, if the site has one
        #[serde(default)]
        name: Option<String>,
    },
    /// Every site the user does not own
    Other,
    /// Account-wide updates from the remote notification service
    RemoteService,
}

impl Channel {
    /// Preference keys this channel knows about, in display order.
    #[must_use]
    pub const fn catalog(&self) -> &'static [&'static str] {
        match self {
            Self::Site { .. } => &[
                "new_comment",
                "comment_like",
                "post_like",
                "follow",
                "achievement",
                "mentions",
            ],
            Self::Other => &["comment_like", "comment_reply"],
            Self::RemoteService => &["marketing", "research", "community"],
        }
    }
}

/// Delivery mechanism of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamKind {
    /// In-app notifications list
    Timeline,
    /// Email digests
    Email,
    /// Push notifications delivered to this device
    Device,
}

impl StreamKind {
    /// All stream kinds in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Timeline, Self::Email, Self::Device]
    }

    /// Human-readable stream name, used as the screen title.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Timeline => "Notifications Tab",
            Self::Email => "Email",
            Self::Device => "Push Notifications",
        }
    }

    /// Parses a command-line stream name (`timeline`, `email`, `device`).
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "timeline" | "notifications" => Ok(Self::Timeline),
            "email" => Ok(Self::Email),
            "device" | "push" => Ok(Self::Device),
            other => anyhow::bail!(
                "Unknown stream '{other}'. Expected one of: timeline, email, device"
            ),
        }
    }
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeline => write!(f, "timeline"),
            Self::Email => write!(f, "email"),
            Self::Device => write!(f, "device"),
        }
    }
}

/// One delivery channel with its own preference values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    /// Delivery mechanism
    pub kind: StreamKind,
    /// Preference values; an absent key means enabled
    #[serde(default)]
    pub preferences: BTreeMap<String, bool>,
}

impl Stream {
    /// Creates a stream with no stored preferences.
    #[must_use]
    pub const fn new(kind: StreamKind) -> Self {
        Self {
            kind,
            preferences: BTreeMap::new(),
        }
    }

    /// Current value for a key, defaulting to `true` when unset.
    #[must_use]
    pub fn value(&self, key: &str) -> bool {
        self.preferences.get(key).copied().unwrap_or(true)
    }
}

/// Notification settings for one channel, as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Channel these settings apply to
    pub channel: Channel,
    /// Streams owned by this channel
    #[serde(default)]
    pub streams: Vec<Stream>,
    /// Last time the document was written by a settings update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl NotificationSettings {
    /// Creates settings for a channel.
    #[must_use]
    pub const fn new(channel: Channel, streams: Vec<Stream>) -> Self {
        Self {
            channel,
            streams,
            updated_at: None,
        }
    }

    /// Loads a settings document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Parses and validates a settings document.
    pub fn from_json(content: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that no stream kind appears twice.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for stream in &self.streams {
            if !seen.insert(stream.kind) {
                anyhow::bail!("Stream '{}' is listed more than once", stream.kind);
            }
        }
        Ok(())
    }

    /// Finds the stream of the given kind.
    #[must_use]
    pub fn stream(&self, kind: StreamKind) -> Option<&Stream> {
        self.streams.iter().find(|s| s.kind == kind)
    }

    /// Finds the stream of the given kind, mutably.
    pub fn stream_mut(&mut self, kind: StreamKind) -> Option<&mut Stream> {
        self.streams.iter_mut().find(|s| s.kind == kind)
    }

    /// Merges saved values into a stream.
    pub fn apply(&mut self, kind: StreamKind, values: &PendingEdits) -> Result<()> {
        let stream = self
            .stream_mut(kind)
            .with_context(|| format!("Settings have no '{kind}' stream"))?;
        for (key, value) in values {
            stream.preferences.insert(key.clone(), *value);
        }
        Ok(())
    }

    /// Preference keys to show for a stream, in display order.
    ///
    /// Every catalog key of the channel comes first, in catalog order, so an
    /// unset key still shows up with its default value. Keys stored on any
    /// stream that the catalog does not know follow alphabetically.
    #[must_use]
    pub fn sorted_preference_keys(&self, stream: &Stream) -> Vec<String> {
        let catalog = self.channel.catalog();
        let extra: BTreeSet<&str> = self
            .streams
            .iter()
            .chain(std::iter::once(stream))
            .flat_map(|s| s.preferences.keys().map(String::as_str))
            .filter(|key| !catalog.contains(key))
            .collect();

        catalog
            .iter()
            .map(|key| (*key).to_string())
            .chain(extra.into_iter().map(str::to_string))
            .collect()
    }

    /// Row label for a preference key.
    #[must_use]
    pub fn localized_description(&self, key: &str) -> String {
        match key {
            "new_comment" => "Comments on my site".to_string(),
            "comment_like" => "Likes on my comments".to_string(),
            "post_like" => "Likes on my posts".to_string(),
            "follow" => "Site follows".to_string(),
            "achievement" => "Site achievements".to_string(),
            "mentions" => "Username mentions".to_string(),
            "comment_reply" => "Replies to your comments".to_string(),
            "marketing" => "Suggestions".to_string(),
            "research" => "Research".to_string(),
            "community" => "Community".to_string(),
            other => humanize(other),
        }
    }

    /// Explanatory footer text for a preference key.
    #[must_use]
    pub fn localized_details(&self, key: &str) -> String {
        match key {
            "marketing" => "Tips for getting the most out of your account.".to_string(),
            "research" => "Opportunities to participate in research & surveys.".to_string(),
            "community" => "Information on events & community programs near you.".to_string(),
            "new_comment" => "Someone left a comment on one of your posts.".to_string(),
            "comment_like" => "Someone liked one of your comments.".to_string(),
            "post_like" => "Someone liked one of your posts.".to_string(),
            "follow" => "Someone started following your site.".to_string(),
            "achievement" => "Your site reached a milestone.".to_string(),
            "mentions" => "Someone mentioned your username.".to_string(),
            "comment_reply" => "Someone replied to one of your comments.".to_string(),
            other => format!("Notifications about {}.", humanize(other).to_lowercase()),
        }
    }

    /// Title shown above the first section.
    #[must_use]
    pub fn header_title(&self) -> String {
        match &self.channel {
            Channel::RemoteService => "Account Updates".to_string(),
            Channel::Other => "Other Sites".to_string(),
            Channel::Site { name, .. } => name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or("Unnamed Site")
                .to_string(),
        }
    }
}

/// Turns `comment_reply` into `Comment reply`.
fn humanize(key: &str) -> String {
    let spaced = key.replace(['_', '-'], " ");
    let mut chars = spaced.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream_with(kind: StreamKind, values: &[(&str, bool)]) -> Stream {
        Stream {
            kind,
            preferences: values
                .iter()
                .map(|(k, v)| ((*k).to_string(), *v))
                .collect(),
        }
    }

    #[test]
    fn test_stream_value_defaults_to_true() {
        let stream = stream_with(StreamKind::Email, &[("follow", false)]);
        assert!(!stream.value("follow"));
        assert!(stream.value("mentions"));
    }

    #[test]
    fn test_sorted_keys_follow_catalog_order() {
        let stream = stream_with(
            StreamKind::Timeline,
            &[("mentions", true), ("new_comment", false), ("follow", true)],
        );
        let settings = NotificationSettings::new(
            Channel::Site { id: 7, name: None },
            vec![stream.clone()],
        );

        assert_eq!(
            settings.sorted_preference_keys(&stream),
            vec![
                "new_comment",
                "comment_like",
                "post_like",
                "follow",
                "achievement",
                "mentions"
            ]
        );
    }

    #[test]
    fn test_sorted_keys_keep_unset_catalog_keys() {
        let stream = stream_with(StreamKind::Timeline, &[("follow", false)]);
        let settings = NotificationSettings::new(
            Channel::Site { id: 7, name: None },
            vec![stream.clone()],
        );

        let keys = settings.sorted_preference_keys(&stream);
        assert_eq!(keys.len(), 6);
        let enabled = keys.iter().filter(|key| stream.value(key)).count();
        assert_eq!(enabled, 5);
    }

    #[test]
    fn test_sorted_keys_append_unknown_alphabetically() {
        let stream = stream_with(
            StreamKind::Email,
            &[("zeta", true), ("comment_reply", true), ("alpha", true)],
        );
        let settings = NotificationSettings::new(Channel::Other, vec![stream.clone()]);

        assert_eq!(
            settings.sorted_preference_keys(&stream),
            vec!["comment_like", "comment_reply", "alpha", "zeta"]
        );
    }

    #[test]
    fn test_sorted_keys_union_across_streams() {
        let timeline = stream_with(StreamKind::Timeline, &[("weekly_digest", true)]);
        let email = stream_with(StreamKind::Email, &[("alpha", false)]);
        let settings = NotificationSettings::new(Channel::Other, vec![timeline.clone(), email]);

        assert_eq!(
            settings.sorted_preference_keys(&timeline),
            vec!["comment_like", "comment_reply", "alpha", "weekly_digest"]
        );
    }

    #[test]
    fn test_sorted_keys_fall_back_to_catalog() {
        let stream = Stream::new(StreamKind::Device);
        let settings = NotificationSettings::new(Channel::RemoteService, vec![stream.clone()]);

        assert_eq!(
            settings.sorted_preference_keys(&stream),
            vec!["marketing", "research", "community"]
        );
    }

    #[test]
    fn test_localized_text_for_unknown_key() {
        let settings = NotificationSettings::new(Channel::Other, vec![]);
        assert_eq!(settings.localized_description("weekly_roundup"), "Weekly roundup");
        assert_eq!(
            settings.localized_details("weekly_roundup"),
            "Notifications about weekly roundup."
        );
    }

    #[test]
    fn test_header_title_per_channel() {
        let named = NotificationSettings::new(
            Channel::Site {
                id: 1,
                name: Some("Travel Notes".to_string()),
            },
            vec![],
        );
        let unnamed = NotificationSettings::new(Channel::Site { id: 2, name: None }, vec![]);
        let blank = NotificationSettings::new(
            Channel::Site {
                id: 3,
                name: Some("  ".to_string()),
            },
            vec![],
        );

        assert_eq!(named.header_title(), "Travel Notes");
        assert_eq!(unnamed.header_title(), "Unnamed Site");
        assert_eq!(blank.header_title(), "Unnamed Site");
        assert_eq!(
            NotificationSettings::new(Channel::Other, vec![]).header_title(),
            "Other Sites"
        );
        assert_eq!(
            NotificationSettings::new(Channel::RemoteService, vec![]).header_title(),
            "Account Updates"
        );
    }

    #[test]
    fn test_from_json_and_duplicate_streams() {
        let json = r#"{
            "channel": { "type": "site", "id": 42, "name": "Kitchen Blog" },
            "streams": [
                { "kind": "timeline", "preferences": { "follow": false } },
                { "kind": "device" }
            ]
        }"#;
        let settings = NotificationSettings::from_json(json).unwrap();
        assert_eq!(settings.streams.len(), 2);
        assert!(!settings.stream(StreamKind::Timeline).unwrap().value("follow"));
        assert!(settings.stream(StreamKind::Device).unwrap().preferences.is_empty());

        let duplicated = r#"{
            "channel": { "type": "other" },
            "streams": [ { "kind": "email" }, { "kind": "email" } ]
        }"#;
        assert!(NotificationSettings::from_json(duplicated).is_err());
    }

    #[test]
    fn test_apply_merges_values() {
        let mut settings = NotificationSettings::new(
            Channel::Other,
            vec![stream_with(StreamKind::Email, &[("comment_like", true)])],
        );
        let values: PendingEdits = [("comment_like".to_string(), false)].into_iter().collect();

        settings.apply(StreamKind::Email, &values).unwrap();
        assert!(!settings.stream(StreamKind::Email).unwrap().value("comment_like"));
        assert!(settings.apply(StreamKind::Device, &values).is_err());
    }

    #[test]
    fn test_stream_kind_parse() {
        assert_eq!(StreamKind::parse("Device").unwrap(), StreamKind::Device);
        assert_eq!(StreamKind::parse("push").unwrap(), StreamKind::Device);
        assert_eq!(StreamKind::parse("email").unwrap(), StreamKind::Email);
        assert!(StreamKind::parse("fax").is_err());
    }
}
