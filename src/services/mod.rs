//! Service layer for business logic.
//!
//! This module contains the section builder, the edit/save coordinator, and
//! the collaborators they talk to (update service, push capability,
//! analytics, system settings navigation).

pub mod analytics;
pub mod coordinator;
pub mod platform;
pub mod push;
pub mod sections;
pub mod update;

// Re-export commonly used types and functions
pub use analytics::{AnalyticsEvent, AnalyticsSink, TracingAnalytics};
pub use coordinator::{EditCoordinator, SaveEvent, SaveState};
pub use platform::{ConfigFileOpener, SystemSettingsOpener};
pub use push::{ConfigPushCapability, FixedPushCapability, PushCapability};
pub use sections::build_sections;
pub use update::{JsonFileSettingsService, SettingsUpdateService};
