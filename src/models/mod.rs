//! Data models for notification settings and the rows built from them.
//!
//! Models are designed to be independent of UI and business logic.

pub mod row;
pub mod settings;

// Re-export all model types
pub use row::{Row, RowKind, Section};
pub use settings::{Channel, NotificationSettings, PendingEdits, Stream, StreamKind};
