//! CLI command handlers for NotifyPrefs.
//!
//! This module provides headless, scriptable access to the notification
//! settings for automation and testing.

pub mod common;
pub mod config;
pub mod set;
pub mod show;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use set::SetArgs;
pub use show::ShowArgs;
