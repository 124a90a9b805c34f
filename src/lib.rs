//! NotifyPrefs Library
//!
//! This library provides the core of the NotifyPrefs application: the
//! notification settings model, the projection of a stream into display
//! sections, the edit/save coordinator, and the terminal screens and CLI
//! commands built on them.

// Module declarations
pub mod cli;
pub mod config;
pub mod constants;
pub mod logging;
pub mod models;
pub mod services;
pub mod tui;
