//! `show` command: prints the sections built for one stream.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::common::{
    load_config, load_settings, parse_stream, resolve_settings_path, CliError, CliResult,
};
use crate::models::{RowKind, Section};
use crate::services::{build_sections, FixedPushCapability};

/// Print the notification settings screen for a stream
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Settings JSON document (defaults to paths.settings_file)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Stream to show (timeline, email, device)
    #[arg(long, value_name = "KIND")]
    stream: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Treat push notifications as turned off at the system level
    #[arg(long)]
    push_disabled: bool,
}

/// JSON-serializable screen for output
#[derive(Serialize, Debug)]
struct ShowOutput<'a> {
    channel: String,
    stream: String,
    title: &'static str,
    sections: &'a [Section],
}

impl ShowArgs {
    /// Execute show command
    pub fn execute(&self) -> CliResult<()> {
        let config = load_config()?;
        let path = resolve_settings_path(self.settings.as_deref(), &config)?;
        let settings = load_settings(&path)?;
        let kind = parse_stream(&self.stream, &settings)?;

        let push = FixedPushCapability(config.device.push_enabled && !self.push_disabled);
        let sections = settings
            .stream(kind)
            .map(|stream| build_sections(&settings, stream, &push))
            .unwrap_or_default();

        if self.json {
            let output = ShowOutput {
                channel: settings.header_title(),
                stream: kind.to_string(),
                title: kind.description(),
                sections: &sections,
            };
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
            println!("{json}");
        } else {
            println!("{}", kind.description());
            println!();
            output_sections(&sections);
        }

        Ok(())
    }
}

/// Output sections in human-readable format
fn output_sections(sections: &[Section]) {
    if sections.is_empty() {
        println!("  (no notification settings)");
        return;
    }

    for section in sections {
        if let Some(header) = &section.header {
            println!("{}", header.to_uppercase());
        }
        for row in &section.rows {
            match &row.kind {
                RowKind::Toggle { value: true, .. } => println!("  [on ] {}", row.description),
                RowKind::Toggle { value: false, .. } => println!("  [off] {}", row.description),
                RowKind::Info => println!("  -> {}", row.description),
            }
        }
        if let Some(footer) = &section.footer {
            println!("      {footer}");
        }
        println!();
    }
}
