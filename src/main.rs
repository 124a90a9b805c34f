//! NotifyPrefs - Terminal-based notification settings editor
//!
//! Shows the notification preferences of a channel per delivery stream and
//! saves the toggles made on each screen when the screen is left.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use notifyprefs::cli::{ConfigArgs, SetArgs, ShowArgs};
use notifyprefs::config::Config;
use notifyprefs::constants::APP_BINARY_NAME;
use notifyprefs::logging::{self, LogTarget};
use notifyprefs::models::{NotificationSettings, StreamKind};
use notifyprefs::services::{
    ConfigFileOpener, ConfigPushCapability, JsonFileSettingsService, TracingAnalytics,
};
use notifyprefs::tui::{self, AppState, DetailsServices};

/// NotifyPrefs - Terminal-based notification settings editor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Edit notification settings interactively (default)
    Edit(EditArgs),
    /// Print the settings screen for a stream
    Show(ShowArgs),
    /// Change preferences for a stream and save them
    Set(SetArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

/// Edit notification settings interactively
#[derive(Args, Debug, Default)]
struct EditArgs {
    /// Settings JSON document (defaults to paths.settings_file)
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Open this stream directly (timeline, email, device)
    #[arg(long, value_name = "KIND")]
    stream: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        None => return run_editor(&EditArgs::default(), cli.verbose),
        Some(Command::Edit(args)) => return run_editor(&args, cli.verbose),
        Some(Command::Show(args)) => {
            init_headless_logging(cli.verbose);
            args.execute()
        }
        Some(Command::Set(args)) => {
            init_headless_logging(cli.verbose);
            args.execute()
        }
        Some(Command::Config(args)) => {
            init_headless_logging(cli.verbose);
            args.execute()
        }
    };

    if let Err(e) = result {
        e.exit();
    }

    Ok(())
}

/// Logs to stderr; a broken config falls back to defaults so the command
/// itself can report the problem.
fn init_headless_logging(verbose: bool) {
    let config = Config::load().unwrap_or_default();
    if let Err(e) = logging::init(&config, verbose, &LogTarget::Stderr) {
        eprintln!("Warning: {e:#}");
    }
}

/// Runs the interactive editor.
fn run_editor(args: &EditArgs, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    logging::init(&config, verbose, &LogTarget::default_file()?)?;

    let Some(settings_path) = args
        .settings
        .clone()
        .or_else(|| config.paths.settings_file.clone())
    else {
        anyhow::bail!(
            "No settings file given.\n\n\
             Pass one with:\n  {APP_BINARY_NAME} --settings path/to/settings.json\n\n\
             or store a default with:\n  {APP_BINARY_NAME} config set --settings-file path/to/settings.json"
        );
    };

    let settings = NotificationSettings::load(&settings_path)?;
    let initial_stream = args.stream.as_deref().map(StreamKind::parse).transpose()?;

    let config_path = Config::config_file_path()?;
    let services = DetailsServices {
        update: Arc::new(JsonFileSettingsService::new(settings_path)),
        analytics: Arc::new(TracingAnalytics),
        push: Arc::new(ConfigPushCapability::new(config_path.clone())),
        opener: Arc::new(ConfigFileOpener::new(config_path)),
    };

    let mut app_state = AppState::new(config, settings, services);
    if let Some(stream) = initial_stream {
        app_state
            .open_stream(stream)
            .with_context(|| format!("Cannot open the '{stream}' stream"))?;
    }

    // Initialize TUI
    let mut terminal = tui::setup_terminal()?;

    // Run main TUI loop
    let result = tui::run_tui(&mut app_state, &mut terminal);

    // Restore terminal
    tui::restore_terminal(terminal)?;

    // Check for errors
    result
}
