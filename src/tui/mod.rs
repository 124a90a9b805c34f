//! Terminal user interface components and state management.
//!
//! This module contains the main TUI loop, `AppState`, event handling,
//! and the screens built with Ratatui.

pub mod component;
pub mod error_dialog;
pub mod notification_details;
pub mod stream_picker;
pub mod theme;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::Config;
use crate::constants::APP_NAME;
use crate::models::{NotificationSettings, StreamKind};
use crate::services::SaveEvent;

// Re-export TUI components
pub use component::Component;
pub use error_dialog::{ErrorDialog, ErrorDialogEvent};
pub use notification_details::{DetailsEvent, DetailsServices, NotificationDetails};
pub use stream_picker::{StreamPicker, StreamPickerEvent};
pub use theme::Theme;

/// Application state for the interactive editor.
#[derive(Debug)]
pub struct AppState {
    /// Application configuration
    pub config: Config,
    /// Active color theme
    pub theme: Theme,
    /// Settings as last confirmed by the update service
    pub settings: NotificationSettings,
    services: DetailsServices,
    picker: StreamPicker,
    /// Open details screen, if any
    details: Option<NotificationDetails>,
    /// Dismissed screens whose save is still in flight
    saving: Vec<NotificationDetails>,
    /// Screens whose save failed, waiting for the user to choose Cancel or Retry
    failed: VecDeque<NotificationDetails>,
    error_dialog: Option<ErrorDialog>,
    /// One-line message shown in the status bar
    pub status_message: String,
    /// Set when the user asked to leave
    pub should_quit: bool,
}

impl AppState {
    /// Creates the app state showing the stream picker.
    #[must_use]
    pub fn new(config: Config, settings: NotificationSettings, services: DetailsServices) -> Self {
        let theme = Theme::from_mode(config.ui.theme_mode);
        let streams = settings.streams.iter().map(|s| s.kind).collect();
        let picker = StreamPicker::new(settings.header_title(), streams);

        Self {
            config,
            theme,
            settings,
            services,
            picker,
            details: None,
            saving: Vec::new(),
            failed: VecDeque::new(),
            error_dialog: None,
            status_message: "Select a stream to edit".to_string(),
            should_quit: false,
        }
    }

    /// Opens the details screen for a stream.
    ///
    /// Fails while an earlier visit to the same stream is still saving, since
    /// `settings` does not hold those values yet.
    pub fn open_stream(&mut self, stream: StreamKind) -> Result<()> {
        if self.saving.iter().any(|screen| screen.stream() == stream) {
            anyhow::bail!("{} settings are still saving", stream.description());
        }

        let details =
            NotificationDetails::open(self.settings.clone(), stream, self.services.clone())?;
        info!(%stream, "opened notification details");
        self.details = Some(details);
        Ok(())
    }

    /// Returns true while the error dialog is up.
    #[must_use]
    pub const fn is_showing_error(&self) -> bool {
        self.error_dialog.is_some()
    }

    /// Number of saves still in flight.
    #[must_use]
    pub fn saves_in_flight(&self) -> usize {
        self.saving.len()
    }

    /// Stream of the open details screen.
    #[must_use]
    pub fn open_details_stream(&self) -> Option<StreamKind> {
        self.details.as_ref().map(NotificationDetails::stream)
    }

    /// Rebuilds the open details screen, e.g. after the terminal regains focus.
    pub fn refresh(&mut self) {
        if let Some(details) = &mut self.details {
            details.refresh();
        }
    }

    /// Routes a key press to the topmost component.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if let Some(dialog) = &mut self.error_dialog {
            if let Some(event) = dialog.handle_input(key) {
                self.error_dialog = None;
                self.resolve_failure(event);
            }
            return;
        }

        if let Some(details) = &mut self.details {
            if let Some(DetailsEvent::Exit) = details.handle_input(key) {
                self.close_details();
            }
            return;
        }

        match self.picker.handle_input(key) {
            Some(StreamPickerEvent::Open(stream)) => {
                if let Err(e) = self.open_stream(stream) {
                    warn!(%stream, error = %e, "could not open stream");
                    self.status_message = format!("Error: {e}");
                }
            }
            Some(StreamPickerEvent::Quit) => self.should_quit = true,
            None => {}
        }
    }

    /// Collects finished saves from dismissed screens.
    pub fn poll_saves(&mut self) {
        let mut index = 0;
        while index < self.saving.len() {
            match self.saving[index].poll() {
                Some(event) => {
                    let screen = self.saving.remove(index);
                    self.handle_save_event(screen, event);
                }
                None => index += 1,
            }
        }
    }

    /// Gives in-flight saves up to `timeout` to finish before exit.
    pub fn finish_pending_saves(&mut self, timeout: Duration) {
        let deadline = Instant::now() + timeout;

        for mut screen in std::mem::take(&mut self.saving) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match screen.wait(remaining) {
                Some(SaveEvent::Saved { stream, values }) => {
                    if let Err(e) = self.settings.apply(stream, &values) {
                        warn!(%stream, error = %e, "could not merge saved values");
                    }
                }
                Some(SaveEvent::Failed { error }) => {
                    warn!(stream = %screen.stream(), %error, "save failed during shutdown, edits lost");
                }
                None => {
                    warn!(stream = %screen.stream(), "save still running at shutdown");
                }
            }
        }
    }

    fn close_details(&mut self) {
        let Some(screen) = self.details.take() else {
            return;
        };

        if screen.is_saving() {
            self.status_message = format!("Saving {}...", screen.stream().description());
            self.saving.push(screen);
        } else {
            self.status_message = "Select a stream to edit".to_string();
        }
    }

    fn handle_save_event(&mut self, screen: NotificationDetails, event: SaveEvent) {
        match event {
            SaveEvent::Saved { stream, values } => {
                if let Err(e) = self.settings.apply(stream, &values) {
                    warn!(%stream, error = %e, "could not merge saved values");
                }
                self.status_message = format!("✓ {} settings saved", stream.description());
            }
            SaveEvent::Failed { error } => {
                self.failed.push_back(screen);
                if self.error_dialog.is_none() {
                    self.error_dialog = Some(ErrorDialog::new(Some(error)));
                }
            }
        }
    }

    fn resolve_failure(&mut self, event: ErrorDialogEvent) {
        let Some(mut screen) = self.failed.pop_front() else {
            return;
        };

        match event {
            ErrorDialogEvent::Retry => {
                if screen.retry() {
                    self.status_message = format!("Retrying {}...", screen.stream().description());
                    self.saving.push(screen);
                }
            }
            ErrorDialogEvent::Cancel => {
                warn!(stream = %screen.stream(), "save cancelled, edits not stored");
                self.status_message =
                    format!("✗ {} settings not saved", screen.stream().description());
            }
        }

        if let Some(next) = self.failed.front() {
            let detail = match next.save_state() {
                crate::services::SaveState::Failed { error } => Some(error.clone()),
                _ => None,
            };
            self.error_dialog = Some(ErrorDialog::new(detail));
        }
    }
}

/// Setup terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableFocusChange
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run_tui(
    state: &mut AppState,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        // Render current state
        terminal.draw(|f| render(f, state))?;

        // Poll for events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => state.handle_key(key),
                Event::FocusGained => state.refresh(),
                // Resize re-renders on the next loop
                _ => {}
            }
        }

        // Pick up finished saves on the UI thread
        state.poll_saves();

        if state.should_quit {
            break;
        }
    }

    let timeout = Duration::from_millis(state.config.save.shutdown_timeout_ms);
    state.finish_pending_saves(timeout);

    Ok(())
}

/// Render the UI from current state
fn render(f: &mut Frame, state: &AppState) {
    // Fill entire screen with theme background color first
    let full_bg = Block::default().style(Style::default().bg(state.theme.background));
    f.render_widget(full_bg, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(8),    // Main content
            Constraint::Length(1), // Status line
        ])
        .split(f.area());

    render_title_bar(f, chunks[0], state);

    match &state.details {
        Some(details) => details.render(f, chunks[1], &state.theme),
        None => state.picker.render(f, chunks[1], &state.theme),
    }

    let status = Paragraph::new(state.status_message.as_str())
        .style(Style::default().fg(state.theme.text_muted));
    f.render_widget(status, chunks[2]);

    if let Some(dialog) = &state.error_dialog {
        dialog.render(f, f.area(), &state.theme);
    }
}

/// Render title bar with channel name and in-flight save count
fn render_title_bar(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![
        Span::styled(
            format!(" {APP_NAME} "),
            Style::default()
                .fg(state.theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("- {}", state.settings.header_title()),
            Style::default().fg(state.theme.text),
        ),
    ];
    if !state.saving.is_empty() {
        spans.push(Span::styled(
            format!("  (saving {})", state.saving.len()),
            Style::default().fg(state.theme.warning),
        ));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().bg(state.theme.background)),
    );
    f.render_widget(title, area);
}

/// Helper to create a centered rectangle
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
