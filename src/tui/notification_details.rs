//! Details screen for one notification stream.
//!
//! Shows the sections built for the stream, lets the user flip switches,
//! and hands pending edits to the coordinator when the screen is left.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use crate::models::{NotificationSettings, Row, RowKind, Section, StreamKind};
use crate::services::{
    build_sections, AnalyticsEvent, AnalyticsSink, EditCoordinator, PushCapability, SaveEvent,
    SaveState, SettingsUpdateService, SystemSettingsOpener,
};

use super::{Component, Theme};

/// Events emitted by the details screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsEvent {
    /// The user left the screen; a save may now be in flight
    Exit,
}

/// Collaborators shared by every details screen.
#[derive(Clone)]
pub struct DetailsServices {
    /// Persists edits
    pub update: Arc<dyn SettingsUpdateService>,
    /// Receives screen and save events
    pub analytics: Arc<dyn AnalyticsSink>,
    /// Answers whether push notifications are allowed
    pub push: Arc<dyn PushCapability>,
    /// Opens the system-level settings
    pub opener: Arc<dyn SystemSettingsOpener>,
}

impl std::fmt::Debug for DetailsServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetailsServices").finish_non_exhaustive()
    }
}

/// Settings screen for a single stream.
#[derive(Debug)]
pub struct NotificationDetails {
    coordinator: EditCoordinator,
    services: DetailsServices,
    sections: Vec<Section>,
    /// Index into the flattened rows of all sections
    cursor: usize,
    message: Option<String>,
    closed: bool,
}

impl NotificationDetails {
    /// Opens the screen for `stream` of `settings`.
    ///
    /// Fails when the settings have no stream of that kind.
    pub fn open(
        settings: NotificationSettings,
        stream: StreamKind,
        services: DetailsServices,
    ) -> Result<Self> {
        let coordinator = EditCoordinator::new(
            settings,
            stream,
            Arc::clone(&services.update),
            Arc::clone(&services.analytics),
        )?;

        services
            .analytics
            .track(AnalyticsEvent::SettingsDetailsOpened { stream });

        let mut screen = Self {
            coordinator,
            services,
            sections: Vec::new(),
            cursor: 0,
            message: None,
            closed: false,
        };
        screen.refresh();
        Ok(screen)
    }

    /// Rebuilds the sections, re-querying the push capability.
    pub fn refresh(&mut self) {
        let settings = self.coordinator.settings();
        self.sections = settings
            .stream(self.coordinator.stream())
            .map(|stream| build_sections(settings, stream, self.services.push.as_ref()))
            .unwrap_or_default();

        let count = self.row_count();
        if self.cursor >= count {
            self.cursor = count.saturating_sub(1);
        }
    }

    /// Stream being shown.
    #[must_use]
    pub const fn stream(&self) -> StreamKind {
        self.coordinator.stream()
    }

    /// Current sections.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Save progress of this visit.
    #[must_use]
    pub const fn save_state(&self) -> &SaveState {
        self.coordinator.state()
    }

    /// Returns true while a save is in flight.
    #[must_use]
    pub const fn is_saving(&self) -> bool {
        self.coordinator.is_saving()
    }

    /// Leaves the screen, dispatching a save when edits are pending.
    pub fn exit(&mut self) {
        self.closed = true;
        self.coordinator.save_if_needed();
    }

    /// Re-sends the edits after a failed save.
    pub fn retry(&mut self) -> bool {
        self.coordinator.retry()
    }

    /// Checks for a finished save.
    pub fn poll(&mut self) -> Option<SaveEvent> {
        self.coordinator.poll()
    }

    /// Blocks up to `timeout` for the in-flight save.
    pub fn wait(&mut self, timeout: Duration) -> Option<SaveEvent> {
        self.coordinator.wait(timeout)
    }

    fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }

    fn rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.sections.iter().flat_map(|s| s.rows.iter())
    }

    fn selected_row(&self) -> Option<&Row> {
        self.rows().nth(self.cursor)
    }

    /// What Space/Enter does on the selected row.
    fn selected_action(&self) -> &'static str {
        if self.selected_row().is_some_and(Row::is_toggle) {
            "Toggle"
        } else {
            "Open Settings"
        }
    }

    /// Value a toggle row currently displays.
    fn displayed_value(&self, row: &Row) -> Option<bool> {
        row.key()
            .map(|key| self.coordinator.value_for(key, row.value()))
    }

    fn activate_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };

        match &row.kind {
            RowKind::Toggle { key, value } => {
                let key = key.clone();
                let flipped = !self.coordinator.value_for(&key, Some(*value));
                self.coordinator.record_toggle(key, flipped);
                self.message = None;
            }
            RowKind::Info => {
                self.message = match self.services.opener.open_system_settings() {
                    Ok(()) => Some("Opened system settings. Press r to refresh.".to_string()),
                    Err(e) => {
                        warn!(error = %e, "could not open system settings");
                        Some(format!("Could not open system settings: {e}"))
                    }
                };
            }
        }
    }

    fn row_line<'a>(&self, row: &'a Row, selected: bool, theme: &Theme) -> Line<'a> {
        let marker = if selected { "▶ " } else { "  " };
        let label_style = if selected {
            Style::default()
                .fg(theme.accent)
                .bg(theme.surface)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };

        let switch = match self.displayed_value(row) {
            Some(true) => Span::styled("[● On ] ", Style::default().fg(theme.success)),
            Some(false) => Span::styled("[○ Off] ", Style::default().fg(theme.text_muted)),
            None => Span::styled("→ ", Style::default().fg(theme.primary)),
        };

        Line::from(vec![
            Span::styled(marker, label_style),
            switch,
            Span::styled(row.description.as_str(), label_style),
        ])
    }

    fn list_items(&self, width: usize, theme: &Theme) -> Vec<ListItem<'_>> {
        let mut items = Vec::new();
        let mut index = 0;

        for section in &self.sections {
            let last = section.rows.len().saturating_sub(1);
            for (position, row) in section.rows.iter().enumerate() {
                let mut lines = Vec::new();

                if position == 0 {
                    if let Some(header) = &section.header {
                        lines.push(Line::from(Span::styled(
                            header.to_uppercase(),
                            Style::default()
                                .fg(theme.primary)
                                .add_modifier(Modifier::BOLD),
                        )));
                    }
                }

                lines.push(self.row_line(row, index == self.cursor, theme));

                if position == last {
                    if let Some(footer) = &section.footer {
                        for text in wrap_words(footer, width.saturating_sub(4)) {
                            lines.push(Line::from(Span::styled(
                                format!("    {text}"),
                                Style::default().fg(theme.text_muted),
                            )));
                        }
                    }
                    lines.push(Line::from(""));
                }

                items.push(ListItem::new(Text::from(lines)));
                index += 1;
            }
        }

        items
    }
}

impl Component for NotificationDetails {
    type Event = DetailsEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.row_count() {
                    self.cursor += 1;
                }
                None
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                self.activate_selected();
                None
            }
            KeyCode::Char('r') => {
                self.refresh();
                None
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                self.exit();
                Some(DetailsEvent::Exit)
            }
            _ => None,
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Sections
                Constraint::Length(1), // Status
                Constraint::Length(1), // Help text
            ])
            .split(area);

        let block = Block::default()
            .title(format!(" {} ", self.stream().description()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.primary))
            .style(Style::default().bg(theme.background));
        let width = block.inner(chunks[0]).width as usize;

        if self.sections.is_empty() {
            let empty = Paragraph::new("No notification settings for this stream.")
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            f.render_widget(empty, chunks[0]);
        } else {
            let list = List::new(self.list_items(width, theme)).block(block);
            let mut list_state = ListState::default();
            list_state.select(Some(self.cursor));
            f.render_stateful_widget(list, chunks[0], &mut list_state);
        }

        let state = self.save_state();
        let state_color = match state {
            SaveState::Clean => theme.success,
            SaveState::Dirty | SaveState::Saving => theme.warning,
            SaveState::Failed { .. } => theme.error,
        };
        let mut status = vec![Span::styled(state.to_string(), Style::default().fg(state_color))];
        if let Some(message) = &self.message {
            status.push(Span::raw("  "));
            status.push(Span::styled(message.as_str(), Style::default().fg(theme.text)));
        }
        f.render_widget(Paragraph::new(Line::from(status)), chunks[1]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("↑↓", Style::default().fg(theme.accent)),
            Span::raw(" Navigate  "),
            Span::styled("Space", Style::default().fg(theme.accent)),
            Span::raw(format!(" {}  ", self.selected_action())),
            Span::styled("r", Style::default().fg(theme.accent)),
            Span::raw(" Refresh  "),
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::raw(" Save & Back"),
        ]))
        .style(Style::default().fg(theme.text_muted));
        f.render_widget(help, chunks[2]);
    }

    fn should_close(&self) -> bool {
        self.closed
    }
}

/// Greedy word wrap; a word longer than `width` gets its own line.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(10);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
