//! Stream picker: the first screen, listing the delivery streams of the
//! loaded settings.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::StreamKind;

use super::{Component, Theme};

/// Events emitted by the stream picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPickerEvent {
    /// Open the details screen for a stream
    Open(StreamKind),
    /// Leave the application
    Quit,
}

/// List of streams with a selection cursor.
#[derive(Debug, Clone)]
pub struct StreamPicker {
    title: String,
    streams: Vec<StreamKind>,
    selected: usize,
}

impl StreamPicker {
    /// Creates a picker over `streams`, titled with the channel name.
    pub fn new(title: impl Into<String>, streams: Vec<StreamKind>) -> Self {
        Self {
            title: title.into(),
            streams,
            selected: 0,
        }
    }

    /// Stream under the cursor.
    #[must_use]
    pub fn selected(&self) -> Option<StreamKind> {
        self.streams.get(self.selected).copied()
    }

    fn select_previous(&mut self) {
        if self.streams.is_empty() {
            return;
        }
        self.selected = if self.selected == 0 {
            self.streams.len() - 1
        } else {
            self.selected - 1
        };
    }

    fn select_next(&mut self) {
        if !self.streams.is_empty() {
            self.selected = (self.selected + 1) % self.streams.len();
        }
    }
}

impl Component for StreamPicker {
    type Event = StreamPickerEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            KeyCode::Enter => self.selected().map(StreamPickerEvent::Open),
            KeyCode::Esc | KeyCode::Char('q') => Some(StreamPickerEvent::Quit),
            _ => None,
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Stream list
                Constraint::Length(1), // Help text
            ])
            .split(area);

        let items: Vec<ListItem> = self
            .streams
            .iter()
            .map(|kind| ListItem::new(Line::from(kind.description())))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" {} ", self.title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.primary))
                    .style(Style::default().bg(theme.background)),
            )
            .style(Style::default().fg(theme.text))
            .highlight_style(
                Style::default()
                    .bg(theme.surface)
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));
        f.render_stateful_widget(list, chunks[0], &mut list_state);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("↑↓", Style::default().fg(theme.accent)),
            Span::raw(" Navigate  "),
            Span::styled("Enter", Style::default().fg(theme.accent)),
            Span::raw(" Open  "),
            Span::styled("q/Esc", Style::default().fg(theme.accent)),
            Span::raw(" Quit"),
        ]))
        .style(Style::default().fg(theme.text_muted));
        f.render_widget(help, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn picker() -> StreamPicker {
        StreamPicker::new("Other Sites", StreamKind::all().to_vec())
    }

    #[test]
    fn test_enter_opens_selected_stream() {
        let mut picker = picker();
        assert_eq!(
            picker.handle_input(key(KeyCode::Enter)),
            Some(StreamPickerEvent::Open(StreamKind::Timeline))
        );

        picker.handle_input(key(KeyCode::Down));
        picker.handle_input(key(KeyCode::Down));
        assert_eq!(
            picker.handle_input(key(KeyCode::Enter)),
            Some(StreamPickerEvent::Open(StreamKind::Device))
        );
    }

    #[test]
    fn test_selection_wraps() {
        let mut picker = picker();
        picker.handle_input(key(KeyCode::Up));
        assert_eq!(picker.selected(), Some(StreamKind::Device));
        picker.handle_input(key(KeyCode::Down));
        assert_eq!(picker.selected(), Some(StreamKind::Timeline));
    }

    #[test]
    fn test_quit_keys() {
        let mut picker = picker();
        assert_eq!(picker.handle_input(key(KeyCode::Esc)), Some(StreamPickerEvent::Quit));
        assert_eq!(picker.handle_input(key(KeyCode::Char('q'))), Some(StreamPickerEvent::Quit));
    }

    #[test]
    fn test_empty_picker_never_opens() {
        let mut picker = StreamPicker::new("Unnamed Site", Vec::new());
        picker.handle_input(key(KeyCode::Down));
        assert_eq!(picker.handle_input(key(KeyCode::Enter)), None);
    }
}
