//! Cancel/Retry dialog shown when saving notification settings fails.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::{centered_rect, Component, Theme};

/// Dialog title.
pub const ERROR_TITLE: &str = "Oops!";

/// Dialog body.
pub const ERROR_MESSAGE: &str =
    "There has been an unexpected error while updating your notification settings";

/// Events emitted by the error dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDialogEvent {
    /// Dismiss without saving again
    Cancel,
    /// Send the same edits again
    Retry,
}

/// Button that currently has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDialogButton {
    /// Cancel button
    Cancel,
    /// Retry button
    Retry,
}

impl ErrorDialogButton {
    const fn toggled(self) -> Self {
        match self {
            Self::Cancel => Self::Retry,
            Self::Retry => Self::Cancel,
        }
    }

    const fn event(self) -> ErrorDialogEvent {
        match self {
            Self::Cancel => ErrorDialogEvent::Cancel,
            Self::Retry => ErrorDialogEvent::Retry,
        }
    }
}

/// Modal error dialog with Cancel and Retry buttons.
#[derive(Debug, Clone)]
pub struct ErrorDialog {
    focused: ErrorDialogButton,
    /// Service error, shown dimmed under the message
    detail: Option<String>,
    closed: bool,
}

impl ErrorDialog {
    /// Creates a dialog with Retry focused.
    #[must_use]
    pub fn new(detail: Option<String>) -> Self {
        Self {
            focused: ErrorDialogButton::Retry,
            detail,
            closed: false,
        }
    }

    /// Currently focused button.
    #[must_use]
    pub const fn focused(&self) -> ErrorDialogButton {
        self.focused
    }

    fn finish(&mut self, event: ErrorDialogEvent) -> Option<ErrorDialogEvent> {
        self.closed = true;
        Some(event)
    }

    fn button_span<'a>(&self, label: &'a str, button: ErrorDialogButton, theme: &Theme) -> Span<'a> {
        let style = if self.focused == button {
            Style::default()
                .fg(theme.background)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        Span::styled(format!("  {label}  "), style)
    }
}

impl Component for ErrorDialog {
    type Event = ErrorDialogEvent;

    fn handle_input(&mut self, key: KeyEvent) -> Option<Self::Event> {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.focused = self.focused.toggled();
                None
            }
            KeyCode::Enter => self.finish(self.focused.event()),
            KeyCode::Esc => self.finish(ErrorDialogEvent::Cancel),
            KeyCode::Char('r' | 'R') => self.finish(ErrorDialogEvent::Retry),
            _ => None,
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let dialog_area = centered_rect(60, 40, area);

        f.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(format!(" {ERROR_TITLE} "))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error))
            .style(Style::default().bg(theme.background));
        let inner = block.inner(dialog_area);
        f.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Message
                Constraint::Length(1), // Buttons
                Constraint::Length(1), // Help text
            ])
            .split(inner);

        let mut lines = vec![Line::from(Span::styled(
            ERROR_MESSAGE,
            Style::default().fg(theme.text),
        ))];
        if let Some(detail) = &self.detail {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                detail.as_str(),
                Style::default().fg(theme.text_muted),
            )));
        }
        let message = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(message, chunks[0]);

        let buttons = Paragraph::new(Line::from(vec![
            self.button_span("Cancel", ErrorDialogButton::Cancel, theme),
            Span::raw("   "),
            self.button_span("Retry", ErrorDialogButton::Retry, theme),
        ]))
        .alignment(Alignment::Center);
        f.render_widget(buttons, chunks[1]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("←/→", Style::default().fg(theme.accent)),
            Span::raw(" Choose  "),
            Span::styled("Enter", Style::default().fg(theme.accent)),
            Span::raw(" Select  "),
            Span::styled("Esc", Style::default().fg(theme.accent)),
            Span::raw(" Cancel"),
        ]))
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.text_muted));
        f.render_widget(help, chunks[2]);
    }

    fn should_close(&self) -> bool {
        self.closed
    }
}
