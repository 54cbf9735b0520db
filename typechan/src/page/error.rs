use std::fmt::Display;

use crossterm::event::{Event, KeyCode};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, Padding, Paragraph, Wrap},
};

use crate::utils::{KeyEventHelper, RED, center};

use super::Message;

/// Page: Error
///
/// Displays an error
///
pub struct Error(String);

impl<E: Display> From<E> for Error {
    fn from(value: E) -> Self {
        Self(value.to_string())
    }
}

/// Rendering logic
impl Error {
    pub fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        let center = center(area, Constraint::Percentage(80), Constraint::Percentage(80));

        let mut lines = vec![
            Line::styled("[Error]", Style::new().bold().fg(RED)).centered(),
        ];

        for line in self.0.split('\n') {
            lines.push(Line::from(line).centered());
        }

        let text = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::new().padding(Padding::new(0, 0, center.height / 2, 0)));

        frame.render_widget(text, center);
    }

    pub fn render_top(&self) -> Option<Line<'_>> {
        Some(Line::from("<Enter> to try again"))
    }

    pub fn handle_events(&self, event: &Event) -> Option<Message> {
        if let Event::Key(key) = event
            && key.is_press()
        {
            return match key.code {
                KeyCode::Enter => Some(Message::Restart),
                KeyCode::Esc => Some(Message::Quit),
                _ if key.is_ctrl_press_char('c') => Some(Message::Quit),
                _ => None,
            };
        };

        None
    }
}
