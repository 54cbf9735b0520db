use crossterm::event::{Event, KeyCode};
use keystone::SessionStatistics;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Style, Stylize},
    text::{Line, ToSpan},
    widgets::{Borders, Paragraph},
};

use crate::{
    app::Message,
    utils::{GREY, KeyEventHelper, ROUNDED_BLOCK, center},
};

/// Page: Results
///
/// Shows the statistics of a finished session.
///
#[derive(Debug, Clone)]
pub struct Results {
    statistics: SessionStatistics,
}

impl From<SessionStatistics> for Results {
    fn from(statistics: SessionStatistics) -> Self {
        Self { statistics }
    }
}

impl Results {
    fn summary(&self) -> Vec<Line<'static>> {
        let statistics = &self.statistics;
        let centis = (statistics.elapsed.as_millis() + 5) / 10;

        vec![
            Line::from(format!("Gross WPM    : {:.2}", statistics.gross_wpm)),
            Line::from(format!("Accuracy     : {:.2}%", statistics.accuracy * 100.0)),
            Line::from(format!("Adjusted WPM : {:.2}", statistics.adjusted_wpm)),
            Line::default(),
            Line::from(format!(
                "Time         : {}.{:02}s",
                centis / 100,
                centis % 100
            )),
            Line::from(format!("CPM          : {:.2}", statistics.cpm)),
            Line::default(),
            Line::from(format!(
                "Total keys   : {}",
                statistics.total_keys_pressed
            )),
            Line::from(format!(
                "Correct keys : {}",
                statistics.correct_keys_pressed
            )),
        ]
    }
}

// Rendering logic
impl Results {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let area = center(area, Constraint::Length(40), Constraint::Length(14));

        let mut lines = self.summary();
        lines.push(Line::default());
        lines.push(Line::styled("<Enter> to restart", Style::new().fg(GREY)));
        lines.push(Line::styled("<Esc> to quit", Style::new().fg(GREY)));

        let summary = Paragraph::new(lines).block(
            ROUNDED_BLOCK
                .borders(Borders::TOP)
                .title("Results".to_span().bold()),
        );

        frame.render_widget(summary, area);
    }

    pub fn render_top(&self) -> Option<Line<'_>> {
        Some(Line::raw("<Enter> to restart"))
    }

    pub fn handle_events(&self, event: &Event) -> Option<Message> {
        let Event::Key(key) = event else {
            return None;
        };
        if !key.is_press() {
            return None;
        }

        match key.code {
            KeyCode::Enter => Some(Message::Restart),
            KeyCode::Esc => Some(Message::Quit),
            _ if key.is_ctrl_press_char('c') => Some(Message::Quit),
            _ => None,
        }
    }
}
