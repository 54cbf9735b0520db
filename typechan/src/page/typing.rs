use crossterm::event::Event;
use keystone::{Flow, SessionSnapshot, TypingSession, state::ENTER_GLYPH};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, LineGauge, Padding, Paragraph},
};

use crate::{
    app::Message,
    page,
    utils::{GREEN, GREY, KeyEventHelper, RED, ROUNDED_BLOCK, SIDEBAR_WIDTH, text_width},
};

/// Lines shown at once while the text scrolls
const SCROLL_HEIGHT: usize = 3;
/// Minimum height of the text area when it doesn't scroll
const MIN_TEXT_HEIGHT: usize = 5;

/// Page: Typing
///
/// Runs a single session.
///
#[derive(Debug)]
pub struct Typing {
    session: TypingSession,
}

impl From<TypingSession> for Typing {
    fn from(session: TypingSession) -> Self {
        Self { session }
    }
}

impl Typing {
    fn follow(&self, flow: Flow) -> Option<Message> {
        match flow {
            Flow::Continue => None,
            Flow::Finished => self
                .session
                .statistics()
                .map(|statistics| Message::Show(page::Results::from(*statistics).into())),
            Flow::Quit => Some(Message::Quit),
        }
    }

    pub fn tick(&mut self) -> Option<Message> {
        let flow = self.session.handle_tick();
        self.follow(flow)
    }

    pub fn handle_events(&mut self, event: &Event) -> Option<Message> {
        match event {
            Event::Key(key) => {
                let flow = self.session.handle_key(key.to_session_key()?);
                self.follow(flow)
            }
            Event::Resize(columns, _) => {
                self.session.handle_resize(text_width(*columns));
                None
            }
            _ => None,
        }
    }
}

/// Styles the visible text: typed letters are grey, the cursor is underlined, and the mistyped
/// run starting at the cursor is red.
fn text_lines(snapshot: &SessionSnapshot) -> Vec<Line<'static>> {
    let (first, height) = if snapshot.scroll {
        (snapshot.line_index, SCROLL_HEIGHT)
    } else {
        (0, snapshot.lines.len())
    };
    let cursor = (snapshot.line_index, snapshot.letter_index);
    let mut errors_left = 0;
    let mut lines = Vec::with_capacity(height);

    for (line_index, line) in snapshot.lines.iter().enumerate().skip(first).take(height) {
        let mut spans = Vec::with_capacity(line.len());
        for (letter_index, character) in line.chars().enumerate() {
            let glyph = if character == '\n' {
                ENTER_GLYPH
            } else {
                character
            };
            let position = (line_index, letter_index);

            let mut style = Style::new();
            if position < cursor {
                style = style.fg(GREY);
            }
            if position == cursor {
                style = style.add_modifier(Modifier::UNDERLINED);
                errors_left = snapshot.mistyped;
            }
            if errors_left > 0 {
                style = style.fg(RED);
                errors_left -= 1;
            }

            spans.push(Span::styled(glyph.to_string(), style));
        }
        lines.push(Line::from(spans));
    }

    lines
}

fn sidebar(snapshot: &SessionSnapshot) -> Text<'static> {
    if snapshot.started {
        Text::from(vec![Line::from("Time:"), Line::from(snapshot.time.clone())])
    } else {
        Text::from("Start typing!")
    }
}

// Rendering logic
impl Typing {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let snapshot = self.session.snapshot();
        let lines = text_lines(&snapshot);
        let text_height = if snapshot.scroll {
            SCROLL_HEIGHT
        } else {
            lines.len().max(MIN_TEXT_HEIGHT)
        };

        // Text area sized to the wrap width plus its border and padding
        let text_columns = self.session.text().width() as u16 + 4;
        let [app] = Layout::horizontal([Constraint::Length(text_columns + SIDEBAR_WIDTH)])
            .flex(Flex::Center)
            .areas(area);
        let [progress, body, word, _] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(text_height as u16 + 2),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(app);
        let [text_area, sidebar_area] =
            Layout::horizontal([Constraint::Length(text_columns), Constraint::Length(SIDEBAR_WIDTH)])
                .areas(body);

        let gauge = LineGauge::default()
            .filled_style(Style::new().white())
            .unfilled_style(Style::new().fg(GREY))
            .ratio(snapshot.progress.clamp(0.0, 1.0));
        frame.render_widget(gauge, progress);

        let border = if snapshot.mistyped > 0 { RED } else { GREEN };
        let block = ROUNDED_BLOCK
            .border_style(Style::new().fg(border))
            .padding(Padding::horizontal(1));
        let inner = block.inner(text_area);
        frame.render_widget(Paragraph::new(lines).block(block), text_area);

        let first = if snapshot.scroll { snapshot.line_index } else { 0 };
        let row = snapshot.line_index.saturating_sub(first);
        if row < text_height && snapshot.line_index < snapshot.lines.len() {
            frame.set_cursor_position((
                inner.x + snapshot.letter_index as u16,
                inner.y + row as u16,
            ));
        }

        frame.render_widget(
            Paragraph::new(sidebar(&snapshot)).block(Block::new().padding(Padding::uniform(1))),
            sidebar_area,
        );

        frame.render_widget(
            Paragraph::new(snapshot.word_input.to_string()).bold(),
            word,
        );
    }

    pub fn render_top(&self) -> Option<Line<'_>> {
        Some(Line::raw(format!("{} | <Esc> to quit", self.session.mode())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use keystone::{Key, Quote, SessionConfig};

    fn typing(text: &str) -> Typing {
        TypingSession::from_quotes(SessionConfig::sprint(80), vec![Quote::new(text)])
            .unwrap()
            .into()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_text_styles() {
        let mut page = typing("abc");
        page.session.handle_key(Key::Letter('a'));
        page.session.handle_key(Key::Letter('x'));

        let lines = text_lines(&page.session.snapshot());
        let spans = &lines[0].spans;

        assert_eq!(spans[0].style.fg, Some(GREY));
        assert!(spans[1].style.add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(spans[1].style.fg, Some(RED));
        assert_eq!(spans[2].style, Style::new());
    }

    #[test]
    fn test_mistyped_run_continues_on_next_line() {
        let config = SessionConfig::sprint(3);
        let mut page: Typing = TypingSession::from_quotes(config, vec![Quote::new("ab cd")])
            .unwrap()
            .into();
        for character in "abxyz".chars() {
            page.session.handle_key(Key::from_char(character));
        }

        let lines = text_lines(&page.session.snapshot());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[2].style.fg, Some(RED));
        assert_eq!(lines[1].spans[0].style.fg, Some(RED));
        assert_eq!(lines[1].spans[1].style.fg, Some(RED));
    }

    #[test]
    fn test_line_break_shows_glyph() {
        let quotes = vec![Quote::new("a"), Quote::new("b")];
        let page: Typing = TypingSession::from_quotes(SessionConfig::sprint(80), quotes)
            .unwrap()
            .into();

        let lines = text_lines(&page.session.snapshot());
        assert_eq!(lines[0].to_string(), format!("a{ENTER_GLYPH}"));
    }

    #[test]
    fn test_sidebar_shows_time_once_started() {
        let mut page = typing("abc");
        assert_eq!(sidebar(&page.session.snapshot()).to_string(), "Start typing!");

        page.handle_events(&key(KeyCode::Char('a')));
        assert!(sidebar(&page.session.snapshot()).to_string().starts_with("Time:"));
    }

    #[test]
    fn test_finishing_shows_results() {
        let mut page = typing("ab");
        assert!(page.handle_events(&key(KeyCode::Char('a'))).is_none());

        let message = page.handle_events(&key(KeyCode::Char('b')));
        assert!(matches!(message, Some(Message::Show(page::Page::Results(_)))));
    }

    #[test]
    fn test_top_line_names_mode() {
        let page = typing("ab");
        assert_eq!(page.render_top().unwrap().to_string(), "Sprint | <Esc> to quit");
    }

    #[test]
    fn test_escape_quits() {
        let mut page = typing("ab");
        assert!(matches!(
            page.handle_events(&key(KeyCode::Esc)),
            Some(Message::Quit)
        ));
    }

    #[test]
    fn test_resize_rewraps_text() {
        let mut page = typing("one two three four five six seven eight nine ten");
        page.handle_events(&Event::Resize(50, 20));

        let snapshot = page.session.snapshot();
        assert!(snapshot.lines.iter().all(|line| line.trim_end().len() <= text_width(50)));
        assert!(snapshot.lines.len() > 1);
    }
}
