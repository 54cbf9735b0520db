use crossterm::event::Event;
use ratatui::{Frame, layout::Rect, text::Line};

pub mod error;
pub mod results;
pub mod typing;

pub use error::Error;
pub use results::Results;
pub use typing::Typing;

use crate::app::Message;

macro_rules! make_page_enum {
    ($($t:tt),*) => {
        pub enum Page {
            $(
                $t(Box<$t>),
            )*
        }

        $(
            impl From<$t> for Page {
                fn from(value: $t) -> Page {
                    Page::$t(Box::new(value))
                }
            }
        )*
    };
}

make_page_enum!(Typing, Results, Error);

impl Page {
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Self::Typing(page) => page.render(frame, area),
            Self::Results(page) => page.render(frame, area),
            Self::Error(page) => page.render(frame, area),
        }
    }

    pub fn render_top(&self) -> Option<Line<'_>> {
        match self {
            Self::Typing(page) => page.render_top(),
            Self::Results(page) => page.render_top(),
            Self::Error(page) => page.render_top(),
        }
    }

    pub fn handle_events(&mut self, event: &Event) -> Option<Message> {
        match self {
            Self::Typing(page) => page.handle_events(event),
            Self::Results(page) => page.handle_events(event),
            Self::Error(page) => page.handle_events(event),
        }
    }

    pub fn tick(&mut self) -> Option<Message> {
        match self {
            Self::Typing(page) => page.tick(),
            Self::Results(_) => None,
            Self::Error(_) => None,
        }
    }
}
