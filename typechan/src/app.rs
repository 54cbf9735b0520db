use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::cursor::SetCursorStyle;
use crossterm::event::{self, Event};
use crossterm::execute;
use derive_more::From;
use keystone::{Mode, QuoteSource, SessionError, TypingSession};
use ratatui::{Frame, style::Stylize, text::ToLine, widgets::Padding};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::page;
use crate::utils::{ROUNDED_BLOCK, text_width};

/// An app message
pub enum Message {
    /// Show a specific page
    Show(page::Page),
    /// Start a new session with the same settings
    Restart,
    /// Quit the application
    Quit,
}

#[derive(Debug, From, Error)]
pub enum AppError {
    #[error("Terminal error: {0}")]
    Io(std::io::Error),

    #[error("Failed to start session: {0}")]
    Session(SessionError),
}

/// What kind of session the app runs
#[derive(Debug, Clone, Copy)]
pub struct Launch {
    pub mode: Mode,
    pub countdown: Duration,
}

/// The app itself
pub struct App {
    page: page::Page,
    config: Config,
    source: Arc<dyn QuoteSource>,
    launch: Launch,
    columns: u16,
}

impl App {
    /// Creates a new `App`, fetching the quotes for its first session.
    pub fn new(
        config: Config,
        source: Arc<dyn QuoteSource>,
        launch: Launch,
    ) -> Result<Self, AppError> {
        let (columns, _) = crossterm::terminal::size()?;
        let session = new_session(&config, &source, launch, columns)?;

        Ok(Self {
            page: page::Typing::from(session).into(),
            config,
            source,
            launch,
            columns,
        })
    }

    /// Runs the app
    pub fn run(&mut self) -> Result<(), AppError> {
        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal);
        ratatui::restore();
        result
    }

    fn event_loop(&mut self, terminal: &mut ratatui::DefaultTerminal) -> Result<(), AppError> {
        execute!(std::io::stdout(), SetCursorStyle::SteadyUnderScore)?;

        let tick_rate = self.config.tick_rate();
        let mut next_tick = Instant::now() + tick_rate;

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            let timeout = next_tick.saturating_duration_since(Instant::now());
            let event = event::poll(timeout)?.then(event::read).transpose()?;

            if let Some(message) = event.and_then(|event| self.handle_event(&event))
                && self.dispatch(message)
            {
                break;
            }

            if Instant::now() >= next_tick {
                next_tick += tick_rate;
                if let Some(message) = self.page.tick()
                    && self.dispatch(message)
                {
                    break;
                }
            }
        }

        info!("quitting");
        Ok(())
    }

    /// Applies a message. Returns true if the app should quit.
    fn dispatch(&mut self, message: Message) -> bool {
        match message {
            Message::Show(page) => self.page = page,
            Message::Restart => self.restart(),
            Message::Quit => return true,
        }
        false
    }

    fn restart(&mut self) {
        debug!(mode = %self.launch.mode, "restarting session");
        self.page = match new_session(&self.config, &self.source, self.launch, self.columns) {
            Ok(session) => page::Typing::from(session).into(),
            Err(error) => {
                error!(%error, "failed to restart session");
                page::Error::from(error).into()
            }
        };
    }

    /// Draws the next frame
    fn draw(&self, frame: &mut Frame) {
        let mut block = ROUNDED_BLOCK
            .padding(Padding::new(1, 1, 0, 0))
            .title_top("TYPECHAN".to_line().bold().centered());

        if let Some(top_msg) = self.page.render_top() {
            block = block.title_top(top_msg);
        }

        let area = frame.area();
        let content = block.inner(area);

        frame.render_widget(block, area);

        self.page.render(frame, content);
    }

    /// Global event handler
    fn handle_event(&mut self, event: &Event) -> Option<Message> {
        if let Event::Resize(columns, _) = event {
            self.columns = *columns;
        }
        self.page.handle_events(event)
    }
}

fn new_session(
    config: &Config,
    source: &Arc<dyn QuoteSource>,
    launch: Launch,
    columns: u16,
) -> Result<TypingSession, SessionError> {
    let session_config = config.session_config(launch.mode, launch.countdown, text_width(columns));
    TypingSession::new(session_config, Arc::clone(source))
}
