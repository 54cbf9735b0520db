//! # Session Module - The typing-session controller
//!
//! A [`TypingSession`] ties the pieces together: it feeds keys into the [`TypingState`] machine,
//! keeps a timed session stocked with quotes from its [`QuoteSupplier`], drives the [`Timer`] from
//! tick events and computes the [`SessionStatistics`] once the session ends.
//!
//! ## Session Lifecycle
//!
//! A session is [`Phase::NotStarted`] until the first key reaches the state machine, which starts
//! the timer. It is [`Phase::Running`] until its text runs out or, in [`Mode::Timed`], its
//! countdown does. Once [`Phase::Finished`], further keys are ignored and the statistics are
//! available.
//!
//! [`Key::Interrupt`] aborts a session in any phase.
//!
//! ## Usage Example
//!
//! ```rust
//! use keystone::{Flow, Key, Quote, SessionConfig, TypingSession};
//!
//! let config = SessionConfig::sprint(80);
//! let mut session = TypingSession::from_quotes(config, vec![Quote::new("hi")]).unwrap();
//!
//! assert_eq!(session.handle_key(Key::Letter('h')), Flow::Continue);
//! assert!(session.snapshot().started);
//!
//! assert_eq!(session.handle_key(Key::Letter('i')), Flow::Finished);
//! assert_eq!(session.statistics().unwrap().accuracy, 1.0);
//! ```

use std::sync::Arc;

use derive_more::From;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{ConfigError, Mode, SessionConfig};
use crate::quote::{FetchError, Quote, QuoteSource};
use crate::state::{KeyTally, Keystroke, TypingState, WordInput};
use crate::statistics::SessionStatistics;
use crate::supplier::QuoteSupplier;
use crate::text_buffer::TextBuffer;
use crate::timer::{TickOutcome, Timer};

/// A key event, as delivered by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Letter(char),
    Space,
    Backspace,
    Enter,
    /// Cursor movement and tab keys. Accepted, but never alter a session
    Movement,
    /// Aborts the session
    Interrupt,
}

impl Key {
    /// Maps a typed character to its key.
    pub const fn from_char(character: char) -> Self {
        match character {
            ' ' => Self::Space,
            '\n' => Self::Enter,
            other => Self::Letter(other),
        }
    }
}

/// What the caller should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The session has ended and its statistics are ready
    Finished,
    /// The user aborted the session
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Finished,
}

#[derive(Debug, From, Error)]
pub enum SessionError {
    #[error("Failed to fetch quotes: {0}")]
    Fetch(FetchError),

    #[error("Invalid session configuration: {0}")]
    Config(ConfigError),

    #[error("A session needs at least one character to type")]
    NoText,
}

/// Everything needed to draw a session
#[derive(Debug, Clone)]
pub struct SessionSnapshot<'a> {
    pub lines: &'a [String],
    pub line_index: usize,
    pub letter_index: usize,
    pub mistyped: usize,
    pub word_input: &'a str,
    /// Share of the text typed in a sprint, share of the countdown used in a timed session
    pub progress: f64,
    pub time: String,
    pub started: bool,
    pub scroll: bool,
    pub mode: Mode,
}

/// A single typing test
#[derive(Debug)]
pub struct TypingSession {
    config: SessionConfig,
    text: TextBuffer,
    state: TypingState,
    word: WordInput,
    tally: KeyTally,
    timer: Timer,
    phase: Phase,
    supplier: Option<QuoteSupplier>,
    statistics: Option<SessionStatistics>,
}

impl TypingSession {
    /// Creates a session with quotes from `source`.
    ///
    /// A sprint fetches a single quote. A timed session fetches `quote_buffer_size` quotes up
    /// front, then keeps fetching in the background until it finishes.
    pub fn new(config: SessionConfig, source: Arc<dyn QuoteSource>) -> Result<Self, SessionError> {
        let config = config.validate()?;
        let mut supplier = QuoteSupplier::new(source, config.retry_delay);

        let prefill = match config.mode {
            Mode::Sprint => 1,
            Mode::Timed => config.quote_buffer_size,
        };
        let quotes = supplier.fill(prefill)?;
        debug!(count = quotes.len(), "pre-filled quotes");

        let mut session = Self::build(config, quotes)?;
        if session.config.mode == Mode::Timed {
            supplier.start(session.config.quote_buffer_size);
            session.supplier = Some(supplier);
        }

        Ok(session)
    }

    /// Creates a session over a fixed set of quotes, without a supplier.
    pub fn from_quotes(config: SessionConfig, quotes: Vec<Quote>) -> Result<Self, SessionError> {
        Self::build(config.validate()?, quotes)
    }

    fn build(config: SessionConfig, quotes: Vec<Quote>) -> Result<Self, SessionError> {
        let scroll = config.mode == Mode::Timed;
        let mut text = TextBuffer::new(config.render_width, config.max_mistyped, scroll);
        for quote in &quotes {
            text.append(quote);
        }

        if text.total_length() == 0 {
            return Err(SessionError::NoText);
        }

        let timer = match config.mode {
            Mode::Sprint => Timer::stopwatch(),
            Mode::Timed => Timer::countdown(config.timed_duration, config.tick_interval),
        };

        info!(mode = %config.mode, length = text.total_length(), "session ready");

        Ok(Self {
            config,
            text,
            state: TypingState::default(),
            word: WordInput::default(),
            tally: KeyTally::default(),
            timer,
            phase: Phase::NotStarted,
            supplier: None,
            statistics: None,
        })
    }

    /// Handles a single key event.
    pub fn handle_key(&mut self, key: Key) -> Flow {
        let keystroke = match key {
            Key::Interrupt => {
                self.interrupt();
                return Flow::Quit;
            }
            Key::Movement => return self.flow(),
            _ if self.phase == Phase::Finished => return Flow::Finished,
            Key::Enter if !self.config.input.enter_matches_newline => return Flow::Continue,
            Key::Letter(character) => Keystroke::Letter(character),
            Key::Space => Keystroke::Space,
            Key::Backspace => Keystroke::Backspace,
            Key::Enter => Keystroke::Enter,
        };

        if self.text.current_letter().is_none() {
            return self.flow();
        }

        if self.phase == Phase::NotStarted {
            self.phase = Phase::Running;
            self.timer.start();
            info!(mode = %self.config.mode, "session started");
        }

        self.state = self.state.handle(
            keystroke,
            &mut self.text,
            &mut self.word,
            &mut self.tally,
            &self.config.input,
        );

        if self.config.mode == Mode::Timed && self.text.lines().len() < self.config.scroll_threshold
        {
            self.top_up();
        }

        if self.text.is_complete() {
            self.finish();
        }

        self.flow()
    }

    /// Advances the timer by one tick interval.
    pub fn handle_tick(&mut self) -> Flow {
        if self.phase != Phase::Running {
            return self.flow();
        }

        if self.timer.tick() == TickOutcome::TimedOut {
            debug!("countdown reached zero");
            self.finish();
        }

        self.flow()
    }

    /// Re-wraps the text at `width`.
    pub fn handle_resize(&mut self, width: usize) {
        self.text.reflow(width);
    }

    /// Pulls one quote from the supplier, blocking until it arrives.
    fn top_up(&mut self) {
        let Some(quote) = self.supplier.as_ref().and_then(QuoteSupplier::next) else {
            return;
        };

        debug!(
            length = quote.len(),
            queued = self.supplier.as_ref().map_or(0, QuoteSupplier::queued),
            "pulled quote from supplier"
        );
        self.text.append(&quote);
    }

    fn finish(&mut self) {
        if self.statistics.is_some() {
            return;
        }

        self.phase = Phase::Finished;
        if let Some(supplier) = &mut self.supplier {
            supplier.stop();
        }
        self.timer.stop();

        let elapsed = match self.config.mode {
            Mode::Sprint => self.timer.elapsed(),
            Mode::Timed => self.config.timed_duration,
        };
        let statistics = SessionStatistics::new(self.tally, elapsed);

        info!(
            gross_wpm = statistics.gross_wpm,
            accuracy = statistics.accuracy,
            elapsed = ?elapsed,
            "session finished"
        );
        self.statistics = Some(statistics);
    }

    fn interrupt(&mut self) {
        if let Some(supplier) = &mut self.supplier {
            supplier.stop();
        }
        self.timer.stop();
        debug!(phase = ?self.phase, "session interrupted");
    }

    const fn flow(&self) -> Flow {
        match self.phase {
            Phase::Finished => Flow::Finished,
            Phase::NotStarted | Phase::Running => Flow::Continue,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub const fn statistics(&self) -> Option<&SessionStatistics> {
        self.statistics.as_ref()
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn state(&self) -> TypingState {
        self.state
    }

    pub const fn mode(&self) -> Mode {
        self.config.mode
    }

    pub const fn text(&self) -> &TextBuffer {
        &self.text
    }

    pub const fn tally(&self) -> KeyTally {
        self.tally
    }

    /// Captures the current state for rendering.
    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        let progress = match self.config.mode {
            Mode::Sprint => self.text.progress(),
            Mode::Timed => self.timer.fraction_elapsed(),
        };

        SessionSnapshot {
            lines: self.text.lines(),
            line_index: self.text.line_index(),
            letter_index: self.text.letter_index(),
            mistyped: self.text.mistyped(),
            word_input: self.word.as_str(),
            progress,
            time: self.timer.display(),
            started: self.phase != Phase::NotStarted,
            scroll: self.text.is_scrolling(),
            mode: self.config.mode,
        }
    }
}
