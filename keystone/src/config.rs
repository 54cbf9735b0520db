//! # Configuration Module - Session settings
//!
//! A [`SessionConfig`] is built once, validated, and handed to
//! [`TypingSession`](crate::TypingSession). Nothing in the core reads configuration from
//! anywhere else.
//!
//! ```rust
//! use std::time::Duration;
//! use keystone::{Mode, SessionConfig};
//!
//! let config = SessionConfig::timed(Duration::from_secs(60), 80).unwrap();
//! assert_eq!(config.mode, Mode::Timed);
//!
//! // A timed session needs a positive duration
//! assert!(SessionConfig::timed(Duration::ZERO, 80).is_err());
//! ```

use thiserror::Error;
use web_time::Duration;

use crate::MAX_MISTYPED;

/// The kind of typing test
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "title_case", ascii_case_insensitive)]
pub enum Mode {
    /// A single quote, timed with a stopwatch
    #[default]
    Sprint,
    /// An endless stream of quotes against a countdown
    Timed,
}

/// A configuration that can't start a session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Countdown duration must be larger than 0")]
    ZeroDuration,

    #[error("Tick interval must be larger than 0")]
    ZeroTickInterval,

    #[error("The mistyped limit must be at least 1")]
    ZeroMistypedLimit,

    #[error("The quote buffer must hold at least 1 quote")]
    ZeroQuoteBuffer,
}

/// How non-letter keys are matched against the text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputRules {
    /// If true, Enter types the line break between quotes. If false, Enter is ignored and Space
    /// types the line break instead.
    pub enter_matches_newline: bool,
}

impl Default for InputRules {
    fn default() -> Self {
        Self {
            enter_matches_newline: true,
        }
    }
}

/// Everything a [`TypingSession`](crate::TypingSession) needs to know up front
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub mode: Mode,
    /// Countdown length in [`Mode::Timed`]
    pub timed_duration: Duration,
    /// Initial wrap width of the text, updated through resizes
    pub render_width: usize,
    /// Cap on stacked wrong keystrokes
    pub max_mistyped: usize,
    /// Quotes fetched before a timed session starts, and capacity of the quote queue
    pub quote_buffer_size: usize,
    /// A timed session pulls a new quote once fewer lines than this are left
    pub scroll_threshold: usize,
    /// Time between two ticks of the session's timer
    pub tick_interval: Duration,
    /// Pause before the background producer retries a failed fetch
    pub retry_delay: Duration,
    pub input: InputRules,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Sprint,
            timed_duration: Duration::from_secs(5 * 60),
            render_width: 60,
            max_mistyped: MAX_MISTYPED,
            quote_buffer_size: 2,
            scroll_threshold: 3,
            tick_interval: Duration::from_secs(1),
            retry_delay: Duration::from_secs(2),
            input: InputRules::default(),
        }
    }
}

impl SessionConfig {
    /// A sprint session with default settings.
    pub fn sprint(render_width: usize) -> Self {
        Self {
            mode: Mode::Sprint,
            render_width,
            tick_interval: Duration::from_millis(100),
            ..Default::default()
        }
    }

    /// A timed session with default settings.
    pub fn timed(duration: Duration, render_width: usize) -> Result<Self, ConfigError> {
        Self {
            mode: Mode::Timed,
            timed_duration: duration,
            render_width,
            ..Default::default()
        }
        .validate()
    }

    /// Checks the preconditions of a session, returning the config unchanged if they hold.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.mode == Mode::Timed && self.timed_duration.is_zero() {
            return Err(ConfigError::ZeroDuration);
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.max_mistyped == 0 {
            return Err(ConfigError::ZeroMistypedLimit);
        }
        if self.quote_buffer_size == 0 {
            return Err(ConfigError::ZeroQuoteBuffer);
        }
        Ok(self)
    }

    pub fn with_input_rules(mut self, input: InputRules) -> Self {
        self.input = input;
        self
    }
}
