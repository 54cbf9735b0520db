//! # Keystone - The typing-session core
//!
//! Keystone drives a single terminal typing test: it owns the wrapped text and the cursor,
//! interprets keystrokes through a two-state (correct/mistake) machine, keeps timed sessions fed
//! with quotes from a background producer, and computes the final statistics.
//!
//! Rendering, input capture and transport are left to the caller. The whole event surface of a
//! session is [`TypingSession::handle_key`], [`TypingSession::handle_tick`] and
//! [`TypingSession::handle_resize`].
//!
//! ```rust
//! use keystone::{Key, Quote, SessionConfig, TypingSession};
//!
//! let config = SessionConfig::sprint(80);
//! let mut session = TypingSession::from_quotes(config, vec![Quote::new("cat dog")]).unwrap();
//!
//! for character in "cat dog".chars() {
//!     session.handle_key(Key::from_char(character));
//! }
//!
//! assert!(session.is_finished());
//! assert_eq!(session.statistics().unwrap().correct_keys_pressed, 7);
//! ```

pub mod config;
pub mod quote;
pub mod session;
pub mod state;
pub mod statistics;
pub mod supplier;
pub mod text_buffer;
pub mod timer;
pub mod wrap;

pub use config::{ConfigError, InputRules, Mode, SessionConfig};
pub use quote::{FetchError, Quote, QuoteSource};
pub use session::{Flow, Key, Phase, SessionError, SessionSnapshot, TypingSession};
pub use state::{KeyTally, Keystroke, TypingState, WordInput};
pub use statistics::SessionStatistics;
pub use supplier::QuoteSupplier;
pub use text_buffer::TextBuffer;
pub use timer::{TickOutcome, Timer};

/// Characters counted as one word when calculating words per minute
pub const AVERAGE_WORD_LENGTH: usize = 5;

/// Default cap on how many wrong keystrokes may stack up at the cursor
pub const MAX_MISTYPED: usize = 10;
