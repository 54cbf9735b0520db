//! # Quote Module - Sanitized text chunks
//!
//! Quotes come from an external [`QuoteSource`] and are sanitized before they reach the
//! [`TextBuffer`](crate::TextBuffer), so the buffer only ever holds characters a keyboard can
//! produce.

use thiserror::Error;

/// Typographic characters replaced by their ASCII look-alikes
const SUBSTITUTIONS: &[(char, char)] = &[
    ('\u{2018}', '\''),
    ('\u{2019}', '\''),
    ('\u{201C}', '"'),
    ('\u{201D}', '"'),
    ('\u{2013}', '-'),
    ('\u{2014}', '-'),
];

/// An error while fetching a single quote
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Quote source unreachable: {0}")]
    Transport(String),

    #[error("Quote source returned status {status}")]
    Status { status: u16 },

    #[error("Failed to parse quote payload: {0}")]
    Payload(String),

    #[error("Quote source returned an empty quote")]
    Empty,
}

/// A pull-style provider of raw quote text
///
/// Implementations may block. They are called from the background producer thread as well as
/// from the session's pre-fill, hence `Send + Sync`.
pub trait QuoteSource: Send + Sync {
    /// Fetches a single raw, unsanitized quote.
    fn fetch_one(&self) -> Result<String, FetchError>;
}

/// A sanitized chunk of text, ready to be appended to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    text: String,
    length: usize,
}

impl Quote {
    /// Sanitizes `raw` into a quote.
    pub fn new(raw: &str) -> Self {
        let text = sanitize(raw);
        let length = text.chars().count();
        Self { text, length }
    }

    /// Sanitizes `raw`, rejecting text that ends up empty.
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        let quote = Self::new(raw);
        if quote.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(quote)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters in the sanitized text.
    pub const fn len(&self) -> usize {
        self.length
    }

    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Restricts `raw` to single-spaced ASCII.
///
/// Typographic punctuation is substituted, any other non-ASCII character and every newline is
/// dropped, and runs of whitespace collapse into one space. Other control characters can't be
/// typed, so they are dropped too.
pub fn sanitize(raw: &str) -> String {
    let filtered = raw
        .chars()
        .map(|character| {
            SUBSTITUTIONS
                .iter()
                .find(|(from, _)| *from == character)
                .map_or(character, |(_, to)| *to)
        })
        .filter(|character| character.is_ascii() && *character != '\n')
        .collect::<String>();

    filtered
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|character| !character.is_ascii_control())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
