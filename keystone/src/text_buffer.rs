//! # Text Buffer Module - Cursor and mistake tracking
//!
//! The [`TextBuffer`] holds the text of a session as word-wrapped lines, the position of the
//! character awaiting input, and the number of unresolved wrong keystrokes stacked at that
//! position.
//!
//! In scroll mode, lines are evicted as soon as the cursor has passed them, which keeps memory
//! bounded for endless sessions. Every offset kept by the buffer is counted in characters.

use tracing::debug;

use crate::quote::Quote;
use crate::wrap::wrap;

/// Word-wrapped session text with a cursor and a mistyped counter
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    total_length: usize,
    total_typed: usize,

    line_index: usize,
    letter_index: usize,
    /// Cursor offset counted from the start of the retained lines
    letter_index_from_start: usize,

    mistyped: usize,
    max_mistyped: usize,
    scroll: bool,
    width: usize,
}

impl TextBuffer {
    /// Creates an empty buffer wrapping at `width` characters.
    pub fn new(width: usize, max_mistyped: usize, scroll: bool) -> Self {
        Self {
            lines: Vec::new(),
            total_length: 0,
            total_typed: 0,
            line_index: 0,
            letter_index: 0,
            letter_index_from_start: 0,
            mistyped: 0,
            max_mistyped,
            scroll,
            width: width.max(1),
        }
    }

    /// Appends a quote, separated from any existing text by a line break.
    pub fn append(&mut self, quote: &Quote) {
        let passed_everything = self.line_index == self.lines.len();
        if let Some(last) = self.lines.last_mut() {
            last.push('\n');
            self.total_length += 1;
            if passed_everything {
                // Put the cursor back onto the separator
                self.line_index -= 1;
                self.letter_index = last.chars().count() - 1;
            }
        } else if self.total_length > 0 {
            // Everything before was typed and evicted; the separator lives on its own line
            self.lines.push(String::from('\n'));
            self.total_length += 1;
        }

        self.lines.extend(wrap(quote.text(), self.width));
        self.total_length += quote.len();

        debug!(
            length = quote.len(),
            lines = self.lines.len(),
            total_length = self.total_length,
            "appended quote"
        );
    }

    /// Re-wraps the retained text at `width` and relocates the cursor.
    ///
    /// Runs in linear time over the retained text.
    pub fn reflow(&mut self, width: usize) {
        self.width = width.max(1);
        self.lines = wrap(&self.lines.concat(), self.width);

        let mut offset = self.letter_index_from_start;
        self.line_index = self.lines.len();
        self.letter_index = 0;

        for (index, line) in self.lines.iter().enumerate() {
            let len = line.chars().count();
            if offset < len {
                self.line_index = index;
                self.letter_index = offset;
                break;
            }
            offset -= len;
        }
    }

    /// Moves the cursor to the next character.
    pub fn advance(&mut self) {
        self.total_typed += 1;
        self.letter_index += 1;
        self.letter_index_from_start += 1;

        if self.letter_index < self.current_line_len() {
            return;
        }

        self.letter_index = 0;
        if self.scroll {
            let evict = (self.line_index + 1).min(self.lines.len());
            self.lines.drain(..evict);
            self.line_index = 0;
            self.letter_index_from_start = 0;
        } else {
            self.line_index += 1;
        }

        debug_assert!(self.total_typed <= self.total_length);
    }

    /// Moves the cursor to the previous character.
    ///
    /// Does nothing at the start of a line, or when the previous character is a space: completed
    /// words can't be reopened. Returns true if the cursor moved.
    pub fn retreat(&mut self) -> bool {
        if self.letter_index == 0 {
            return false;
        }

        let previous = self
            .lines
            .get(self.line_index)
            .and_then(|line| line.chars().nth(self.letter_index - 1));

        if previous.is_none_or(|character| character == ' ') {
            return false;
        }

        self.letter_index -= 1;
        self.letter_index_from_start -= 1;
        self.total_typed -= 1;
        true
    }

    pub fn increment_mistyped(&mut self) {
        self.mistyped += 1;
        debug_assert!(self.mistyped <= self.remaining_letters().min(self.max_mistyped));
    }

    pub fn decrement_mistyped(&mut self) {
        self.mistyped = self.mistyped.saturating_sub(1);
    }

    /// Returns true if another wrong keystroke may be stacked at the cursor.
    pub fn can_accept_more_mistakes(&self) -> bool {
        self.mistyped < self.remaining_letters() && self.mistyped < self.max_mistyped
    }

    pub const fn has_mistakes(&self) -> bool {
        self.mistyped > 0
    }

    /// Returns the character awaiting input, or `None` past the end of the text.
    pub fn current_letter(&self) -> Option<char> {
        self.lines
            .get(self.line_index)?
            .chars()
            .nth(self.letter_index)
    }

    pub const fn remaining_letters(&self) -> usize {
        self.total_length.saturating_sub(self.total_typed)
    }

    /// Returns true once every character of the text has been typed.
    pub const fn is_complete(&self) -> bool {
        self.remaining_letters() == 0
    }

    /// Share of the text typed so far, from 0 to 1.
    pub fn progress(&self) -> f64 {
        if self.total_length == 0 {
            return 0.0;
        }
        self.total_typed as f64 / self.total_length as f64
    }

    fn current_line_len(&self) -> usize {
        self.lines
            .get(self.line_index)
            .map_or(0, |line| line.chars().count())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub const fn line_index(&self) -> usize {
        self.line_index
    }

    pub const fn letter_index(&self) -> usize {
        self.letter_index
    }

    pub const fn mistyped(&self) -> usize {
        self.mistyped
    }

    pub const fn total_length(&self) -> usize {
        self.total_length
    }

    pub const fn total_typed(&self) -> usize {
        self.total_typed
    }

    pub const fn is_scrolling(&self) -> bool {
        self.scroll
    }

    pub const fn width(&self) -> usize {
        self.width
    }
}
