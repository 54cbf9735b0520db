//! # Wrap Module - Lossless word wrapping
//!
//! Splits text into physical lines without dropping a single character: every line keeps the
//! separator (space or newline) that ended its last word, so concatenating the lines gives back
//! the input text.
//!
//! ```rust
//! use keystone::wrap::wrap;
//!
//! let lines = wrap("hello world this is a test", 10);
//! assert_eq!(lines, vec!["hello ", "world this ", "is a test"]);
//! assert_eq!(lines.concat(), "hello world this is a test");
//! ```

/// Returns the tokens of `text`, each ending at (and including) a space or a newline.
///
/// The last token has no separator unless the text ends with one.
pub fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive([' ', '\n'])
}

/// Number of characters a token occupies on screen, not counting its trailing separator.
fn visible_len(token: &str) -> usize {
    token.strip_suffix([' ', '\n']).unwrap_or(token).chars().count()
}

/// Greedily packs the tokens of `text` into lines of at most `width` visible characters.
///
/// A token ending in a newline always ends its line. A token longer than `width` gets a line of
/// its own. A `width` of zero is treated as one.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for token in tokens(text) {
        if line_len > 0 && line_len + visible_len(token) > width {
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }

        line.push_str(token);
        line_len += token.chars().count();

        if token.ends_with('\n') {
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}
