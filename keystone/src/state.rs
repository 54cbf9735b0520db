//! # State Module - Keystroke interpretation
//!
//! A session is always in one of two [`TypingState`]s. While [`TypingState::Correct`], keystrokes
//! are compared against the character at the cursor and move it forward. Once a keystroke misses,
//! the session is [`TypingState::Mistake`]: every key is wrong until the mistyped run has been
//! backspaced away, and the cursor stays put.
//!
//! Transitions are plain functions of the state, the keystroke and the buffers they mutate.
//!
//! ```rust
//! use keystone::{InputRules, KeyTally, Keystroke, Quote, TextBuffer, TypingState, WordInput};
//!
//! let mut text = TextBuffer::new(80, 10, false);
//! text.append(&Quote::new("cat"));
//! let mut word = WordInput::default();
//! let mut tally = KeyTally::default();
//! let rules = InputRules::default();
//!
//! let state = TypingState::Correct.handle(Keystroke::Letter('x'), &mut text, &mut word, &mut tally, &rules);
//! assert_eq!(state, TypingState::Mistake);
//! assert_eq!(text.mistyped(), 1);
//! ```

use crate::config::InputRules;
use crate::text_buffer::TextBuffer;

/// Glyph shown in the word input for a typed line break
pub const ENTER_GLYPH: char = '⏎';

/// A keystroke the state machine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Letter(char),
    Space,
    Backspace,
    Enter,
}

impl Keystroke {
    /// The character this keystroke types, if any.
    const fn typed(self, rules: &InputRules) -> Option<char> {
        match self {
            Self::Letter(character) => Some(character),
            Self::Space => Some(' '),
            Self::Enter if rules.enter_matches_newline => Some('\n'),
            Self::Enter | Self::Backspace => None,
        }
    }

    /// Returns true if this keystroke types `expected`.
    fn matches(self, expected: char, rules: &InputRules) -> bool {
        match (self, expected) {
            (Self::Space, '\n') => !rules.enter_matches_newline,
            _ => self.typed(rules) == Some(expected),
        }
    }

    const fn glyph(self) -> Option<char> {
        match self {
            Self::Letter(character) => Some(character),
            Self::Space => Some(' '),
            Self::Enter => Some(ENTER_GLYPH),
            Self::Backspace => None,
        }
    }

    /// Returns true for keystrokes that complete a word when typed correctly.
    const fn ends_word(self) -> bool {
        matches!(self, Self::Space | Self::Enter)
    }
}

/// Echo of what has been typed for the current word
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordInput(String);

impl WordInput {
    pub fn push(&mut self, character: char) {
        self.0.push(character);
    }

    pub fn pop(&mut self) -> Option<char> {
        self.0.pop()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Keystroke counters for the final statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyTally {
    pub total: usize,
    pub correct: usize,
}

impl KeyTally {
    pub fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }
}

/// The two states of a running session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TypingState {
    /// No unresolved mistakes
    #[default]
    Correct,
    /// At least one wrong keystroke is stacked at the cursor
    Mistake,
}

impl TypingState {
    /// Applies `keystroke` and returns the next state.
    ///
    /// The caller must make sure a character is waiting at the cursor.
    pub fn handle(
        self,
        keystroke: Keystroke,
        text: &mut TextBuffer,
        word: &mut WordInput,
        tally: &mut KeyTally,
        rules: &InputRules,
    ) -> Self {
        match self {
            Self::Correct => correct(keystroke, text, word, tally, rules),
            Self::Mistake => mistake(keystroke, text, word, tally),
        }
    }
}

fn correct(
    keystroke: Keystroke,
    text: &mut TextBuffer,
    word: &mut WordInput,
    tally: &mut KeyTally,
    rules: &InputRules,
) -> TypingState {
    let Some(glyph) = keystroke.glyph() else {
        if word.pop().is_some() {
            text.retreat();
        }
        return TypingState::Correct;
    };

    let Some(expected) = text.current_letter() else {
        return TypingState::Correct;
    };

    word.push(glyph);

    if keystroke.matches(expected, rules) {
        tally.record(true);
        if keystroke.ends_word() {
            word.clear();
        }
        text.advance();
        TypingState::Correct
    } else {
        tally.record(false);
        text.increment_mistyped();
        TypingState::Mistake
    }
}

fn mistake(
    keystroke: Keystroke,
    text: &mut TextBuffer,
    word: &mut WordInput,
    tally: &mut KeyTally,
) -> TypingState {
    let Some(glyph) = keystroke.glyph() else {
        if word.pop().is_some() {
            if text.has_mistakes() {
                text.decrement_mistyped();
            } else {
                text.retreat();
            }
        }

        return if text.has_mistakes() {
            TypingState::Mistake
        } else {
            TypingState::Correct
        };
    };

    tally.record(false);

    // Keystrokes past the cap still count as wrong, but are neither echoed nor stacked
    if text.can_accept_more_mistakes() {
        word.push(glyph);
        text.increment_mistyped();
    }

    TypingState::Mistake
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::Quote;

    struct Machine {
        state: TypingState,
        text: TextBuffer,
        word: WordInput,
        tally: KeyTally,
        rules: InputRules,
    }

    impl Machine {
        fn new(content: &str) -> Self {
            Self::with_limit(content, crate::MAX_MISTYPED)
        }

        fn with_limit(content: &str, max_mistyped: usize) -> Self {
            let mut text = TextBuffer::new(80, max_mistyped, false);
            text.append(&Quote::new(content));
            Self {
                state: TypingState::Correct,
                text,
                word: WordInput::default(),
                tally: KeyTally::default(),
                rules: InputRules::default(),
            }
        }

        fn press(&mut self, keystroke: Keystroke) {
            self.state = self.state.handle(
                keystroke,
                &mut self.text,
                &mut self.word,
                &mut self.tally,
                &self.rules,
            );
            // The state always mirrors the mistyped counter
            assert_eq!(
                self.state == TypingState::Mistake,
                self.text.mistyped() > 0
            );
            assert!(
                self.text.mistyped()
                    <= self.text.remaining_letters().min(crate::MAX_MISTYPED)
            );
        }

        fn type_str(&mut self, input: &str) {
            for character in input.chars() {
                let keystroke = match character {
                    ' ' => Keystroke::Space,
                    '\n' => Keystroke::Enter,
                    '<' => Keystroke::Backspace,
                    other => Keystroke::Letter(other),
                };
                self.press(keystroke);
            }
        }
    }

    #[test]
    fn test_all_correct() {
        let mut machine = Machine::new("cat dog");
        machine.type_str("cat dog");

        assert_eq!(machine.state, TypingState::Correct);
        assert_eq!(machine.text.mistyped(), 0);
        assert!(machine.text.is_complete());
        assert_eq!(machine.tally, KeyTally { total: 7, correct: 7 });
    }

    #[test]
    fn test_space_clears_word_input() {
        let mut machine = Machine::new("cat dog");
        machine.type_str("ca");
        assert_eq!(machine.word.as_str(), "ca");

        machine.type_str("t ");
        assert_eq!(machine.word.as_str(), "");

        machine.type_str("d");
        assert_eq!(machine.word.as_str(), "d");
    }

    #[test]
    fn test_mistake_stacks_without_moving_cursor() {
        let mut machine = Machine::new("cat");
        machine.type_str("c");
        assert_eq!(machine.state, TypingState::Correct);

        machine.type_str("x");
        assert_eq!(machine.state, TypingState::Mistake);
        assert_eq!(machine.text.mistyped(), 1);
        assert_eq!(machine.text.total_typed(), 1);

        machine.type_str("t");
        assert_eq!(machine.state, TypingState::Mistake);
        assert_eq!(machine.text.mistyped(), 2);
        assert_eq!(machine.text.total_typed(), 1);
        assert_eq!(machine.word.as_str(), "cxt");
        assert_eq!(machine.tally, KeyTally { total: 3, correct: 1 });
    }

    #[test]
    fn test_backspace_resolves_mistakes() {
        let mut machine = Machine::new("cat");
        machine.type_str("cxt");

        machine.type_str("<");
        assert_eq!(machine.text.mistyped(), 1);
        assert_eq!(machine.state, TypingState::Mistake);
        assert_eq!(machine.text.current_letter(), Some('a'));

        machine.type_str("<");
        assert_eq!(machine.text.mistyped(), 0);
        assert_eq!(machine.state, TypingState::Correct);
        assert_eq!(machine.text.current_letter(), Some('a'));

        // The letter has to be typed again
        machine.type_str("at");
        assert!(machine.text.is_complete());
        assert_eq!(machine.tally, KeyTally { total: 5, correct: 3 });
    }

    #[test]
    fn test_backspace_in_correct_state_retreats() {
        let mut machine = Machine::new("cat");
        machine.type_str("ca<");

        assert_eq!(machine.text.current_letter(), Some('a'));
        assert_eq!(machine.word.as_str(), "c");
        assert_eq!(machine.text.total_typed(), 1);
    }

    #[test]
    fn test_backspace_cannot_reopen_completed_word() {
        let mut machine = Machine::new("cat dog");
        machine.type_str("cat <");

        assert_eq!(machine.text.current_letter(), Some('d'));
        assert_eq!(machine.text.total_typed(), 4);
    }

    #[test]
    fn test_mistakes_are_capped_by_remaining_letters() {
        let mut machine = Machine::new("ab");
        machine.type_str("xyz");

        // Only two letters are left, so the third wrong key is counted but not stacked
        assert_eq!(machine.text.mistyped(), 2);
        assert_eq!(machine.word.as_str(), "xy");
        assert_eq!(machine.tally, KeyTally { total: 3, correct: 0 });
    }

    #[test]
    fn test_mistakes_are_capped_by_limit() {
        let mut machine = Machine::with_limit("a fairly long sentence", 3);
        machine.type_str("xxxxx");

        assert_eq!(machine.text.mistyped(), 3);
        assert_eq!(machine.tally.total, 5);
    }

    #[test]
    fn test_wrong_space_enters_mistake() {
        let mut machine = Machine::new("ab");
        machine.type_str("a ");

        assert_eq!(machine.state, TypingState::Mistake);
        assert_eq!(machine.word.as_str(), "a ");
    }

    #[test]
    fn test_enter_types_newline() {
        let mut machine = Machine::new("ab");
        machine.text.append(&Quote::new("cd"));
        machine.type_str("ab\n");

        assert_eq!(machine.state, TypingState::Correct);
        assert_eq!(machine.text.current_letter(), Some('c'));
        assert_eq!(machine.word.as_str(), "");
    }

    #[test]
    fn test_space_types_newline_when_enter_is_ignored() {
        let mut machine = Machine::new("ab");
        machine.rules.enter_matches_newline = false;
        machine.text.append(&Quote::new("cd"));
        machine.type_str("ab ");

        assert_eq!(machine.state, TypingState::Correct);
        assert_eq!(machine.text.current_letter(), Some('c'));
    }

    #[test]
    fn test_enter_in_mistake_shows_glyph() {
        let mut machine = Machine::new("abc");
        machine.type_str("x\n");

        assert_eq!(machine.word.as_str(), format!("x{ENTER_GLYPH}"));
        assert_eq!(machine.text.mistyped(), 2);
    }
}
