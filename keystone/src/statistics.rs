//! # Statistics Module - End of session results
//!
//! Gross WPM counts every keystroke, right or wrong, at five characters per word. Adjusted WPM
//! scales it by accuracy.

use web_time::Duration;

use crate::AVERAGE_WORD_LENGTH;
use crate::state::KeyTally;

/// Final results of a session, computed once when it ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStatistics {
    pub total_keys_pressed: usize,
    pub correct_keys_pressed: usize,
    pub elapsed: Duration,

    pub gross_wpm: f64,
    /// Share of correct keystrokes, from 0 to 1
    pub accuracy: f64,
    pub adjusted_wpm: f64,
    /// Characters per minute
    pub cpm: f64,
}

impl SessionStatistics {
    pub fn new(tally: KeyTally, elapsed: Duration) -> Self {
        let minutes = elapsed.as_secs_f64() / 60.0;
        let total = tally.total as f64;

        let per_minute = |count: f64| {
            if minutes > 0.0 { count / minutes } else { 0.0 }
        };

        let gross_wpm = per_minute(total / AVERAGE_WORD_LENGTH as f64);
        let accuracy = if tally.total > 0 {
            tally.correct as f64 / total
        } else {
            0.0
        };

        Self {
            total_keys_pressed: tally.total,
            correct_keys_pressed: tally.correct,
            elapsed,
            gross_wpm,
            accuracy,
            adjusted_wpm: gross_wpm * accuracy,
            cpm: per_minute(total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formulas() {
        let tally = KeyTally {
            total: 300,
            correct: 270,
        };
        let stats = SessionStatistics::new(tally, Duration::from_secs(60));

        assert_eq!(stats.gross_wpm, 60.0);
        assert_eq!(stats.accuracy, 0.9);
        assert!((stats.adjusted_wpm - 54.0).abs() < 1e-9);
        assert_eq!(stats.cpm, 300.0);
    }

    #[test]
    fn test_half_minute() {
        let tally = KeyTally {
            total: 50,
            correct: 50,
        };
        let stats = SessionStatistics::new(tally, Duration::from_secs(30));

        assert_eq!(stats.gross_wpm, 20.0);
        assert_eq!(stats.accuracy, 1.0);
        assert_eq!(stats.cpm, 100.0);
    }

    #[test]
    fn test_degenerate_inputs_are_zero() {
        let stats = SessionStatistics::new(KeyTally::default(), Duration::from_secs(10));
        assert_eq!(stats.accuracy, 0.0);
        assert_eq!(stats.gross_wpm, 0.0);

        let tally = KeyTally {
            total: 5,
            correct: 5,
        };
        let stats = SessionStatistics::new(tally, Duration::ZERO);
        assert_eq!(stats.gross_wpm, 0.0);
        assert_eq!(stats.cpm, 0.0);
        assert_eq!(stats.accuracy, 1.0);
    }
}
