//! # Timer Module - Stopwatch and countdown
//!
//! Timers don't run on their own: the caller feeds them tick events from its event loop. A
//! [`Timer::Stopwatch`] reads the wall clock, a [`Timer::Countdown`] loses one tick interval per
//! tick and times out when nothing is left.

use web_time::{Duration, Instant};

/// What happened on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    TimedOut,
}

#[derive(Debug, Clone)]
pub enum Timer {
    /// Counts up from the first keystroke
    Stopwatch {
        started_at: Option<Instant>,
        stopped: Option<Duration>,
    },
    /// Counts down from `total`
    Countdown {
        total: Duration,
        remaining: Duration,
        interval: Duration,
        started: bool,
    },
}

impl Timer {
    pub const fn stopwatch() -> Self {
        Self::Stopwatch {
            started_at: None,
            stopped: None,
        }
    }

    pub const fn countdown(total: Duration, interval: Duration) -> Self {
        Self::Countdown {
            total,
            remaining: total,
            interval,
            started: false,
        }
    }

    /// Starts the timer. Starting twice has no effect.
    pub fn start(&mut self) {
        match self {
            Self::Stopwatch { started_at, .. } => {
                started_at.get_or_insert_with(Instant::now);
            }
            Self::Countdown { started, .. } => *started = true,
        }
    }

    /// Freezes a stopwatch at its current reading.
    pub fn stop(&mut self) {
        if let Self::Stopwatch {
            started_at: Some(started_at),
            stopped,
        } = self
        {
            stopped.get_or_insert_with(|| started_at.elapsed());
        }
    }

    /// Advances the timer by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        match self {
            Self::Stopwatch { .. } => TickOutcome::Running,
            Self::Countdown {
                started: false, ..
            } => TickOutcome::Running,
            Self::Countdown {
                remaining,
                interval,
                ..
            } => {
                *remaining = remaining.saturating_sub(*interval);
                if remaining.is_zero() {
                    TickOutcome::TimedOut
                } else {
                    TickOutcome::Running
                }
            }
        }
    }

    pub fn is_started(&self) -> bool {
        match self {
            Self::Stopwatch { started_at, .. } => started_at.is_some(),
            Self::Countdown { started, .. } => *started,
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            Self::Stopwatch {
                stopped: Some(stopped),
                ..
            } => *stopped,
            Self::Stopwatch {
                started_at: Some(started_at),
                ..
            } => started_at.elapsed(),
            Self::Stopwatch { .. } => Duration::ZERO,
            Self::Countdown {
                total, remaining, ..
            } => total.saturating_sub(*remaining),
        }
    }

    /// Time left on a countdown, `None` for a stopwatch.
    pub const fn remaining(&self) -> Option<Duration> {
        match self {
            Self::Countdown { remaining, .. } => Some(*remaining),
            Self::Stopwatch { .. } => None,
        }
    }

    /// Share of the countdown used up, from 0 to 1. Always 0 for a stopwatch.
    pub fn fraction_elapsed(&self) -> f64 {
        match self {
            Self::Countdown { total, .. } if !total.is_zero() => {
                self.elapsed().as_secs_f64() / total.as_secs_f64()
            }
            _ => 0.0,
        }
    }

    /// Formats the reading as `mm:ss:cc` for a stopwatch and `mm:ss` for a countdown.
    pub fn display(&self) -> String {
        match self {
            Self::Stopwatch { .. } => {
                let elapsed = self.elapsed();
                let centis = elapsed.subsec_millis() / 10;
                let seconds = elapsed.as_secs() % 60;
                let minutes = elapsed.as_secs() / 60;
                format!("{minutes:02}:{seconds:02}:{centis:02}")
            }
            Self::Countdown { remaining, .. } => {
                let seconds = remaining.as_secs() % 60;
                let minutes = remaining.as_secs() / 60;
                format!("{minutes:02}:{seconds:02}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_times_out() {
        let mut timer = Timer::countdown(Duration::from_secs(3), Duration::from_secs(1));
        timer.start();

        assert_eq!(timer.tick(), TickOutcome::Running);
        assert_eq!(timer.tick(), TickOutcome::Running);
        assert_eq!(timer.remaining(), Some(Duration::from_secs(1)));
        assert_eq!(timer.elapsed(), Duration::from_secs(2));
        assert_eq!(timer.tick(), TickOutcome::TimedOut);
        assert_eq!(timer.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_countdown_ignores_ticks_before_start() {
        let mut timer = Timer::countdown(Duration::from_secs(1), Duration::from_secs(1));
        assert!(!timer.is_started());
        assert_eq!(timer.tick(), TickOutcome::Running);
        assert_eq!(timer.remaining(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_countdown_saturates() {
        let mut timer = Timer::countdown(Duration::from_millis(1500), Duration::from_secs(1));
        timer.start();
        assert_eq!(timer.tick(), TickOutcome::Running);
        assert_eq!(timer.tick(), TickOutcome::TimedOut);
        assert_eq!(timer.fraction_elapsed(), 1.0);
    }

    #[test]
    fn test_countdown_display() {
        let mut timer = Timer::countdown(Duration::from_secs(300), Duration::from_secs(1));
        assert_eq!(timer.display(), "05:00");
        timer.start();
        timer.tick();
        assert_eq!(timer.display(), "04:59");
    }

    #[test]
    fn test_stopwatch_counts_up_and_freezes() {
        let mut timer = Timer::stopwatch();
        assert_eq!(timer.elapsed(), Duration::ZERO);
        assert_eq!(timer.display(), "00:00:00");

        timer.start();
        std::thread::sleep(Duration::from_millis(20));
        timer.stop();

        let frozen = timer.elapsed();
        assert!(frozen >= Duration::from_millis(20));
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(timer.elapsed(), frozen);
        assert_eq!(timer.remaining(), None);
    }
}
