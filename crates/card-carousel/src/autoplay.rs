//! Autoplay timer state machine.

use std::time::{Duration, Instant};

/// State of the autoplay timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayState {
    /// No pending advance.
    Stopped,
    /// An advance is due at `next_due`, then every interval after it.
    Running { next_due: Instant },
}

/// Repeating autoplay timer.
///
/// Starting always replaces any pending deadline, so a carousel never has
/// more than one timer. Stopping clears the deadline, so nothing fires
/// after it.
#[derive(Debug, Clone)]
pub struct Autoplay {
    interval: Option<Duration>,
    state: AutoplayState,
}

impl Autoplay {
    /// Create a stopped timer. `None` means autoplay is disabled.
    pub fn new(interval: Option<Duration>) -> Self {
        Self {
            interval: interval.filter(|d| !d.is_zero()),
            state: AutoplayState::Stopped,
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn state(&self) -> AutoplayState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, AutoplayState::Running { .. })
    }

    /// Deadline of the next advance, if running.
    pub fn next_due(&self) -> Option<Instant> {
        match self.state {
            AutoplayState::Running { next_due } => Some(next_due),
            AutoplayState::Stopped => None,
        }
    }

    /// Start counting a full interval from `now`.
    ///
    /// Any pending deadline is dropped first. Returns whether the timer is
    /// running afterwards (it stays stopped when autoplay is disabled).
    pub fn start(&mut self, now: Instant) -> bool {
        self.stop();
        if let Some(interval) = self.interval {
            self.state = AutoplayState::Running {
                next_due: now + interval,
            };
        }
        self.is_running()
    }

    /// Stop the timer. Returns whether it was running; stopping a stopped
    /// timer is a no-op.
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        self.state = AutoplayState::Stopped;
        was_running
    }

    /// Stop, then start from `now`.
    ///
    /// Used after user interaction so the next advance is a full interval
    /// away. Returns whether the timer is running afterwards.
    pub fn restart(&mut self, now: Instant) -> bool {
        self.stop();
        self.start(now)
    }

    /// Consume one due tick.
    ///
    /// Returns `true` when the deadline has passed at `now`, and moves the
    /// deadline one interval forward. Call repeatedly to catch up on
    /// several missed ticks.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match (self.state, self.interval) {
            (AutoplayState::Running { next_due }, Some(interval)) if next_due <= now => {
                self.state = AutoplayState::Running {
                    next_due: next_due + interval,
                };
                true
            }
            _ => false,
        }
    }
}
