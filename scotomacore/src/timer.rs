//! Periodic tickers driven by the frame loop
//!
//! eframe has no timer callbacks, only repaint requests. Each periodic job
//! owns a `Ticker` and polls it every frame with the current instant.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Instant,
}

impl Ticker {
    /// First firing is one period after `now`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    /// Returns `true` at most once per call when the ticker is due.
    ///
    /// A late poll still fires. If one or more whole periods were missed
    /// they collapse into this single firing and the schedule restarts
    /// from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += self.period;
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
        true
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Time until the next firing, zero if already due
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}
