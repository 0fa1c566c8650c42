//! Idle detection
//!
//! Checked on a slow timer. Each check compares the pointer with the
//! previous check; once it has stayed put for `threshold` checks in a row
//! the detector fires and starts counting again from zero.

use crate::geometry::Position;

#[derive(Debug, Clone)]
pub struct IdleDetector {
    threshold: u32,
    still_checks: u32,
    last_position: Option<Position>,
}

impl IdleDetector {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            still_checks: 0,
            last_position: None,
        }
    }

    /// Record one check. Returns `true` when the pointer has just completed
    /// an idle window.
    pub fn check(&mut self, position: Position) -> bool {
        if self.last_position == Some(position) {
            self.still_checks += 1;
        } else {
            self.still_checks = 0;
        }
        self.last_position = Some(position);

        if self.still_checks >= self.threshold {
            self.still_checks = 0;
            true
        } else {
            false
        }
    }

    pub fn still_checks(&self) -> u32 {
        self.still_checks
    }
}
