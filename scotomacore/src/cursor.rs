//! Cursor automation
//!
//! Every so often the cursor is dragged toward the screen corner opposite
//! the quadrant it is in. The drag is a small state machine advanced one
//! step per scheduler tick, so the frame loop never blocks on it.

use rand::Rng;
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use crate::geometry::{Position, ScreenSize};
use crate::timer::Ticker;

/// Corner diagonally opposite the quadrant containing `position`.
pub fn corner_target(position: Position, screen: ScreenSize) -> Position {
    let (w, h) = (screen.width as f64, screen.height as f64);
    let x = if (position.x as f64) < w / 2.0 {
        screen.width.saturating_sub(1) as i32
    } else {
        0
    };
    let y = if (position.y as f64) < h / 2.0 {
        screen.height.saturating_sub(1) as i32
    } else {
        0
    };
    Position::new(x, y)
}

/// One drag from a start point to a target in a fixed number of steps.
///
/// Each step covers `1 / remaining` of what is left, so the path is a
/// straight line and the last step lands exactly on the target.
#[derive(Debug, Clone)]
pub struct CursorDrag {
    x: f64,
    y: f64,
    target: Position,
    steps: u32,
    step: u32,
}

impl CursorDrag {
    pub fn new(start: Position, target: Position, steps: u32) -> Self {
        Self {
            x: start.x as f64,
            y: start.y as f64,
            target,
            steps: steps.max(1),
            step: 0,
        }
    }

    /// Move one step. Returns the new cursor position, or `None` once the
    /// drag is finished.
    pub fn advance(&mut self) -> Option<Position> {
        if self.is_finished() {
            return None;
        }
        let remaining = (self.steps - self.step) as f64;
        self.x += (self.target.x as f64 - self.x) / remaining;
        self.y += (self.target.y as f64 - self.y) / remaining;
        self.step += 1;
        Some(Position::new(self.x.round() as i32, self.y.round() as i32))
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.steps
    }

    pub fn steps_taken(&self) -> u32 {
        self.step
    }
}

#[derive(Debug)]
struct ActiveDrag {
    drag: CursorDrag,
    ticker: Ticker,
}

/// Schedules drags at random intervals and steps the active one.
#[derive(Debug)]
pub struct CursorAutomation {
    interval: RangeInclusive<Duration>,
    steps: u32,
    step_interval: Duration,
    next_run: Instant,
    active: Option<ActiveDrag>,
}

impl CursorAutomation {
    pub fn new(
        interval: RangeInclusive<Duration>,
        steps: u32,
        step_interval: Duration,
        now: Instant,
        rng: &mut impl Rng,
    ) -> Self {
        let next_run = now + roll_interval(&interval, rng);
        Self {
            interval,
            steps,
            step_interval,
            next_run,
            active: None,
        }
    }

    /// Advance the automation. Returns where the cursor should be moved to
    /// this frame, if anywhere.
    ///
    /// `pointer` is the current cursor position; when it is unknown a due
    /// drag is skipped and rescheduled.
    pub fn poll(
        &mut self,
        now: Instant,
        pointer: Option<Position>,
        screen: ScreenSize,
        rng: &mut impl Rng,
    ) -> Option<Position> {
        if let Some(active) = self.active.as_mut() {
            if !active.ticker.poll(now) {
                return None;
            }
            let moved = active.drag.advance();
            if active.drag.is_finished() {
                self.finish(now, rng);
            }
            return moved;
        }

        if now < self.next_run {
            return None;
        }

        let Some(start) = pointer else {
            log::warn!("cursor position unavailable, skipping drag");
            self.next_run = now + roll_interval(&self.interval, rng);
            return None;
        };

        let target = corner_target(start, screen);
        log::debug!("dragging cursor from {:?} to {:?}", start, target);
        let mut drag = CursorDrag::new(start, target, self.steps);
        let moved = drag.advance();
        if drag.is_finished() {
            self.finish(now, rng);
        } else {
            self.active = Some(ActiveDrag {
                drag,
                ticker: Ticker::new(self.step_interval, now),
            });
        }
        moved
    }

    fn finish(&mut self, now: Instant, rng: &mut impl Rng) {
        self.active = None;
        let wait = roll_interval(&self.interval, rng);
        self.next_run = now + wait;
        log::debug!("cursor drag finished, next in {:.1}s", wait.as_secs_f32());
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn next_run(&self) -> Instant {
        self.next_run
    }

    /// When `poll` next has work to do: the next drag step while dragging,
    /// otherwise the start of the next drag.
    pub fn next_deadline(&self) -> Instant {
        match &self.active {
            Some(active) => active.ticker.next_due(),
            None => self.next_run,
        }
    }
}

fn roll_interval(interval: &RangeInclusive<Duration>, rng: &mut impl Rng) -> Duration {
    rng.gen_range(interval.clone())
}
