//! Repaint governor for the overlay
//!
//! The overlay window is click-through, so egui never sees input and would
//! sleep forever. `RepaintController` keeps the frame loop alive: every
//! frame it schedules the next one no later than the engine's nearest
//! deadline, capped at the tick interval.
//!
//! Call [`RepaintController::begin_frame`] at the top of `update()` and
//! [`RepaintController::end_frame`] at the bottom.

use std::time::{Duration, Instant};

/// A frame arriving this many intervals late is logged as starved.
const STARVED_FACTOR: u32 = 4;

/// Why this frame is being painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepaintReason {
    /// First frame — always paint.
    Init,
    /// Woken by our own schedule.
    Scheduled,
    /// Woken much later than scheduled (window hidden, system busy).
    Late,
}

pub struct RepaintController {
    /// Upper bound on the gap between frames.
    interval: Duration,
    /// Frame counter (0 = first frame).
    frame: u64,
    /// Start of the previous frame.
    last_frame: Option<Instant>,
}

impl RepaintController {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            frame: 0,
            last_frame: None,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Record the start of a frame and classify it.
    pub fn begin_frame(&mut self, now: Instant) -> RepaintReason {
        let reason = match self.last_frame {
            None => RepaintReason::Init,
            Some(prev) => {
                let gap = now.saturating_duration_since(prev);
                if gap > self.interval * STARVED_FACTOR {
                    log::debug!("frame {} arrived {:?} after the previous one", self.frame, gap);
                    RepaintReason::Late
                } else {
                    RepaintReason::Scheduled
                }
            }
        };
        self.last_frame = Some(now);
        reason
    }

    /// How long to sleep before the next frame, given how long until the
    /// engine's next deadline.
    pub fn next_wake(&self, until_deadline: Duration) -> Duration {
        until_deadline.min(self.interval)
    }

    /// Schedule the next frame.
    pub fn end_frame(&mut self, ctx: &egui::Context, until_deadline: Duration) {
        self.frame += 1;
        ctx.request_repaint_after(self.next_wake(until_deadline));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_init() {
        let mut rc = RepaintController::new(Duration::from_millis(50));
        assert_eq!(rc.begin_frame(Instant::now()), RepaintReason::Init);
    }

    #[test]
    fn test_classifies_late_frames() {
        let t0 = Instant::now();
        let mut rc = RepaintController::new(Duration::from_millis(50));
        rc.begin_frame(t0);
        assert_eq!(rc.begin_frame(t0 + Duration::from_millis(50)), RepaintReason::Scheduled);
        assert_eq!(rc.begin_frame(t0 + Duration::from_millis(1000)), RepaintReason::Late);
        // Back on schedule after a late frame
        assert_eq!(rc.begin_frame(t0 + Duration::from_millis(1050)), RepaintReason::Scheduled);
    }

    #[test]
    fn test_next_wake_is_capped() {
        let rc = RepaintController::new(Duration::from_millis(50));
        assert_eq!(rc.next_wake(Duration::from_secs(10)), Duration::from_millis(50));
        assert_eq!(rc.next_wake(Duration::from_millis(5)), Duration::from_millis(5));
    }

    #[test]
    fn test_end_frame_counts() {
        let ctx = egui::Context::default();
        let mut rc = RepaintController::new(Duration::from_millis(50));
        rc.end_frame(&ctx, Duration::from_millis(20));
        rc.end_frame(&ctx, Duration::from_millis(20));
        assert_eq!(rc.frame(), 2);
    }
}
