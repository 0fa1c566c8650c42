//! The overlay engine
//!
//! Owns all effect state and runs the four periodic jobs from the frame
//! loop:
//!
//! 1. **Drain** — empty the sample channel and promote some samples to
//!    streaks.
//! 2. **Render tick** — purge expired streaks and age the rest.
//! 3. **Idle check** — compare the pointer with the last check and burst
//!    when it has been still long enough.
//! 4. **Cursor automation** — start or step a corner drag.
//!
//! The engine never touches the platform. The caller supplies the current
//! instant, pointer position and screen size, and applies the returned
//! [`Frame`].

use rand::rngs::StdRng;
use rand::Rng;
use std::time::{Duration, Instant};

use crate::config::OverlayConfig;
use crate::cursor::CursorAutomation;
use crate::geometry::{Position, ScreenSize};
use crate::idle::IdleDetector;
use crate::sampler::{Promoter, SampleReceiver};
use crate::streak::StreakField;
use crate::timer::Ticker;

/// What the caller must do after one `advance`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Frame {
    /// Move the cursor here
    pub warp_to: Option<Position>,
    /// An idle burst fired this frame
    pub burst: bool,
}

/// Running totals, for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub ticks: u64,
    pub promoted: u64,
    pub bursts: u64,
}

pub struct Engine<R: Rng = StdRng> {
    field: StreakField,
    samples: SampleReceiver,
    promoter: Promoter,
    idle: IdleDetector,
    cursor: CursorAutomation,
    drain_ticker: Ticker,
    render_ticker: Ticker,
    idle_ticker: Ticker,
    burst_size: usize,
    stats: EngineStats,
    rng: R,
}

impl<R: Rng> Engine<R> {
    pub fn new(config: &OverlayConfig, samples: SampleReceiver, now: Instant, mut rng: R) -> Self {
        let cursor = CursorAutomation::new(
            config.move_interval_range(),
            config.drag_steps,
            config.drag_step_interval(),
            now,
            &mut rng,
        );
        Self {
            field: StreakField::new(config.streak_lifetime),
            samples,
            promoter: Promoter::new(config.promote_probability),
            idle: IdleDetector::new(config.idle_threshold),
            cursor,
            drain_ticker: Ticker::new(config.tick_interval(), now),
            render_ticker: Ticker::new(config.tick_interval(), now),
            idle_ticker: Ticker::new(config.idle_check_interval(), now),
            burst_size: config.burst_size,
            stats: EngineStats::default(),
            rng,
        }
    }

    /// Run whichever jobs are due at `now`.
    pub fn advance(&mut self, now: Instant, pointer: Option<Position>, screen: ScreenSize) -> Frame {
        let mut frame = Frame::default();

        if self.drain_ticker.poll(now) {
            let samples = self.samples.drain();
            if !samples.is_empty() {
                let created = self.promoter.promote(samples, &mut self.field, &mut self.rng);
                self.stats.promoted += created as u64;
            }
        }

        if self.render_ticker.poll(now) {
            self.field.tick();
            self.stats.ticks += 1;
        }

        if self.idle_ticker.poll(now) {
            if let Some(position) = pointer {
                if self.idle.check(position) {
                    log::debug!("pointer idle at {:?}, bursting {} streaks", position, self.burst_size);
                    self.field.burst(self.burst_size, screen, &mut self.rng);
                    self.stats.bursts += 1;
                    frame.burst = true;
                }
            }
        }

        frame.warp_to = self.cursor.poll(now, pointer, screen, &mut self.rng);
        frame
    }

    /// Time until the next periodic job is due, cursor automation
    /// included.
    pub fn until_next_deadline(&self, now: Instant) -> Duration {
        [&self.drain_ticker, &self.render_ticker, &self.idle_ticker]
            .iter()
            .map(|t| t.remaining(now))
            .chain(std::iter::once(self.cursor.next_deadline().saturating_duration_since(now)))
            .min()
            .unwrap_or(Duration::ZERO)
    }

    pub fn streaks(&self) -> &StreakField {
        &self.field
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn dropped_samples(&self) -> u64 {
        self.samples.dropped()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::sample_channel;
    use rand::SeedableRng;

    const TICK: Duration = Duration::from_millis(50);
    const SCREEN: ScreenSize = ScreenSize::new(800, 600);

    fn engine(config: &OverlayConfig, t0: Instant) -> (crate::sampler::SampleSender, Engine) {
        let (tx, rx) = sample_channel(config.queue_capacity);
        (tx, Engine::new(config, rx, t0, StdRng::seed_from_u64(1234)))
    }

    #[test]
    fn test_stationary_pointer_bursts_then_fades() {
        let config = OverlayConfig::default();
        let t0 = Instant::now();
        let (_tx, mut engine) = engine(&config, t0);
        let pointer = Some(Position::new(100, 100));

        let mut burst_frames = Vec::new();
        for i in 1..=120u32 {
            let frame = engine.advance(t0 + TICK * i, pointer, SCREEN);
            assert_eq!(frame.warp_to, None);
            if frame.burst {
                burst_frames.push(i);
            }
        }
        // Baseline at 1s, five unchanged checks at 2..=6s
        assert_eq!(burst_frames, vec![120]);
        assert_eq!(engine.streaks().len(), 200);
        assert!(engine.streaks().iter().all(|s| SCREEN.contains(s.position)));

        for i in 121..=179u32 {
            assert!(!engine.advance(t0 + TICK * i, pointer, SCREEN).burst);
        }
        assert_eq!(engine.streaks().visible_count(), 200);

        engine.advance(t0 + TICK * 180, pointer, SCREEN);
        assert_eq!(engine.streaks().visible_count(), 0);

        engine.advance(t0 + TICK * 181, pointer, SCREEN);
        assert!(engine.streaks().is_empty());
    }

    #[test]
    fn test_burst_repeats_every_idle_window() {
        let config = OverlayConfig::default();
        let t0 = Instant::now();
        let (_tx, mut engine) = engine(&config, t0);
        let pointer = Some(Position::new(100, 100));
        for s in 1..=11u32 {
            engine.advance(t0 + Duration::from_secs(s as u64), pointer, SCREEN);
        }
        assert_eq!(engine.stats().bursts, 2);
    }

    #[test]
    fn test_movement_prevents_burst() {
        let config = OverlayConfig::default();
        let t0 = Instant::now();
        let (_tx, mut engine) = engine(&config, t0);
        for s in 1..=10i32 {
            let pointer = Some(Position::new(s, 0));
            assert!(!engine.advance(t0 + Duration::from_secs(s as u64), pointer, SCREEN).burst);
        }
    }

    #[test]
    fn test_drained_samples_become_streaks() {
        let config = OverlayConfig {
            promote_probability: 1.0,
            ..OverlayConfig::default()
        };
        let t0 = Instant::now();
        let (tx, mut engine) = engine(&config, t0);
        for i in 0..10 {
            tx.push(Position::new(i, i));
        }
        // Not due yet
        engine.advance(t0 + Duration::from_millis(10), None, SCREEN);
        assert!(engine.streaks().is_empty());

        engine.advance(t0 + TICK, None, SCREEN);
        assert_eq!(engine.streaks().len(), 10);
        assert_eq!(engine.stats().promoted, 10);
        // Drain runs before the render tick, so the new streaks are aged once
        assert!(engine.streaks().iter().all(|s| s.age == 1));
    }

    #[test]
    fn test_cursor_drag_through_engine() {
        let config = OverlayConfig {
            move_interval_min_ms: 1000,
            move_interval_max_ms: 1000,
            drag_steps: 5,
            ..OverlayConfig::default()
        };
        let t0 = Instant::now();
        let (_tx, mut engine) = engine(&config, t0);
        let pointer = Some(Position::new(700, 500));

        let mut warps = Vec::new();
        for i in 1..=40u32 {
            if let Some(p) = engine.advance(t0 + TICK * i, pointer, SCREEN).warp_to {
                warps.push(p);
            }
        }
        assert_eq!(warps.len(), 5);
        assert_eq!(warps.last(), Some(&Position::new(0, 0)));
    }

    #[test]
    fn test_fast_drag_steps_shorten_wakeup() {
        let config = OverlayConfig {
            move_interval_min_ms: 1000,
            move_interval_max_ms: 1000,
            drag_step_ms: 10,
            ..OverlayConfig::default()
        };
        let t0 = Instant::now();
        let (_tx, mut engine) = engine(&config, t0);
        let start = t0 + Duration::from_secs(1);
        let frame = engine.advance(start, Some(Position::new(10, 10)), SCREEN);
        assert!(frame.warp_to.is_some());
        assert_eq!(engine.until_next_deadline(start), Duration::from_millis(10));
    }

    #[test]
    fn test_until_next_deadline() {
        let config = OverlayConfig::default();
        let t0 = Instant::now();
        let (_tx, engine) = engine(&config, t0);
        assert_eq!(engine.until_next_deadline(t0), TICK);
        assert_eq!(engine.until_next_deadline(t0 + TICK), Duration::ZERO);
    }
}
