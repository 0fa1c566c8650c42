//! Streak accumulator
//!
//! A streak is a fading paint blob left behind by the pointer. Each render
//! tick ages every streak by one; a streak lives for `lifetime` ticks and
//! its opacity decays linearly to zero over that span.

use rand::Rng;

use crate::geometry::{Position, ScreenSize};

/// One paint blob
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Streak {
    /// Center in physical pixels
    pub position: Position,
    /// Render ticks since creation
    pub age: u32,
}

impl Streak {
    pub fn new(position: Position) -> Self {
        Self { position, age: 0 }
    }
}

/// Linear decay: 1.0 at age 0, 0.0 at `lifetime` and beyond.
pub fn opacity(age: u32, lifetime: u32) -> f32 {
    if lifetime == 0 {
        return 0.0;
    }
    (1.0 - age as f32 / lifetime as f32).max(0.0)
}

/// All live streaks
#[derive(Debug)]
pub struct StreakField {
    streaks: Vec<Streak>,
    lifetime: u32,
}

impl StreakField {
    pub fn new(lifetime: u32) -> Self {
        Self {
            streaks: Vec::new(),
            lifetime,
        }
    }

    pub fn add(&mut self, position: Position) {
        self.streaks.push(Streak::new(position));
    }

    /// Scatter `count` fresh streaks uniformly over the screen.
    pub fn burst(&mut self, count: usize, screen: ScreenSize, rng: &mut impl Rng) {
        if screen.width == 0 || screen.height == 0 {
            return;
        }
        self.streaks.reserve(count);
        for _ in 0..count {
            let x = rng.gen_range(0..screen.width) as i32;
            let y = rng.gen_range(0..screen.height) as i32;
            self.add(Position::new(x, y));
        }
    }

    /// Advance one render tick: purge expired streaks, then age the rest.
    pub fn tick(&mut self) {
        let lifetime = self.lifetime;
        self.streaks.retain(|s| s.age < lifetime);
        for streak in &mut self.streaks {
            streak.age += 1;
        }
    }

    /// Streaks that should be drawn, with their current opacity.
    pub fn visible(&self) -> impl Iterator<Item = (Position, f32)> + '_ {
        let lifetime = self.lifetime;
        self.streaks
            .iter()
            .filter(move |s| s.age < lifetime)
            .map(move |s| (s.position, opacity(s.age, lifetime)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Streak> {
        self.streaks.iter()
    }

    pub fn len(&self) -> usize {
        self.streaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streaks.is_empty()
    }

    /// Count of streaks with non-zero opacity
    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }
}
