//! Overlay configuration
//!
//! Read once at startup from `overlay.json` in the platform config
//! directory. A missing file means defaults; a broken one is an error.
//! The overlay never writes this file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Get the config directory for an app
pub fn config_dir(app_name: &str) -> PathBuf {
    directories::ProjectDirs::from("", "", app_name)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Tunables for the streak engine and the window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Render tick and queue drain interval in milliseconds
    pub tick_ms: u64,
    /// Streak lifetime in render ticks
    pub streak_lifetime: u32,
    /// Chance that a drained pointer sample becomes a streak (0.0-1.0)
    pub promote_probability: f64,
    /// Pointer samples held before the oldest is dropped
    pub queue_capacity: usize,
    /// Background listener polling interval in milliseconds
    pub listener_poll_ms: u64,
    /// Idle check interval in milliseconds
    pub idle_check_ms: u64,
    /// Consecutive unchanged idle checks before a burst
    pub idle_threshold: u32,
    /// Streaks created by one idle burst
    pub burst_size: usize,
    /// Shortest wait between cursor drags in milliseconds
    pub move_interval_min_ms: u64,
    /// Longest wait between cursor drags in milliseconds
    pub move_interval_max_ms: u64,
    /// Steps in one cursor drag
    pub drag_steps: u32,
    /// Delay between drag steps in milliseconds
    pub drag_step_ms: u64,
    /// Radius of the painted disc in points
    pub streak_radius: f32,
    /// Radius over which the gradient runs from center to edge alpha
    pub gradient_radius: f32,
    /// Alpha at the streak center before decay
    pub center_alpha: u8,
    /// Alpha at the gradient radius before decay
    pub edge_alpha: u8,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            streak_lifetime: 60,
            promote_probability: 0.3,
            queue_capacity: 4096,
            listener_poll_ms: 16,
            idle_check_ms: 1000,
            idle_threshold: 5,
            burst_size: 200,
            move_interval_min_ms: 15_000,
            move_interval_max_ms: 30_000,
            drag_steps: 80,
            drag_step_ms: 50,
            streak_radius: 200.0,
            gradient_radius: 300.0,
            center_alpha: 255,
            edge_alpha: 100,
        }
    }
}

impl OverlayConfig {
    pub fn config_path() -> PathBuf {
        config_dir("scotoma").join("overlay.json")
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));
        if self.tick_ms == 0 || self.idle_check_ms == 0 || self.listener_poll_ms == 0 {
            return invalid("intervals must be non-zero");
        }
        if self.streak_lifetime == 0 {
            return invalid("streak_lifetime must be at least one tick");
        }
        if !(0.0..=1.0).contains(&self.promote_probability) {
            return invalid("promote_probability must be within 0.0..=1.0");
        }
        if self.queue_capacity == 0 {
            return invalid("queue_capacity must be non-zero");
        }
        if self.idle_threshold == 0 {
            return invalid("idle_threshold must be non-zero");
        }
        if self.move_interval_min_ms > self.move_interval_max_ms {
            return invalid("move_interval_min_ms exceeds move_interval_max_ms");
        }
        if self.drag_steps == 0 {
            return invalid("drag_steps must be non-zero");
        }
        if self.streak_radius <= 0.0 || self.gradient_radius <= 0.0 {
            return invalid("radii must be positive");
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn idle_check_interval(&self) -> Duration {
        Duration::from_millis(self.idle_check_ms)
    }

    pub fn listener_poll_interval(&self) -> Duration {
        Duration::from_millis(self.listener_poll_ms)
    }

    pub fn drag_step_interval(&self) -> Duration {
        Duration::from_millis(self.drag_step_ms)
    }

    pub fn move_interval_range(&self) -> std::ops::RangeInclusive<Duration> {
        Duration::from_millis(self.move_interval_min_ms)..=Duration::from_millis(self.move_interval_max_ms)
    }
}
