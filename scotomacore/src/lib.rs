//! scotomacore — the streak engine behind the scotoma overlay

pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod idle;
pub mod listener;
pub mod paint;
pub mod repaint;
pub mod sampler;
pub mod streak;
pub mod timer;

pub use config::OverlayConfig;
pub use engine::{Engine, Frame};
pub use error::{Error, Result};
pub use geometry::{Position, ScreenSize};
pub use repaint::RepaintController;
