//! Screen-space value types.
//!
//! Everything in the engine is in physical pixels of the primary screen,
//! origin top-left. Conversion to egui points happens only when painting or
//! warping the cursor.
//!
//! `device_query` reports physical pixels on Windows and X11 but points on
//! macOS, so pointer coordinates pass through [`device_to_physical`] first.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Whether the pointer backend on this platform reports logical points.
pub const DEVICE_REPORTS_POINTS: bool = cfg!(target_os = "macos");

/// A pointer coordinate or streak center in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Convert to egui points for a display with the given scale factor.
    pub fn to_pos2(self, pixels_per_point: f32) -> egui::Pos2 {
        egui::pos2(
            self.x as f32 / pixels_per_point,
            self.y as f32 / pixels_per_point,
        )
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Size of the primary screen in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Screen size from an egui monitor size in points.
    pub fn from_points(size: egui::Vec2, pixels_per_point: f32) -> Self {
        Self {
            width: (size.x * pixels_per_point).round().max(1.0) as u32,
            height: (size.y * pixels_per_point).round().max(1.0) as u32,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }
}

/// Native pixels per point of the primary screen, shared between the UI
/// thread (writer) and pointer sources on other threads (readers).
#[derive(Debug, Clone)]
pub struct DisplayScale(Arc<AtomicU32>);

impl DisplayScale {
    pub fn new(pixels_per_point: f32) -> Self {
        Self(Arc::new(AtomicU32::new(pixels_per_point.to_bits())))
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Non-positive or non-finite scales are ignored.
    pub fn set(&self, pixels_per_point: f32) {
        if pixels_per_point.is_finite() && pixels_per_point > 0.0 {
            self.0.store(pixels_per_point.to_bits(), Ordering::Relaxed);
        }
    }
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Convert raw backend coordinates to physical pixels. `reports_points` is
/// [`DEVICE_REPORTS_POINTS`] outside tests.
pub fn device_to_physical(coords: (i32, i32), pixels_per_point: f32, reports_points: bool) -> Position {
    if !reports_points {
        return coords.into();
    }
    Position::new(
        (coords.0 as f32 * pixels_per_point).round() as i32,
        (coords.1 as f32 * pixels_per_point).round() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_backend_scaled_to_pixels() {
        let p = device_to_physical((720, 450), 2.0, true);
        assert_eq!(p, Position::new(1440, 900));
        // Painting divides back out, landing on the pointer again
        assert_eq!(p.to_pos2(2.0), egui::pos2(720.0, 450.0));
    }

    #[test]
    fn test_pixel_backend_unchanged() {
        assert_eq!(device_to_physical((1440, 900), 2.0, false), Position::new(1440, 900));
    }

    #[test]
    fn test_fractional_scale_rounds() {
        assert_eq!(device_to_physical((101, 3), 1.5, true), Position::new(152, 5));
    }

    #[test]
    fn test_display_scale_shared() {
        let scale = DisplayScale::default();
        let reader = scale.clone();
        scale.set(2.0);
        assert_eq!(reader.get(), 2.0);
        scale.set(0.0);
        scale.set(f32::NAN);
        assert_eq!(reader.get(), 2.0);
    }

    #[test]
    fn test_to_pos2_scales() {
        let p = Position::new(200, 100).to_pos2(2.0);
        assert_eq!(p, egui::pos2(100.0, 50.0));
    }

    #[test]
    fn test_from_points() {
        let s = ScreenSize::from_points(egui::vec2(960.0, 540.0), 2.0);
        assert_eq!(s, ScreenSize::new(1920, 1080));
    }

    #[test]
    fn test_contains() {
        let s = ScreenSize::new(800, 600);
        assert!(s.contains(Position::new(0, 0)));
        assert!(s.contains(Position::new(799, 599)));
        assert!(!s.contains(Position::new(800, 10)));
        assert!(!s.contains(Position::new(-1, 10)));
    }
}
