//! Streak painting
//!
//! egui has no radial gradient brush, so each streak is a triangle fan:
//! one center vertex and a ring of rim vertices. Vertex colours are
//! interpolated linearly across each triangle, which along any ray from
//! the center is exactly a linear radial gradient.

use egui::epaint::{Mesh, Shape};
use egui::{Color32, Painter, Pos2};

use crate::config::OverlayConfig;
use crate::geometry::Position;

/// Rim vertices per streak
const FAN_SEGMENTS: u32 = 48;

/// How a streak looks at full opacity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreakStyle {
    /// Radius of the painted disc in points
    pub radius: f32,
    /// Distance over which alpha runs from `center_alpha` to `edge_alpha`
    pub gradient_radius: f32,
    pub center_alpha: u8,
    pub edge_alpha: u8,
}

impl Default for StreakStyle {
    fn default() -> Self {
        Self::from_config(&OverlayConfig::default())
    }
}

impl StreakStyle {
    pub fn from_config(config: &OverlayConfig) -> Self {
        Self {
            radius: config.streak_radius,
            gradient_radius: config.gradient_radius,
            center_alpha: config.center_alpha,
            edge_alpha: config.edge_alpha,
        }
    }

    /// Alpha at `distance` points from the center, scaled by `opacity`.
    pub fn alpha_at(&self, distance: f32, opacity: f32) -> u8 {
        let t = (distance / self.gradient_radius).clamp(0.0, 1.0);
        let base = lerp(self.center_alpha as f32, self.edge_alpha as f32, t);
        (base * opacity.clamp(0.0, 1.0)).round() as u8
    }

    /// Build the fan mesh for one streak centered at `center` (points).
    pub fn mesh(&self, center: Pos2, opacity: f32) -> Mesh {
        let mut mesh = Mesh::default();
        mesh.colored_vertex(center, Color32::from_black_alpha(self.alpha_at(0.0, opacity)));

        let rim = Color32::from_black_alpha(self.alpha_at(self.radius, opacity));
        for i in 0..FAN_SEGMENTS {
            let angle = i as f32 / FAN_SEGMENTS as f32 * std::f32::consts::TAU;
            let pos = center + egui::vec2(angle.cos(), angle.sin()) * self.radius;
            mesh.colored_vertex(pos, rim);
        }
        for i in 0..FAN_SEGMENTS {
            let a = 1 + i;
            let b = 1 + (i + 1) % FAN_SEGMENTS;
            mesh.add_triangle(0, a, b);
        }
        mesh
    }
}

/// Paint every visible streak. Positions are physical pixels.
pub fn paint_streaks(
    painter: &Painter,
    style: &StreakStyle,
    pixels_per_point: f32,
    streaks: impl Iterator<Item = (Position, f32)>,
) {
    for (position, opacity) in streaks {
        if opacity <= 0.0 {
            continue;
        }
        let center = position.to_pos2(pixels_per_point);
        painter.add(Shape::mesh(style.mesh(center, opacity)));
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_gradient() {
        let style = StreakStyle::default();
        assert_eq!(style.alpha_at(0.0, 1.0), 255);
        assert_eq!(style.alpha_at(300.0, 1.0), 100);
        assert_eq!(style.alpha_at(1000.0, 1.0), 100);
        // Rim of the 200pt disc sits two thirds along the 300pt gradient
        assert_eq!(style.alpha_at(200.0, 1.0), 152);
    }

    #[test]
    fn test_alpha_scales_with_opacity() {
        let style = StreakStyle::default();
        assert_eq!(style.alpha_at(0.0, 0.5), 128);
        assert_eq!(style.alpha_at(0.0, 0.0), 0);
    }

    #[test]
    fn test_mesh_shape() {
        let style = StreakStyle::default();
        let mesh = style.mesh(egui::pos2(50.0, 50.0), 1.0);
        assert_eq!(mesh.vertices.len(), 1 + FAN_SEGMENTS as usize);
        assert_eq!(mesh.indices.len(), 3 * FAN_SEGMENTS as usize);
        assert!(mesh.is_valid());
        assert_eq!(mesh.vertices[0].pos, egui::pos2(50.0, 50.0));
        assert_eq!(mesh.vertices[0].color, Color32::from_black_alpha(255));
        for v in &mesh.vertices[1..] {
            assert!((v.pos.distance(egui::pos2(50.0, 50.0)) - 200.0).abs() < 0.01);
        }
    }
}
