//! Outline geometry for the five shape kinds
//!
//! Outlines are centred on the origin; the renderer applies position,
//! rotation, scale and squash.

use glam::Vec2;
use std::f32::consts::PI;

use crate::sim::ShapeKind;

/// Closed outline of a shape, in local coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    Circle { radius: f32 },
    Polygon(Vec<Vec2>),
}

/// Star points
const STAR_SPIKES: usize = 5;
/// Inner radius as a fraction of the outer radius
const STAR_INNER_RATIO: f32 = 0.5;
/// Rectangle height as a fraction of its width
const RECT_ASPECT: f32 = 0.6;

impl ShapeKind {
    /// Outline for a shape of the given nominal size
    pub fn outline(&self, size: f32) -> Outline {
        let half = size / 2.0;
        match self {
            ShapeKind::Circle => Outline::Circle { radius: half },
            ShapeKind::Square => Outline::Polygon(rect(size, size)),
            ShapeKind::Triangle => Outline::Polygon(vec![
                Vec2::new(0.0, -half),
                Vec2::new(-half, half),
                Vec2::new(half, half),
            ]),
            ShapeKind::Star => Outline::Polygon(star(half, half * STAR_INNER_RATIO)),
            ShapeKind::Rectangle => Outline::Polygon(rect(size, size * RECT_ASPECT)),
        }
    }
}

/// Axis-aligned rectangle, clockwise from top-left
fn rect(width: f32, height: f32) -> Vec<Vec2> {
    let (hw, hh) = (width / 2.0, height / 2.0);
    vec![
        Vec2::new(-hw, -hh),
        Vec2::new(hw, -hh),
        Vec2::new(hw, hh),
        Vec2::new(-hw, hh),
    ]
}

/// Alternating outer/inner vertices, starting straight up
fn star(outer: f32, inner: f32) -> Vec<Vec2> {
    let step = PI / STAR_SPIKES as f32;
    let start = PI * 1.5;
    (0..STAR_SPIKES * 2)
        .map(|i| {
            let angle = start + i as f32 * step;
            let r = if i % 2 == 0 { outer } else { inner };
            Vec2::new(angle.cos() * r, angle.sin() * r)
        })
        .collect()
}
