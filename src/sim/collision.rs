//! Drop test between a released shape and the monster's mouth
//!
//! Evaluated once at release. There is no swept collision: only the kind
//! and the final distance to the mouth matter.

use glam::Vec2;

use super::monster::Monster;
use super::shape::{Shape, ShapeKind};
use crate::consts::COLLISION_THRESHOLD;

/// Result of a drop check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropResult {
    /// Shape kind equals the monster's target
    pub kind_matches: bool,
    /// Distance from the shape centre to the mouth
    pub distance: f32,
}

impl DropResult {
    /// Fed: right kind and strictly inside the threshold
    pub fn is_success(&self) -> bool {
        self.kind_matches && self.distance < COLLISION_THRESHOLD
    }
}

/// Check a kind/position pair against a mouth position
pub fn check_drop_at(kind: ShapeKind, pos: Vec2, target: ShapeKind, mouth: Vec2) -> DropResult {
    DropResult {
        kind_matches: kind == target,
        distance: pos.distance(mouth),
    }
}

/// Check a shape released on the monster
pub fn check_drop(shape: &Shape, monster: &Monster) -> DropResult {
    check_drop_at(shape.kind, shape.pos, monster.target, monster.mouth())
}
