//! Round generation

use glam::Vec2;
use rand::Rng;

use super::shape::{Shape, ShapeKind};
use crate::consts::*;

/// Uniformly random shape kind
pub fn random_kind(rng: &mut impl Rng) -> ShapeKind {
    ShapeKind::ALL[rng.random_range(0..ShapeKind::ALL.len())]
}

/// Build the shapes for one round.
///
/// The target kind is always present at least once. The rest are random and
/// may repeat the target, in which case every matching shape is marked
/// correct.
pub fn generate_round(
    target: ShapeKind,
    canvas_width: f32,
    floor_y: f32,
    rng: &mut impl Rng,
) -> Vec<Shape> {
    let count = rng.random_range(MIN_SHAPES_PER_ROUND..=MAX_SHAPES_PER_ROUND);

    let mut kinds = Vec::with_capacity(count);
    kinds.push(target);
    for _ in 1..count {
        kinds.push(random_kind(rng));
    }

    // Fisher-Yates
    for i in (1..kinds.len()).rev() {
        let j = rng.random_range(0..=i);
        kinds.swap(i, j);
    }

    let spacing = SHAPE_SIZE + SHAPE_GAP;
    let total_width = count as f32 * spacing;
    let start_x = (canvas_width - total_width) / 2.0 + spacing / 2.0;

    kinds
        .into_iter()
        .enumerate()
        .map(|(i, kind)| {
            let pos = Vec2::new(start_x + i as f32 * spacing, SHAPE_SPAWN_Y);
            let mut shape = Shape::new(kind, pos, floor_y);
            shape.is_correct = kind == target;
            shape
        })
        .collect()
}
