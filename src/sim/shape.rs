//! Draggable shapes and their falling/bouncing physics

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// The five shape kinds. Physics is identical; only drawn geometry differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    Star,
    Rectangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Star,
        ShapeKind::Rectangle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Star => "star",
            ShapeKind::Rectangle => "rectangle",
        }
    }

    /// Fill colour (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            ShapeKind::Circle => 0xFF1493,    // Hot pink
            ShapeKind::Square => 0x00BFFF,    // Electric blue
            ShapeKind::Triangle => 0xFFD700,  // Sunshine yellow
            ShapeKind::Star => 0x00FF7F,      // Lime green
            ShapeKind::Rectangle => 0x9370DB, // Vivid purple
        }
    }
}

/// A shape on the play field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Centre position (canvas pixels)
    pub pos: Vec2,
    pub size: f32,
    pub vel_y: f32,
    pub rotation: f32,
    /// Vertical squash (1 = none)
    pub squash: f32,
    /// Uniform scale (grows while held)
    pub scale: f32,
    pub is_dragging: bool,
    pub is_falling: bool,
    /// Matches the round's target (hint-eligible)
    pub is_correct: bool,
    /// Phase of the hint glow
    pub hint_pulse: f32,
    /// Floor line this shape lands on
    pub floor_y: f32,
}

impl Shape {
    pub fn new(kind: ShapeKind, pos: Vec2, floor_y: f32) -> Self {
        Self {
            kind,
            pos,
            size: SHAPE_SIZE,
            vel_y: 0.0,
            rotation: 0.0,
            squash: 1.0,
            scale: 1.0,
            is_dragging: false,
            is_falling: true,
            is_correct: false,
            hint_pulse: 0.0,
            floor_y,
        }
    }

    /// Point-in-box test against the padded touch target
    pub fn contains_point(&self, point: Vec2) -> bool {
        let half = (self.size + HIT_PADDING * 2.0) / 2.0;
        (point.x - self.pos.x).abs() <= half && (point.y - self.pos.y).abs() <= half
    }

    pub fn start_drag(&mut self) {
        self.is_dragging = true;
        self.is_falling = false;
        self.scale = DRAG_SCALE;
    }

    /// Follow the pointer directly; no integration while held
    pub fn drag_to(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Let go; falls again only if above the floor line
    pub fn drop(&mut self) {
        self.is_dragging = false;
        self.scale = 1.0;
        if self.pos.y < self.floor_y {
            self.is_falling = true;
        }
    }

    /// Move to a new floor line (after a resize)
    pub fn set_floor(&mut self, floor_y: f32) {
        self.floor_y = floor_y;
        if self.is_dragging {
            return;
        }
        if self.pos.y < floor_y {
            self.is_falling = true;
        } else if !self.is_falling {
            self.pos.y = floor_y;
        }
    }

    /// Advance one tick
    pub fn update(&mut self) {
        if self.is_correct {
            self.hint_pulse += 0.1;
        }

        if !self.is_falling {
            return;
        }

        self.vel_y += GRAVITY;
        self.pos.y += self.vel_y;
        self.rotation += FALL_SPIN;

        if self.pos.y >= self.floor_y {
            self.pos.y = self.floor_y;

            if self.vel_y.abs() > MIN_BOUNCE_VELOCITY {
                self.vel_y *= -BOUNCE_DAMPING;
                self.squash = BOUNCE_SQUASH;
            } else {
                // Settled
                self.is_falling = false;
                self.vel_y = 0.0;
                self.rotation = 0.0;
            }
        }

        if self.squash < 1.0 {
            self.squash = (self.squash + SQUASH_RECOVERY).min(1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn falling_shape() -> Shape {
        Shape::new(ShapeKind::Circle, Vec2::new(100.0, 0.0), 500.0)
    }

    #[test]
    fn test_velocity_increases_while_airborne() {
        let mut shape = falling_shape();
        let mut last_vel = shape.vel_y;
        // 0.5 * n(n+1)/2 < 500 until n = 44
        for _ in 0..40 {
            shape.update();
            assert!(shape.pos.y < shape.floor_y);
            assert!(shape.vel_y > last_vel);
            last_vel = shape.vel_y;
        }
    }

    #[test]
    fn test_bounce_inverts_and_damps() {
        let mut shape = falling_shape();
        shape.pos.y = 499.0;
        shape.vel_y = 10.0;
        shape.update();

        assert_eq!(shape.pos.y, 500.0);
        assert!((shape.vel_y - (-10.5 * 0.6)).abs() < 1e-4);
        assert!(shape.is_falling);
        // Squash set to 0.8, then recovers once in the same tick
        assert!((shape.squash - 0.85).abs() < 1e-4);
    }

    #[test]
    fn test_eventually_settles_and_stays_put() {
        let mut shape = falling_shape();
        for _ in 0..1000 {
            shape.update();
        }
        assert!(!shape.is_falling);
        assert_eq!(shape.pos.y, shape.floor_y);
        assert_eq!(shape.vel_y, 0.0);
        assert_eq!(shape.rotation, 0.0);

        let (pos, rotation) = (shape.pos, shape.rotation);
        for _ in 0..10 {
            shape.update();
            assert_eq!(shape.pos, pos);
            assert_eq!(shape.rotation, rotation);
        }
    }

    #[test]
    fn test_slow_contact_settles_without_bounce() {
        let mut shape = falling_shape();
        shape.pos.y = 500.0;
        shape.vel_y = -0.5;
        shape.update();
        // -0.5 + 0.5 = 0 -> below the bounce threshold
        assert!(!shape.is_falling);
        assert_eq!(shape.vel_y, 0.0);
    }

    #[test]
    fn test_drag_suspends_physics() {
        let mut shape = falling_shape();
        shape.start_drag();
        assert!(shape.is_dragging);
        assert!(!shape.is_falling);
        assert_eq!(shape.scale, DRAG_SCALE);

        shape.drag_to(Vec2::new(300.0, 200.0));
        shape.update();
        assert_eq!(shape.pos, Vec2::new(300.0, 200.0));
        assert_eq!(shape.vel_y, 0.0);
    }

    #[test]
    fn test_drop_above_floor_resumes_falling() {
        let mut shape = falling_shape();
        shape.start_drag();
        shape.drag_to(Vec2::new(300.0, 200.0));
        shape.drop();
        assert!(!shape.is_dragging);
        assert!(shape.is_falling);
        assert_eq!(shape.scale, 1.0);
    }

    #[test]
    fn test_drop_below_floor_stays_settled() {
        let mut shape = falling_shape();
        shape.start_drag();
        shape.drag_to(Vec2::new(300.0, 550.0));
        shape.drop();
        assert!(!shape.is_falling);

        shape.update();
        assert_eq!(shape.pos, Vec2::new(300.0, 550.0));
    }

    #[test]
    fn test_hit_box_includes_padding() {
        let shape = Shape::new(ShapeKind::Square, Vec2::new(100.0, 100.0), 500.0);
        // half extent = (60 + 50) / 2 = 55
        assert!(shape.contains_point(Vec2::new(155.0, 100.0)));
        assert!(shape.contains_point(Vec2::new(45.0, 45.0)));
        assert!(!shape.contains_point(Vec2::new(156.0, 100.0)));
        assert!(!shape.contains_point(Vec2::new(100.0, 44.0)));
    }

    #[test]
    fn test_hint_pulse_only_for_correct_shapes() {
        let mut plain = falling_shape();
        let mut correct = falling_shape();
        correct.is_correct = true;
        plain.update();
        correct.update();
        assert_eq!(plain.hint_pulse, 0.0);
        assert!(correct.hint_pulse > 0.0);
    }

    #[test]
    fn test_set_floor_lifts_settled_shape_into_fall() {
        let mut shape = falling_shape();
        shape.is_falling = false;
        shape.pos.y = 500.0;
        shape.set_floor(600.0);
        assert!(shape.is_falling);

        let mut shape = falling_shape();
        shape.is_falling = false;
        shape.pos.y = 500.0;
        shape.set_floor(400.0);
        assert_eq!(shape.pos.y, 400.0);
    }
}
