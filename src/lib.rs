//! Shape Muncher - feed the hungry monster the shape it is made of
//!
//! Core modules:
//! - `sim`: Simulation (state machine, shape physics, monster animation, particles)
//! - `renderer`: Draw-call boundary and per-kind geometry (Canvas 2D on web)
//! - `audio`: Sound cue sink (Web Audio tones on web)
//! - `ui`: HUD sink and event dispatch
//! - `layout`: Canvas layout and debounced resize
//! - `settings`: Persisted player preferences

pub mod audio;
pub mod error;
pub mod layout;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod ui;

pub use error::{InitError, RenderError};
pub use layout::Layout;
pub use settings::Settings;
pub use sim::GameController;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Downward acceleration applied to falling shapes (px/tick²)
    pub const GRAVITY: f32 = 0.5;
    /// Velocity multiplier magnitude on each floor bounce
    pub const BOUNCE_DAMPING: f32 = 0.6;
    /// Below this speed a shape settles instead of bouncing
    pub const MIN_BOUNCE_VELOCITY: f32 = 0.5;
    /// Cosmetic spin while falling (radians/tick)
    pub const FALL_SPIN: f32 = 0.02;
    /// Squash applied on a bounce, recovered by `SQUASH_RECOVERY` per tick
    pub const BOUNCE_SQUASH: f32 = 0.8;
    pub const SQUASH_RECOVERY: f32 = 0.05;

    /// Scale of a shape while held
    pub const DRAG_SCALE: f32 = 1.2;
    /// Extra touch margin on every side of a shape's box
    pub const HIT_PADDING: f32 = 25.0;

    /// Shape edge length (keeps touch targets above 44px)
    pub const SHAPE_SIZE: f32 = 60.0;
    /// Horizontal gap between neighbouring shapes
    pub const SHAPE_GAP: f32 = 40.0;
    /// Shapes start here, just above the visible area
    pub const SHAPE_SPAWN_Y: f32 = -SHAPE_SIZE;
    /// Inclusive range of shapes per round
    pub const MIN_SHAPES_PER_ROUND: usize = 6;
    pub const MAX_SHAPES_PER_ROUND: usize = 8;

    /// Height of the grass band at the bottom of the canvas
    pub const FLOOR_HEIGHT: f32 = 200.0;
    /// Monster resting top edge as a fraction of canvas height
    pub const MONSTER_Y_FRACTION: f32 = 0.2;
    pub const MONSTER_SIZE: f32 = 200.0;
    /// Mouth sits this fraction of monster height below its centre
    pub const MOUTH_OFFSET_FRACTION: f32 = 0.2;

    /// A drop succeeds when closer than this to the mouth
    pub const COLLISION_THRESHOLD: f32 = 50.0;

    /// Confetti per success and pool capacity
    pub const CONFETTI_PER_SUCCESS: usize = 60;
    pub const PARTICLE_POOL_SIZE: usize = 100;
    /// Confetti spin is uniform in +/- this (rad per tick)
    pub const CONFETTI_MAX_SPIN: f32 = 0.1;
    pub const PARTICLE_MAX_LIFE: f32 = 100.0;
    pub const PARTICLE_LIFE_DECAY: f32 = 1.5;
    pub const PARTICLE_GRAVITY: f32 = GRAVITY * 0.5;
    pub const PARTICLE_AIR_RESISTANCE: f32 = 0.98;

    /// Points per eaten shape
    pub const POINTS_PER_SUCCESS: u32 = 10;
    /// "Round clear" pause before the next round (ms)
    pub const TRANSITION_DELAY_MS: f64 = 1500.0;
    /// Eating pulse before the monster turns happy (ms)
    pub const EATING_DURATION_MS: f64 = 300.0;
    /// Idle time before correct shapes start glowing (ms)
    pub const HINT_DELAY_MS: f32 = 8000.0;

    /// Success flash decay per frame, snapped to zero below the cutoff
    pub const FLASH_DECAY: f32 = 0.92;
    pub const FLASH_CUTOFF: f32 = 0.01;

    /// Quiet period before a resize is applied (ms)
    pub const RESIZE_DEBOUNCE_MS: f64 = 150.0;
}

/// Convert a client-space pointer position into canvas-local coordinates.
///
/// Mouse and touch input both go through here so the sim only ever sees
/// canvas pixels.
#[inline]
pub fn to_canvas_coords(client_x: f32, client_y: f32, rect_left: f32, rect_top: f32) -> Vec2 {
    Vec2::new(client_x - rect_left, client_y - rect_top)
}

/// Format a packed 0xRRGGBB colour as a CSS hex string
pub fn css_color(rgb: u32) -> String {
    format!("#{:06X}", rgb & 0x00FF_FFFF)
}

/// Shift each channel of a packed colour by `amount` (clamped per channel)
pub fn shade(rgb: u32, amount: i32) -> u32 {
    let channel = |shift: u32| {
        let c = ((rgb >> shift) & 0xFF) as i32;
        ((c + amount).clamp(0, 255) as u32) << shift
    };
    channel(16) | channel(8) | channel(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_coords_subtract_rect_origin() {
        let p = to_canvas_coords(150.0, 90.0, 50.0, 40.0);
        assert_eq!(p, Vec2::new(100.0, 50.0));
    }

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(0xFF1493), "#FF1493");
        assert_eq!(css_color(0x0000FF), "#0000FF");
    }

    #[test]
    fn test_shade_clamps_channels() {
        assert_eq!(shade(0xF0F0F0, 40), 0xFFFFFF);
        assert_eq!(shade(0x101010, -40), 0x000000);
        assert_eq!(shade(0x102030, 16), 0x203040);
    }
}
