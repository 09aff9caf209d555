//! The hungry monster: entry, breathing, blinking, eating and happy dance
//!
//! Frame-driven pieces (entry, happy timer, blink countdown) advance on
//! `update`. Wall-clock pieces (breathing, dance sinusoids, blink reopen)
//! read the `now_ms` timestamp the host passes in.

use glam::Vec2;
use rand::Rng;

use super::shape::ShapeKind;
use crate::consts::*;

/// Two-stop body gradient (0xRRGGBB)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTheme {
    pub start: u32,
    pub end: u32,
}

pub const COLOR_THEMES: [ColorTheme; 5] = [
    ColorTheme { start: 0xFF6B9D, end: 0xFF1493 }, // Pink
    ColorTheme { start: 0x00D4FF, end: 0x00BFFF }, // Cyan
    ColorTheme { start: 0xFFD700, end: 0xFFA500 }, // Gold
    ColorTheme { start: 0x00FF7F, end: 0x00CED1 }, // Teal
    ColorTheme { start: 0x9370DB, end: 0x8A2BE2 }, // Purple
];

/// Entry progress gained per update
pub const ENTRY_STEP: f32 = 0.04;
/// Maximum pupil displacement (px)
pub const MAX_EYE_OFFSET: f32 = 6.0;
/// How long the eyes stay shut (ms)
pub const BLINK_DURATION_MS: f64 = 200.0;
pub const ARM_REST_ANGLE: f32 = 0.3;

/// Blink cycle state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Blink {
    /// Eyes open; closes when the countdown reaches zero
    Open { remaining_ms: f32 },
    /// Eyes shut until the wall-clock deadline
    Closed { reopen_at_ms: f64 },
}

/// Coarse animation state, for drawing and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterMood {
    Entering,
    Idle,
    Eating,
    Happy,
}

#[derive(Debug, Clone)]
pub struct Monster {
    /// Resting top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub target: ShapeKind,
    pub theme: ColorTheme,

    pub entry_progress: f32,
    pub eye_offset: Vec2,
    pub blink: Blink,
    pub eating: bool,
    /// Remaining happy time (ms); happy while > 0
    pub happy_ms: f32,

    pub breathe_offset: f32,
    pub bounce_offset: f32,
    pub scale: f32,
    pub rotation: f32,
    pub left_arm: f32,
    pub right_arm: f32,
}

impl Monster {
    pub fn new(pos: Vec2, target: ShapeKind, rng: &mut impl Rng) -> Self {
        let theme = COLOR_THEMES[rng.random_range(0..COLOR_THEMES.len())];
        Self {
            pos,
            width: MONSTER_SIZE,
            height: MONSTER_SIZE,
            target,
            theme,
            entry_progress: 0.0,
            eye_offset: Vec2::ZERO,
            blink: Blink::Open {
                remaining_ms: rng.random_range(2000.0..5000.0),
            },
            eating: false,
            happy_ms: 0.0,
            breathe_offset: 0.0,
            bounce_offset: 0.0,
            scale: 1.0,
            rotation: 0.0,
            left_arm: -ARM_REST_ANGLE,
            right_arm: ARM_REST_ANGLE,
        }
    }

    pub fn is_entering(&self) -> bool {
        self.entry_progress < 1.0
    }

    pub fn is_happy(&self) -> bool {
        self.happy_ms > 0.0
    }

    pub fn is_blinking(&self) -> bool {
        matches!(self.blink, Blink::Closed { .. })
    }

    pub fn mood(&self) -> MonsterMood {
        if self.is_happy() {
            MonsterMood::Happy
        } else if self.eating {
            MonsterMood::Eating
        } else if self.is_entering() {
            MonsterMood::Entering
        } else {
            MonsterMood::Idle
        }
    }

    /// Body centre at rest
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Drop target for shapes
    pub fn mouth(&self) -> Vec2 {
        self.center() + Vec2::new(0.0, self.height * MOUTH_OFFSET_FRACTION)
    }

    /// Where to draw the body centre this frame (entry slide plus offsets)
    pub fn draw_center(&self) -> Vec2 {
        let top = if self.is_entering() {
            let start = -self.height - 100.0;
            start + self.entry_progress * (self.pos.y - start)
        } else {
            self.pos.y
        };
        Vec2::new(
            self.pos.x + self.width / 2.0,
            top + self.height / 2.0 + self.bounce_offset + self.breathe_offset,
        )
    }

    /// Point the pupils toward `target`, clamped near the socket
    pub fn look_at(&mut self, target: Vec2) {
        let delta = target - self.center();
        let distance = delta.length();
        self.eye_offset = if distance > 0.0 {
            delta / distance * MAX_EYE_OFFSET.min(distance / 10.0)
        } else {
            Vec2::ZERO
        };
    }

    pub fn reset_eyes(&mut self) {
        self.eye_offset = Vec2::ZERO;
    }

    /// One-shot chomp; cleared by `start_happy`
    pub fn start_eating(&mut self) {
        self.eating = true;
    }

    /// Celebrate for the length of the round transition
    pub fn start_happy(&mut self) {
        self.eating = false;
        self.happy_ms = TRANSITION_DELAY_MS as f32;
    }

    pub fn update(&mut self, delta_ms: f32, now_ms: f64, rng: &mut impl Rng) {
        if self.is_entering() {
            self.entry_progress = (self.entry_progress + ENTRY_STEP).min(1.0);
        }

        if !self.is_happy() && !self.is_entering() {
            self.breathe_offset = (now_ms / 1000.0).sin() as f32 * 5.0;
        }

        if self.is_happy() {
            self.happy_ms -= delta_ms;
            if self.happy_ms <= 0.0 {
                self.happy_ms = 0.0;
            }
        }

        if self.is_happy() {
            self.bounce_offset = (now_ms / 100.0).sin() as f32 * 15.0;
            self.scale = 1.0 + (now_ms / 150.0).sin() as f32 * 0.08;
            self.rotation = (now_ms / 200.0).sin() as f32 * 0.1;
            let wave = (now_ms / 100.0).sin() as f32 * 0.5;
            self.left_arm = -ARM_REST_ANGLE + wave;
            self.right_arm = ARM_REST_ANGLE - wave;
        } else {
            self.bounce_offset = 0.0;
            self.scale = 1.0;
            self.rotation = 0.0;
            self.left_arm = -ARM_REST_ANGLE;
            self.right_arm = ARM_REST_ANGLE;
        }

        self.update_blink(delta_ms, now_ms, rng);
    }

    fn update_blink(&mut self, delta_ms: f32, now_ms: f64, rng: &mut impl Rng) {
        self.blink = match self.blink {
            Blink::Open { remaining_ms } => {
                let remaining_ms = remaining_ms - delta_ms;
                if remaining_ms <= 0.0 {
                    Blink::Closed {
                        reopen_at_ms: now_ms + BLINK_DURATION_MS,
                    }
                } else {
                    Blink::Open { remaining_ms }
                }
            }
            Blink::Closed { reopen_at_ms } if now_ms >= reopen_at_ms => Blink::Open {
                remaining_ms: rng.random_range(2000.0..6000.0),
            },
            closed => closed,
        };
    }
}
