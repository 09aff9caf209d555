//! Game simulation
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! hosts pass in wall-clock timestamps and canvas-local pointer positions,
//! and read back state and drained events.
//! - Seeded RNG only
//! - Physics advances per frame tick; timers read the supplied clock

pub mod collision;
pub mod input;
pub mod monster;
pub mod particle;
pub mod round;
pub mod schedule;
pub mod shape;
pub mod state;
pub mod tick;

pub use collision::{DropResult, check_drop, check_drop_at};
pub use monster::{Blink, COLOR_THEMES, ColorTheme, Monster, MonsterMood};
pub use particle::{Particle, ParticlePool};
pub use round::{generate_round, random_kind};
pub use schedule::{Deferred, Scheduler};
pub use shape::{Shape, ShapeKind};
pub use state::{
    ENCOURAGEMENTS, GameController, GameEvent, GameState, HudSnapshot, Session, SoundCue,
};
