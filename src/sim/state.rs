//! Game controller: session, top-level state machine and round lifecycle
//!
//! The controller is the one owner of all simulation state. Hosts drive it
//! with `frame`, pointer calls and menu commands, then drain `GameEvent`s for
//! audio and HUD.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::monster::Monster;
use super::particle::ParticlePool;
use super::round::{generate_round, random_kind};
use super::schedule::{Deferred, Scheduler};
use super::shape::{Shape, ShapeKind};
use crate::consts::*;
use crate::layout::Layout;
use crate::settings::Settings;

/// Top-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    /// Host setup still running
    Loading,
    /// Waiting for the start button
    StartScreen,
    /// Shapes can be dragged
    Playing,
    /// Round cleared, next round pending
    Transitioning,
    /// Frozen by the player
    Paused,
}

impl GameState {
    /// Whether entities advance this frame
    pub fn is_simulating(&self) -> bool {
        matches!(self, GameState::Playing | GameState::Transitioning)
    }
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub score: u32,
    pub rounds_completed: u32,
    pub streak: u32,
}

/// Discrete sound cues for the audio sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Pickup,
    Drop,
    Chomp,
    Success,
    ButtonClick,
}

/// Values shown on the scoreboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudSnapshot {
    pub score: u32,
    pub rounds: u32,
    pub streak: u32,
}

impl From<Session> for HudSnapshot {
    fn from(s: Session) -> Self {
        Self {
            score: s.score,
            rounds: s.rounds_completed,
            streak: s.streak,
        }
    }
}

/// Outbound notifications, drained by the host once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundCue),
    Hud(HudSnapshot),
    /// Short cheer shown on every successful feed
    Encouragement(&'static str),
    PauseChanged(bool),
    MuteChanged(bool),
    StateChanged(GameState),
}

pub const ENCOURAGEMENTS: [&str; 6] = [
    "Great job!",
    "You did it!",
    "Awesome!",
    "Yay!",
    "Perfect!",
    "Amazing!",
];

const CONFETTI_COLORS: [u32; 6] = [0xFF1493, 0x00BFFF, 0xFFD700, 0x00FF7F, 0x9370DB, 0xFF6B9D];

pub struct GameController {
    pub(super) state: GameState,
    /// State to return to on resume
    pub(super) paused_from: Option<GameState>,
    pub(super) session: Session,
    pub(super) layout: Layout,
    pub(super) monster: Option<Monster>,
    pub(super) shapes: Vec<Shape>,
    /// Index into `shapes` of the held shape
    pub(super) dragged: Option<usize>,
    pub(super) particles: ParticlePool,
    pub(super) scheduler: Scheduler,
    pub(super) rng: Pcg32,
    pub(super) events: Vec<GameEvent>,
    pub(super) last_frame_ms: Option<f64>,
    pub(super) success_flash: f32,
    pub(super) hint_ms: f32,
    pub(super) muted: bool,
    pub(super) flash_enabled: bool,
    pub(super) confetti_enabled: bool,
}

impl GameController {
    /// Create a controller in `Loading` with a warmed particle pool
    pub fn new(layout: Layout, seed: u64) -> Self {
        Self {
            state: GameState::Loading,
            paused_from: None,
            session: Session::default(),
            layout,
            monster: None,
            shapes: Vec::new(),
            dragged: None,
            particles: ParticlePool::new(PARTICLE_POOL_SIZE),
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            last_frame_ms: None,
            success_flash: 0.0,
            hint_ms: 0.0,
            muted: false,
            flash_enabled: true,
            confetti_enabled: true,
        }
    }

    // === Accessors ===

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn monster(&self) -> Option<&Monster> {
        self.monster.as_ref()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn dragged_shape(&self) -> Option<&Shape> {
        self.dragged.and_then(|i| self.shapes.get(i))
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.particles
    }

    pub fn success_flash(&self) -> f32 {
        self.success_flash
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Correct shapes glow once the player has been idle long enough
    pub fn hints_visible(&self) -> bool {
        self.state == GameState::Playing && self.hint_ms >= HINT_DELAY_MS
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    // === Commands ===

    /// Apply persisted preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.muted = settings.muted;
        self.flash_enabled = settings.effective_flash();
        self.confetti_enabled = settings.particles;
        self.events.push(GameEvent::MuteChanged(self.muted));
    }

    /// Host setup finished
    pub fn finish_loading(&mut self) {
        if self.state == GameState::Loading {
            self.set_state(GameState::StartScreen);
        } else {
            log::warn!("finish_loading called in {:?}", self.state);
        }
    }

    /// Start button on the start screen
    pub fn start_game(&mut self) {
        if self.state != GameState::StartScreen {
            log::warn!("start_game ignored in {:?}", self.state);
            return;
        }
        self.emit_sound(SoundCue::ButtonClick);
        self.reset_session();
    }

    /// Restart from any state once loaded
    pub fn restart(&mut self) {
        if self.state == GameState::Loading {
            log::warn!("restart ignored while loading");
            return;
        }
        self.emit_sound(SoundCue::ButtonClick);
        if self.state == GameState::Paused {
            self.events.push(GameEvent::PauseChanged(false));
        }
        self.reset_session();
    }

    /// Freeze the game. Cancels the pending round advance.
    pub fn pause(&mut self) {
        if !self.state.is_simulating() {
            return;
        }
        self.release_drag_in_place();
        self.paused_from = Some(self.state);
        self.scheduler.invalidate();
        self.set_state(GameState::Paused);
        self.events.push(GameEvent::PauseChanged(true));
        self.emit_sound(SoundCue::ButtonClick);
    }

    /// Unfreeze. A pause taken during the round-clear window resumes into it
    /// with a fresh advance delay.
    pub fn resume(&mut self, now_ms: f64) {
        if self.state != GameState::Paused {
            return;
        }
        let resume_to = self.paused_from.take().unwrap_or(GameState::Playing);
        if resume_to == GameState::Transitioning {
            // The chomp was cut short; finish it before the round moves on
            if self.monster.as_ref().is_some_and(|m| m.eating) {
                self.scheduler
                    .schedule(now_ms, EATING_DURATION_MS, Deferred::FinishEating);
            }
            self.scheduler
                .schedule(now_ms, TRANSITION_DELAY_MS, Deferred::AdvanceRound);
        }
        self.set_state(resume_to);
        self.events.push(GameEvent::PauseChanged(false));
        self.emit_sound(SoundCue::ButtonClick);
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.events.push(GameEvent::MuteChanged(self.muted));
        self.emit_sound(SoundCue::ButtonClick);
        self.muted
    }

    /// Apply a new canvas size
    pub fn resize(&mut self, layout: Layout) {
        let old_anchor = self.layout.monster_anchor();
        self.layout = layout;
        for shape in &mut self.shapes {
            shape.set_floor(layout.floor_y);
        }
        if let Some(monster) = self.monster.as_mut() {
            monster.pos += layout.monster_anchor() - old_anchor;
        }
        log::debug!("Layout {}x{}, floor {}", layout.width, layout.height, layout.floor_y);
    }

    // === Round lifecycle ===

    fn reset_session(&mut self) {
        self.session = Session::default();
        self.paused_from = None;
        self.scheduler.invalidate();
        self.particles.clear();
        self.success_flash = 0.0;
        self.emit_hud();
        self.start_new_round();
    }

    /// Begin the next round with a random target
    pub(super) fn start_new_round(&mut self) {
        let target = random_kind(&mut self.rng);
        self.start_round(target);
    }

    pub(super) fn start_round(&mut self, target: ShapeKind) {
        self.session.rounds_completed += 1;
        self.hint_ms = 0.0;
        self.scheduler.invalidate();

        self.monster = Some(Monster::new(
            self.layout.monster_anchor(),
            target,
            &mut self.rng,
        ));
        self.shapes = generate_round(target, self.layout.width, self.layout.floor_y, &mut self.rng);
        self.dragged = None;
        self.set_state(GameState::Playing);
        self.emit_hud();

        log::info!(
            "Round {} - Target: {}",
            self.session.rounds_completed,
            target.as_str()
        );
    }

    /// Shape `index` was fed to the monster
    pub(super) fn handle_success(&mut self, index: usize, now_ms: f64) {
        if index < self.shapes.len() {
            self.shapes.remove(index);
        }
        self.shapes.clear();
        self.dragged = None;

        self.session.score += POINTS_PER_SUCCESS;
        self.session.streak += 1;

        if self.flash_enabled {
            self.success_flash = 1.0;
        }
        self.spawn_confetti();

        if let Some(monster) = self.monster.as_mut() {
            monster.start_eating();
        }
        self.emit_sound(SoundCue::Chomp);
        let cheer = ENCOURAGEMENTS[self.rng.random_range(0..ENCOURAGEMENTS.len())];
        self.events.push(GameEvent::Encouragement(cheer));
        self.emit_hud();

        self.set_state(GameState::Transitioning);
        self.scheduler
            .schedule(now_ms, EATING_DURATION_MS, Deferred::FinishEating);
        self.scheduler
            .schedule(now_ms, TRANSITION_DELAY_MS, Deferred::AdvanceRound);

        log::info!(
            "Success! Score: {}, Streak: {}",
            self.session.score,
            self.session.streak
        );
    }

    fn spawn_confetti(&mut self) {
        if !self.confetti_enabled {
            return;
        }
        let Some(center) = self.monster.as_ref().map(Monster::center) else {
            return;
        };

        let count = CONFETTI_PER_SUCCESS;
        for i in 0..count {
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let speed = 3.0 + self.rng.random::<f32>() * 7.0;
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed - 4.0);
            let color = CONFETTI_COLORS[self.rng.random_range(0..CONFETTI_COLORS.len())];
            let size = self.rng.random::<f32>() * 10.0 + 4.0;
            let rotation = self.rng.random::<f32>() * std::f32::consts::TAU;
            let spin = (self.rng.random::<f32>() - 0.5) * CONFETTI_MAX_SPIN * 2.0;
            // Silently short when the pool is exhausted
            self.particles.spawn(center, vel, color, size, rotation, spin);
        }
    }

    /// Drop whatever is held without evaluating a feed
    pub(super) fn release_drag_in_place(&mut self) {
        if let Some(shape) = self.dragged.take().and_then(|i| self.shapes.get_mut(i)) {
            shape.drop();
        }
        if let Some(monster) = self.monster.as_mut() {
            monster.reset_eyes();
        }
    }

    // === Event helpers ===

    pub(super) fn set_state(&mut self, next: GameState) {
        if self.state != next {
            log::debug!("State {:?} -> {:?}", self.state, next);
            self.state = next;
            self.events.push(GameEvent::StateChanged(next));
        }
    }

    pub(super) fn emit_sound(&mut self, cue: SoundCue) {
        self.events.push(GameEvent::Sound(cue));
    }

    fn emit_hud(&mut self) {
        self.events.push(GameEvent::Hud(self.session.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> GameController {
        let mut game = GameController::new(Layout::new(1024.0, 768.0), 42);
        game.finish_loading();
        game.start_game();
        game
    }

    #[test]
    fn test_loading_to_start_screen() {
        let mut game = GameController::new(Layout::new(1024.0, 768.0), 1);
        assert_eq!(game.state(), GameState::Loading);
        assert_eq!(game.particles().capacity(), PARTICLE_POOL_SIZE);

        game.start_game();
        assert_eq!(game.state(), GameState::Loading);

        game.finish_loading();
        assert_eq!(game.state(), GameState::StartScreen);
    }

    #[test]
    fn test_start_game_begins_round_one() {
        let game = started();
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.session().rounds_completed, 1);
        assert_eq!(game.session().score, 0);

        let monster = game.monster().expect("monster for round");
        assert_eq!(monster.pos, game.layout().monster_anchor());
        assert!(game.shapes().iter().any(|s| s.kind == monster.target));
    }

    #[test]
    fn test_restart_resets_session() {
        let mut game = started();
        game.handle_success(0, 0.0);
        assert_eq!(game.session().score, 10);

        game.restart();
        assert!(game.scheduler.take_due(10_000.0).is_empty());
        assert_eq!(game.particles().active_count(), 0);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(
            game.session(),
            Session {
                score: 0,
                rounds_completed: 1,
                streak: 0
            }
        );
    }

    #[test]
    fn test_pause_only_while_simulating() {
        let mut game = GameController::new(Layout::new(800.0, 600.0), 3);
        game.finish_loading();
        game.pause();
        assert_eq!(game.state(), GameState::StartScreen);

        game.start_game();
        game.pause();
        assert_eq!(game.state(), GameState::Paused);
        game.resume(0.0);
        assert_eq!(game.state(), GameState::Playing);
    }

    #[test]
    fn test_success_moves_to_transitioning() {
        let mut game = started();
        let before = game.session();
        game.handle_success(0, 1000.0);

        assert_eq!(game.state(), GameState::Transitioning);
        assert!(game.shapes().is_empty());
        assert_eq!(game.session().score, before.score + 10);
        assert_eq!(game.session().streak, 1);
        assert_eq!(game.success_flash(), 1.0);
        assert_eq!(game.particles().active_count(), CONFETTI_PER_SUCCESS);
        assert!(game.monster().is_some_and(|m| m.eating));

        let events: Vec<_> = game.drain_events().collect();
        assert!(events.contains(&GameEvent::Sound(SoundCue::Chomp)));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::Encouragement(text) if ENCOURAGEMENTS.contains(text))));
    }

    #[test]
    fn test_confetti_starts_tumbling_at_random() {
        let mut game = started();
        game.handle_success(0, 1000.0);

        let pieces: Vec<_> = game.particles().iter_active().collect();
        assert!(pieces.iter().all(|p| (0.0..std::f32::consts::TAU).contains(&p.rotation)));
        assert!(pieces.iter().all(|p| p.spin.abs() <= CONFETTI_MAX_SPIN));
        assert!(pieces.iter().any(|p| p.rotation != pieces[0].rotation));
        assert!(pieces.iter().any(|p| p.spin.signum() != pieces[0].spin.signum()));
    }

    #[test]
    fn test_second_success_exhausts_pool_quietly() {
        let mut game = started();
        game.handle_success(0, 0.0);
        game.start_new_round();
        game.handle_success(0, 2000.0);
        assert_eq!(game.particles().active_count(), PARTICLE_POOL_SIZE);
    }

    #[test]
    fn test_settings_disable_flash_and_confetti() {
        let mut game = started();
        let settings = Settings {
            reduced_motion: true,
            particles: false,
            muted: true,
            ..Settings::default()
        };
        game.apply_settings(&settings);
        game.handle_success(0, 0.0);
        assert_eq!(game.success_flash(), 0.0);
        assert_eq!(game.particles().active_count(), 0);
        assert!(game.is_muted());
    }

    #[test]
    fn test_toggle_mute_emits_state() {
        let mut game = started();
        game.drain_events().for_each(drop);
        assert!(game.toggle_mute());
        let events: Vec<_> = game.drain_events().collect();
        assert_eq!(
            events,
            vec![
                GameEvent::MuteChanged(true),
                GameEvent::Sound(SoundCue::ButtonClick)
            ]
        );
    }

    #[test]
    fn test_resize_moves_floor_and_monster() {
        let mut game = started();
        game.resize(Layout::new(1224.0, 968.0));
        assert!(game.shapes().iter().all(|s| s.floor_y == 768.0));
        let monster = game.monster().expect("monster");
        assert_eq!(monster.pos, Layout::new(1224.0, 968.0).monster_anchor());
    }
}
