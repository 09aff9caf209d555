//! End-to-end sessions driven through the public controller API

use glam::Vec2;
use shape_muncher::Layout;
use shape_muncher::consts::*;
use shape_muncher::sim::{GameController, GameEvent, GameState, ShapeKind, SoundCue};

const FRAME_MS: f64 = 16.0;

struct Run {
    game: GameController,
    now: f64,
    events: Vec<GameEvent>,
}

impl Run {
    /// A started game whose first target is `target`
    fn with_target(target: ShapeKind) -> Self {
        let game = (0..500)
            .find_map(|seed| {
                let mut game = GameController::new(Layout::new(1024.0, 768.0), seed);
                game.finish_loading();
                game.start_game();
                (game.monster()?.target == target).then_some(game)
            })
            .expect("some seed picks the target");
        let mut run = Self {
            game,
            now: 0.0,
            events: Vec::new(),
        };
        run.game.frame(0.0);
        run.collect();
        run
    }

    fn collect(&mut self) {
        self.events.extend(self.game.drain_events());
    }

    fn run_until(&mut self, end: f64) {
        while self.now + FRAME_MS <= end {
            self.now += FRAME_MS;
            self.game.frame(self.now);
        }
        if self.now < end {
            self.now = end;
            self.game.frame(end);
        }
        self.collect();
    }

    fn settle(&mut self) {
        let end = self.now + 5000.0;
        self.run_until(end);
        assert!(self.game.shapes().iter().all(|s| !s.is_falling));
    }

    fn mouth(&self) -> Vec2 {
        self.game.monster().expect("monster").mouth()
    }

    fn position_of(&self, kind: ShapeKind) -> Vec2 {
        self.game
            .shapes()
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.pos)
            .expect("shape of kind")
    }

    fn feed(&mut self, kind: ShapeKind) {
        let pos = self.position_of(kind);
        let mouth = self.mouth();
        assert!(self.game.press(pos));
        self.game.move_to(mouth);
        self.game.release(mouth, self.now);
        self.collect();
    }

    fn saw(&self, event: &GameEvent) -> bool {
        self.events.contains(event)
    }
}

#[test]
fn feeding_the_star_clears_the_round() {
    let mut run = Run::with_target(ShapeKind::Star);
    assert_eq!(run.game.session().rounds_completed, 1);
    run.settle();

    run.feed(ShapeKind::Star);
    let fed_at = run.now;

    assert_eq!(run.game.state(), GameState::Transitioning);
    assert_eq!(run.game.session().score, 10);
    assert_eq!(run.game.session().streak, 1);
    assert_eq!(run.game.particles().active_count(), CONFETTI_PER_SUCCESS);
    assert_eq!(run.game.success_flash(), 1.0);
    assert!(run.saw(&GameEvent::Sound(SoundCue::Pickup)));
    assert!(run.saw(&GameEvent::Sound(SoundCue::Chomp)));
    assert!(run.events.iter().any(|e| matches!(e, GameEvent::Encouragement(_))));
    assert!(!run.saw(&GameEvent::Sound(SoundCue::Success)));

    run.run_until(fed_at + EATING_DURATION_MS);
    assert!(run.saw(&GameEvent::Sound(SoundCue::Success)));
    assert!(run.game.monster().is_some_and(|m| m.is_happy()));

    run.run_until(fed_at + TRANSITION_DELAY_MS - 1.0);
    assert_eq!(run.game.state(), GameState::Transitioning);

    run.run_until(fed_at + TRANSITION_DELAY_MS);
    assert_eq!(run.game.state(), GameState::Playing);
    assert_eq!(run.game.session().rounds_completed, 2);
    assert!(run.game.monster().is_some_and(|m| m.is_entering()));
    assert_eq!(run.game.success_flash(), 0.0);
}

#[test]
fn wrong_shape_bounces_back_without_scoring() {
    let mut run = Run::with_target(ShapeKind::Circle);
    run.settle();

    let Some(wrong) = run
        .game
        .shapes()
        .iter()
        .find(|s| s.kind != ShapeKind::Circle)
        .map(|s| s.kind)
    else {
        // Every slot rolled the target; nothing to get wrong
        return;
    };

    let floor = run.game.layout().floor_y;
    run.feed(wrong);
    assert_eq!(run.game.state(), GameState::Playing);
    assert_eq!(run.game.session().score, 0);
    assert!(run.saw(&GameEvent::Sound(SoundCue::Drop)));
    assert!(run.game.monster().is_some_and(|m| m.eye_offset == Vec2::ZERO));

    run.settle();
    let dropped = run
        .game
        .shapes()
        .iter()
        .find(|s| s.kind == wrong && (s.pos.x - run.mouth().x).abs() < 1.0)
        .expect("dropped shape under the mouth");
    assert_eq!(dropped.pos.y, floor);
}

#[test]
fn pause_during_transition_holds_the_next_round() {
    let mut run = Run::with_target(ShapeKind::Square);
    run.settle();
    run.feed(ShapeKind::Square);
    let fed_at = run.now;

    run.run_until(fed_at + 100.0);
    run.game.pause();
    assert_eq!(run.game.state(), GameState::Paused);

    // Well past the original advance
    run.run_until(fed_at + 3000.0);
    assert_eq!(run.game.state(), GameState::Paused);
    assert_eq!(run.game.session().rounds_completed, 1);

    let resumed_at = run.now;
    run.game.resume(resumed_at);
    assert_eq!(run.game.state(), GameState::Transitioning);

    run.run_until(resumed_at + TRANSITION_DELAY_MS - 1.0);
    assert_eq!(run.game.state(), GameState::Transitioning);
    run.run_until(resumed_at + TRANSITION_DELAY_MS);
    assert_eq!(run.game.state(), GameState::Playing);
    assert_eq!(run.game.session().rounds_completed, 2);
}

#[test]
fn pause_mid_chomp_still_celebrates_after_resume() {
    let mut run = Run::with_target(ShapeKind::Star);
    run.settle();
    run.feed(ShapeKind::Star);
    let fed_at = run.now;

    run.run_until(fed_at + 100.0);
    run.game.pause();
    run.run_until(fed_at + 1100.0);
    assert!(!run.saw(&GameEvent::Sound(SoundCue::Success)));
    assert!(run.game.monster().is_some_and(|m| m.eating));

    let resumed_at = run.now;
    run.game.resume(resumed_at);
    run.run_until(resumed_at + EATING_DURATION_MS);
    assert_eq!(run.game.state(), GameState::Transitioning);
    assert!(run.saw(&GameEvent::Sound(SoundCue::Success)));
    assert!(run.game.monster().is_some_and(|m| m.is_happy() && !m.eating));

    run.run_until(resumed_at + TRANSITION_DELAY_MS);
    assert_eq!(run.game.state(), GameState::Playing);
    assert_eq!(run.game.session().rounds_completed, 2);
}

#[test]
fn restart_during_transition_drops_the_old_advance() {
    let mut run = Run::with_target(ShapeKind::Triangle);
    run.settle();
    run.feed(ShapeKind::Triangle);
    let fed_at = run.now;

    run.run_until(fed_at + 100.0);
    run.game.restart();
    assert_eq!(run.game.state(), GameState::Playing);
    assert_eq!(run.game.session().score, 0);
    assert_eq!(run.game.session().rounds_completed, 1);

    run.run_until(fed_at + 3000.0);
    assert_eq!(run.game.state(), GameState::Playing);
    assert_eq!(run.game.session().rounds_completed, 1);
}

#[test]
fn streak_survives_rounds() {
    let mut run = Run::with_target(ShapeKind::Rectangle);
    for round in 1..=3 {
        run.settle();
        let target = run.game.monster().expect("monster").target;
        run.feed(target);
        assert_eq!(run.game.session().streak, round);
        let fed_at = run.now;
        run.run_until(fed_at + TRANSITION_DELAY_MS);
    }
    assert_eq!(run.game.session().score, 30);
    assert_eq!(run.game.session().rounds_completed, 4);
}
