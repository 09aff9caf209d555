//! Pointer-driven drag lifecycle
//!
//! Mouse and touch both arrive here as canvas-local positions.

use glam::Vec2;

use super::collision::check_drop;
use super::state::{GameController, GameState, SoundCue};

impl GameController {
    /// Pointer down. Picks the topmost shape under the pointer.
    pub fn press(&mut self, pos: Vec2) -> bool {
        if self.state != GameState::Playing || self.dragged.is_some() {
            return false;
        }

        // Later shapes draw on top, so test them first
        let Some(index) = self.shapes.iter().rposition(|s| s.contains_point(pos)) else {
            return false;
        };

        self.shapes[index].start_drag();
        self.dragged = Some(index);
        self.hint_ms = 0.0;
        self.emit_sound(SoundCue::Pickup);
        log::trace!("Picked up {} at {pos}", self.shapes[index].kind.as_str());
        true
    }

    /// Pointer move. Drags the held shape and points the monster's eyes.
    pub fn move_to(&mut self, pos: Vec2) {
        let Some(shape) = self.dragged.and_then(|i| self.shapes.get_mut(i)) else {
            return;
        };
        shape.drag_to(pos);
        if let Some(monster) = self.monster.as_mut() {
            monster.look_at(pos);
        }
    }

    /// Pointer up. Feeds the monster or drops the shape back into play.
    pub fn release(&mut self, pos: Vec2, now_ms: f64) {
        let Some(index) = self.dragged else {
            return;
        };
        let Some(shape) = self.shapes.get_mut(index) else {
            self.dragged = None;
            return;
        };
        shape.drag_to(pos);

        let shape = &self.shapes[index];
        let fed = self
            .monster
            .as_ref()
            .is_some_and(|monster| check_drop(shape, monster).is_success());

        if fed {
            self.handle_success(index, now_ms);
        } else {
            self.shapes[index].drop();
            self.emit_sound(SoundCue::Drop);
        }

        self.dragged = None;
        if let Some(monster) = self.monster.as_mut() {
            monster.reset_eyes();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use crate::sim::shape::{Shape, ShapeKind};
    use crate::sim::state::GameEvent;

    fn playing() -> GameController {
        let mut game = GameController::new(Layout::new(1024.0, 768.0), 21);
        game.finish_loading();
        game.start_game();
        game.drain_events().for_each(drop);
        game
    }

    fn place(game: &mut GameController, shapes: Vec<Shape>) {
        game.shapes = shapes;
        game.dragged = None;
    }

    #[test]
    fn test_press_prefers_last_created_shape() {
        let mut game = playing();
        let floor = game.layout().floor_y;
        place(
            &mut game,
            vec![
                Shape::new(ShapeKind::Circle, Vec2::new(300.0, 400.0), floor),
                Shape::new(ShapeKind::Square, Vec2::new(320.0, 400.0), floor),
            ],
        );

        assert!(game.press(Vec2::new(310.0, 400.0)));
        assert_eq!(game.dragged, Some(1));
        assert!(game.shapes[1].is_dragging);
        assert!(!game.shapes[0].is_dragging);
        let events: Vec<_> = game.drain_events().collect();
        assert_eq!(events, vec![GameEvent::Sound(SoundCue::Pickup)]);
    }

    #[test]
    fn test_press_misses_and_wrong_state() {
        let mut game = playing();
        assert!(!game.press(Vec2::new(-500.0, -500.0)));

        let target = game.shapes[0].pos;
        game.pause();
        assert!(!game.press(target));
    }

    #[test]
    fn test_move_tracks_pointer_and_eyes() {
        let mut game = playing();
        let floor = game.layout().floor_y;
        place(&mut game, vec![Shape::new(ShapeKind::Star, Vec2::new(100.0, floor), floor)]);

        game.press(Vec2::new(100.0, floor));
        game.move_to(Vec2::new(800.0, 200.0));
        assert_eq!(game.shapes[0].pos, Vec2::new(800.0, 200.0));
        assert!(game.monster().is_some_and(|m| m.eye_offset.length() > 0.0));
    }

    #[test]
    fn test_move_without_drag_is_noop() {
        let mut game = playing();
        let before: Vec<Vec2> = game.shapes().iter().map(|s| s.pos).collect();
        game.move_to(Vec2::new(1.0, 1.0));
        let after: Vec<Vec2> = game.shapes().iter().map(|s| s.pos).collect();
        assert_eq!(before, after);
        assert!(game.monster().is_some_and(|m| m.eye_offset == Vec2::ZERO));
    }

    #[test]
    fn test_wrong_shape_drop_falls_back() {
        let mut game = playing();
        let target = game.monster().map(|m| m.target).expect("monster");
        let wrong = ShapeKind::ALL
            .into_iter()
            .find(|k| *k != target)
            .expect("another kind");
        let floor = game.layout().floor_y;
        place(&mut game, vec![Shape::new(wrong, Vec2::new(100.0, floor), floor)]);
        let mouth = game.monster().map(|m| m.mouth()).expect("monster");

        game.press(Vec2::new(100.0, floor));
        game.release(mouth, 500.0);

        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.session().score, 0);
        assert!(game.shapes[0].is_falling);
        assert!(!game.shapes[0].is_dragging);
        assert_eq!(game.dragged, None);
        let events: Vec<_> = game.drain_events().collect();
        assert!(events.contains(&GameEvent::Sound(SoundCue::Drop)));
    }

    #[test]
    fn test_right_shape_far_away_is_a_drop() {
        let mut game = playing();
        let target = game.monster().map(|m| m.target).expect("monster");
        let floor = game.layout().floor_y;
        place(&mut game, vec![Shape::new(target, Vec2::new(100.0, floor), floor)]);

        game.press(Vec2::new(100.0, floor));
        game.release(Vec2::new(100.0, 100.0), 0.0);
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.shapes().len(), 1);
    }

    #[test]
    fn test_right_shape_on_mouth_feeds() {
        let mut game = playing();
        let target = game.monster().map(|m| m.target).expect("monster");
        let floor = game.layout().floor_y;
        place(&mut game, vec![Shape::new(target, Vec2::new(100.0, floor), floor)]);
        let mouth = game.monster().map(|m| m.mouth()).expect("monster");

        game.press(Vec2::new(100.0, floor));
        game.release(mouth, 0.0);
        assert_eq!(game.state(), GameState::Transitioning);
        assert!(game.shapes().is_empty());
        assert_eq!(game.session().score, 10);
        assert!(game.monster().is_some_and(|m| m.eye_offset == Vec2::ZERO));
    }
}
