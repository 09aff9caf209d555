//! Per-frame cycle
//!
//! Deferred actions fire first, then entities advance (only while playing or
//! in the round-clear window), then frame-level effects decay.

use super::schedule::Deferred;
use super::state::{GameController, GameState, SoundCue};
use crate::consts::*;
use crate::error::RenderError;
use crate::renderer::Renderer;

impl GameController {
    /// Advance one animation frame at wall-clock `timestamp_ms`
    pub fn frame(&mut self, timestamp_ms: f64) {
        let delta_ms = match self.last_frame_ms {
            Some(last) => (timestamp_ms - last).max(0.0),
            None => 0.0,
        };
        self.last_frame_ms = Some(timestamp_ms);

        self.run_deferred(timestamp_ms);

        if self.state.is_simulating() {
            self.update(delta_ms as f32, timestamp_ms);
        }

        self.success_flash *= FLASH_DECAY;
        if self.success_flash < FLASH_CUTOFF {
            self.success_flash = 0.0;
        }
    }

    fn run_deferred(&mut self, now_ms: f64) {
        for action in self.scheduler.take_due(now_ms) {
            match action {
                Deferred::FinishEating => {
                    if let Some(monster) = self.monster.as_mut() {
                        monster.start_happy();
                    }
                    self.emit_sound(SoundCue::Success);
                }
                Deferred::AdvanceRound => {
                    if self.state == GameState::Transitioning {
                        self.start_new_round();
                    } else {
                        log::debug!("Round advance skipped in {:?}", self.state);
                    }
                }
            }
        }
    }

    fn update(&mut self, delta_ms: f32, now_ms: f64) {
        for shape in &mut self.shapes {
            shape.update();
        }

        self.particles.update();

        if let Some(monster) = self.monster.as_mut() {
            monster.update(delta_ms, now_ms, &mut self.rng);
        }

        if self.state == GameState::Playing && self.dragged.is_none() {
            self.hint_ms += delta_ms;
        }
    }

    /// Draw the current frame back to front. Failures are logged; the next
    /// frame tries again.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        if let Err(err) = self.draw(renderer) {
            log::error!("Render failed: {err}");
        }
    }

    fn draw(&self, renderer: &mut dyn Renderer) -> Result<(), RenderError> {
        renderer.clear(&self.layout)?;
        renderer.draw_background(&self.layout)?;
        renderer.draw_floor(&self.layout)?;

        if let Some(monster) = &self.monster {
            renderer.draw_monster(monster)?;
        }

        let hints = self.hints_visible();
        for (i, shape) in self.shapes.iter().enumerate() {
            if self.dragged != Some(i) {
                renderer.draw_shape(shape, hints && shape.is_correct)?;
            }
        }
        // Held shape on top
        if let Some(shape) = self.dragged_shape() {
            renderer.draw_shape(shape, false)?;
        }

        for particle in self.particles.iter_active() {
            renderer.draw_particle(particle)?;
        }

        if self.success_flash > 0.0 {
            renderer.draw_flash(&self.layout, self.success_flash)?;
        }
        Ok(())
    }
}
