//! Rendering module
//!
//! The controller draws through the `Renderer` trait. The browser build
//! implements it on a Canvas 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use shapes::Outline;

use crate::error::RenderError;
use crate::layout::Layout;
use crate::sim::{Monster, Particle, Shape};

/// Draw calls issued once per frame, back to front
pub trait Renderer {
    fn clear(&mut self, layout: &Layout) -> Result<(), RenderError>;
    fn draw_background(&mut self, layout: &Layout) -> Result<(), RenderError>;
    fn draw_floor(&mut self, layout: &Layout) -> Result<(), RenderError>;
    fn draw_monster(&mut self, monster: &Monster) -> Result<(), RenderError>;
    /// `hint` asks for the pulsing glow on a correct shape
    fn draw_shape(&mut self, shape: &Shape, hint: bool) -> Result<(), RenderError>;
    fn draw_particle(&mut self, particle: &Particle) -> Result<(), RenderError>;
    /// Full-screen white overlay at `alpha`
    fn draw_flash(&mut self, layout: &Layout, alpha: f32) -> Result<(), RenderError>;
}

/// A drawing surface with a save/restore state stack (transform, alpha, styles)
pub trait StateStack {
    fn save(&self);
    fn restore(&self);
}

/// Run `draw` between save and restore. The stack stays balanced when `draw`
/// bails out early.
pub fn isolated<S, F>(surface: &S, draw: F) -> Result<(), RenderError>
where
    S: StateStack + ?Sized,
    F: FnOnce(&S) -> Result<(), RenderError>,
{
    surface.save();
    let drawn = draw(surface);
    surface.restore();
    drawn
}

/// Records call names; optionally fails on one of them
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingRenderer {
    pub calls: Vec<&'static str>,
    pub fail_on: Option<&'static str>,
}

#[cfg(test)]
impl RecordingRenderer {
    fn record(&mut self, call: &'static str) -> Result<(), RenderError> {
        if self.fail_on == Some(call) {
            return Err(RenderError::Canvas(call.to_string()));
        }
        self.calls.push(call);
        Ok(())
    }
}

#[cfg(test)]
impl Renderer for RecordingRenderer {
    fn clear(&mut self, _: &Layout) -> Result<(), RenderError> {
        self.record("clear")
    }

    fn draw_background(&mut self, _: &Layout) -> Result<(), RenderError> {
        self.record("background")
    }

    fn draw_floor(&mut self, _: &Layout) -> Result<(), RenderError> {
        self.record("floor")
    }

    fn draw_monster(&mut self, _: &Monster) -> Result<(), RenderError> {
        self.record("monster")
    }

    fn draw_shape(&mut self, _: &Shape, _: bool) -> Result<(), RenderError> {
        self.record("shape")
    }

    fn draw_particle(&mut self, _: &Particle) -> Result<(), RenderError> {
        self.record("particle")
    }

    fn draw_flash(&mut self, _: &Layout, _: f32) -> Result<(), RenderError> {
        self.record("flash")
    }
}
