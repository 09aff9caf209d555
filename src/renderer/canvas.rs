//! Canvas 2D renderer for the browser build

use std::f64::consts::{PI, TAU};

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::{Renderer, StateStack};
use super::shapes::Outline;
use crate::error::{InitError, RenderError};
use crate::layout::Layout;
use crate::sim::{Monster, MonsterMood, Particle, Shape, ShapeKind};
use crate::{css_color, shade};

const WALL_GRADIENT: [&str; 3] = ["#00D4FF", "#FF6B9D", "#9D4EDD"];
const FLOOR_GRADIENT: [&str; 2] = ["#4CAF50", "#2E7D32"];
const HEART_COLORS: [&str; 3] = ["#FF6B6B", "#FF8E8E", "#FFA5A5"];
const INK: &str = "#2C3E50";

impl StateStack for CanvasRenderingContext2d {
    fn save(&self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&self) {
        CanvasRenderingContext2d::restore(self);
    }
}

impl From<JsValue> for RenderError {
    fn from(err: JsValue) -> Self {
        RenderError::Canvas(format!("{err:?}"))
    }
}

/// Lighten (positive) or darken (negative) by a percentage
fn tint(rgb: u32, percent: f32) -> String {
    css_color(shade(rgb, (2.55 * percent).round() as i32))
}

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Wall clock for purely decorative motion (antenna, sparkles)
    time_ms: f64,
}

impl CanvasRenderer {
    /// Look up the canvas by id and acquire its 2D context
    pub fn new(document: &Document, canvas_id: &str) -> Result<Self, InitError> {
        let element = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| InitError::CanvasNotFound(canvas_id.to_string()))?;
        let canvas: HtmlCanvasElement = element
            .dyn_into()
            .map_err(|_| InitError::NotACanvas(canvas_id.to_string()))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| InitError::ContextUnavailable(format!("{e:?}")))?
            .ok_or_else(|| InitError::ContextUnavailable("no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| InitError::ContextUnavailable("unexpected context type".into()))?;

        Ok(Self {
            canvas,
            ctx,
            time_ms: 0.0,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Match the backing store to the layout
    pub fn resize(&self, layout: &Layout) {
        self.canvas.set_width(layout.width as u32);
        self.canvas.set_height(layout.height as u32);
    }

    pub fn set_time(&mut self, now_ms: f64) {
        self.time_ms = now_ms;
    }

    fn isolated<F>(&self, draw: F) -> Result<(), RenderError>
    where
        F: FnOnce(&CanvasRenderingContext2d) -> Result<(), RenderError>,
    {
        super::isolated(&self.ctx, draw)
    }

    fn trace_outline(&self, outline: &Outline) -> Result<(), RenderError> {
        let ctx = &self.ctx;
        ctx.begin_path();
        match outline {
            Outline::Circle { radius } => ctx.arc(0.0, 0.0, *radius as f64, 0.0, TAU)?,
            Outline::Polygon(points) => {
                if let Some((first, rest)) = points.split_first() {
                    ctx.move_to(first.x as f64, first.y as f64);
                    for p in rest {
                        ctx.line_to(p.x as f64, p.y as f64);
                    }
                }
                ctx.close_path();
            }
        }
        Ok(())
    }

    fn shape_gradient(&self, kind: ShapeKind, size: f64) -> Result<CanvasGradient, RenderError> {
        let color = kind.color();
        let half = size / 2.0;
        let gradient = match kind {
            ShapeKind::Circle | ShapeKind::Star => {
                self.ctx
                    .create_radial_gradient(-size * 0.15, -size * 0.15, 0.0, 0.0, 0.0, half)?
            }
            ShapeKind::Square | ShapeKind::Rectangle => {
                self.ctx.create_linear_gradient(-half, -half, half, half)
            }
            ShapeKind::Triangle => self.ctx.create_linear_gradient(0.0, -half, 0.0, half),
        };
        gradient.add_color_stop(0.0, &tint(color, 30.0))?;
        gradient.add_color_stop(1.0, &tint(color, -10.0))?;
        Ok(gradient)
    }

    fn draw_glow(&self, shape: &Shape, intensity: f64) -> Result<(), RenderError> {
        let ctx = &self.ctx;
        ctx.set_shadow_color(&tint(shape.kind.color(), 60.0));
        ctx.set_shadow_blur(30.0 * intensity);
        ctx.set_global_alpha(0.4 * intensity);
        ctx.set_fill_style_str(&tint(shape.kind.color(), 50.0));

        // Stars glow as a disc
        let outline = match shape.kind {
            ShapeKind::Star => Outline::Circle {
                radius: shape.size / 2.0 + 8.0,
            },
            kind => kind.outline(shape.size + 16.0),
        };
        self.trace_outline(&outline)?;
        ctx.fill();

        ctx.set_global_alpha(1.0);
        ctx.set_shadow_blur(0.0);
        Ok(())
    }

    fn draw_monster_body(&self, monster: &Monster) -> Result<(), RenderError> {
        let ctx = &self.ctx;
        let (w, h) = (monster.width as f64, monster.height as f64);
        let theme = monster.theme;

        let gradient = ctx.create_radial_gradient(0.0, -h * 0.15, 0.0, 0.0, 0.0, w * 0.5)?;
        gradient.add_color_stop(0.0, &tint(theme.start, 20.0))?;
        gradient.add_color_stop(0.5, &css_color(theme.start))?;
        gradient.add_color_stop(1.0, &css_color(theme.end))?;
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.set_stroke_style_str(&tint(theme.end, -20.0));
        ctx.set_line_width(5.0);
        ctx.set_line_join("round");

        // Body takes the silhouette of the shape it wants
        self.trace_outline(&monster.target.outline(monster.width * 0.8))?;
        ctx.fill();
        ctx.stroke();

        // Antenna
        let antenna_y = -h * 0.45;
        let wobble = (self.time_ms / 300.0).sin() * 5.0;
        ctx.set_stroke_style_str(&tint(theme.end, -30.0));
        ctx.set_line_width(4.0);
        ctx.set_line_cap("round");
        ctx.begin_path();
        ctx.move_to(0.0, antenna_y);
        ctx.line_to(wobble, antenna_y - 20.0);
        ctx.stroke();

        ctx.set_fill_style_str(&tint(theme.start, 40.0));
        ctx.begin_path();
        ctx.arc(wobble, antenna_y - 20.0, 8.0, 0.0, TAU)?;
        ctx.fill();
        ctx.set_line_width(2.0);
        ctx.stroke();
        Ok(())
    }

    fn draw_monster_arms(&self, monster: &Monster) -> Result<(), RenderError> {
        let ctx = &self.ctx;
        let w = monster.width as f64;
        let arm_length = w * 0.3;
        let arm_width = w * 0.15;
        let body_radius = w * 0.4;

        ctx.set_line_width(arm_width);
        ctx.set_line_cap("round");

        for (angle, side) in [(monster.left_arm, -1.0), (monster.right_arm, 1.0)] {
            self.isolated(|ctx| {
                ctx.rotate(angle as f64)?;
                let gradient = ctx.create_linear_gradient(0.0, 0.0, body_radius, 0.0);
                gradient.add_color_stop(0.0, &css_color(monster.theme.start))?;
                gradient.add_color_stop(1.0, &css_color(monster.theme.end))?;
                ctx.set_stroke_style_canvas_gradient(&gradient);
                ctx.begin_path();
                ctx.move_to(side * body_radius * 0.7, 0.0);
                ctx.line_to(side * (body_radius + arm_length), 0.0);
                ctx.stroke();

                ctx.set_fill_style_str(&css_color(monster.theme.end));
                ctx.begin_path();
                ctx.arc(side * (body_radius + arm_length), 0.0, arm_width * 0.7, 0.0, TAU)?;
                ctx.fill();
                Ok(())
            })?;
        }
        Ok(())
    }

    fn draw_monster_face(&self, monster: &Monster) -> Result<(), RenderError> {
        let ctx = &self.ctx;
        let (w, h) = (monster.width as f64, monster.height as f64);
        let eye_y = -h * 0.15;
        let eyes = [-w * 0.15, w * 0.15];
        let look = monster.eye_offset;
        let (lx, ly) = (look.x as f64, look.y as f64);

        if monster.is_blinking() {
            ctx.set_stroke_style_str(INK);
            ctx.set_line_width(4.0);
            ctx.set_line_cap("round");
            ctx.begin_path();
            for x in eyes {
                ctx.move_to(x - 15.0, eye_y);
                ctx.line_to(x + 15.0, eye_y);
            }
            ctx.stroke();
        } else {
            ctx.set_fill_style_str("white");
            ctx.set_stroke_style_str("#ddd");
            ctx.set_line_width(2.0);
            for x in eyes {
                ctx.begin_path();
                ctx.arc(x, eye_y, 20.0, 0.0, TAU)?;
                ctx.fill();
                ctx.stroke();
            }

            ctx.set_fill_style_str(INK);
            for x in eyes {
                ctx.begin_path();
                ctx.arc(x + lx, eye_y + ly, 11.0, 0.0, TAU)?;
                ctx.fill();
            }

            ctx.set_fill_style_str("white");
            for x in eyes {
                ctx.begin_path();
                ctx.arc(x + lx - 3.0, eye_y + ly - 3.0, 4.0, 0.0, TAU)?;
                ctx.fill();
            }
        }

        // Mouth
        let mouth_y = h * 0.2;
        let mouth_width = w * 0.4;
        ctx.set_stroke_style_str(&tint(monster.theme.end, -40.0));
        ctx.set_line_width(6.0);
        ctx.set_line_cap("round");
        ctx.begin_path();
        match monster.mood() {
            MonsterMood::Happy => {
                ctx.set_fill_style_str("#8B4513");
                ctx.ellipse(0.0, mouth_y, mouth_width / 2.0, mouth_width / 3.0, 0.0, 0.0, PI)?;
                ctx.fill();
                ctx.begin_path();
                ctx.arc(0.0, mouth_y - 20.0, mouth_width / 2.0, 0.1, PI - 0.1)?;
                ctx.stroke();
            }
            MonsterMood::Eating => {
                ctx.set_fill_style_str("#5D4037");
                ctx.arc(0.0, mouth_y, mouth_width / 3.0, 0.0, TAU)?;
                ctx.fill();
                ctx.stroke();
            }
            MonsterMood::Entering | MonsterMood::Idle => {
                ctx.arc(0.0, mouth_y, mouth_width / 2.5, 0.2, PI - 0.2)?;
                ctx.stroke();
            }
        }

        // Cheeks
        ctx.set_fill_style_str("rgba(255, 182, 193, 0.7)");
        for x in [-w * 0.28, w * 0.28] {
            ctx.begin_path();
            ctx.arc(x, h * 0.05, w * 0.09, 0.0, TAU)?;
            ctx.fill();
        }
        Ok(())
    }

    fn draw_happy_effect(&self, monster: &Monster) -> Result<(), RenderError> {
        let ctx = &self.ctx;
        let w = monster.width as f64;
        let time = self.time_ms / 100.0;

        ctx.set_fill_style_str("#FFD700");
        for i in 0..12 {
            let angle = i as f64 / 12.0 * TAU + time;
            let size = 8.0 + (time + i as f64).sin() * 4.0;
            self.isolated(|ctx| {
                ctx.translate(angle.cos() * w * 0.7, angle.sin() * w * 0.7)?;
                self.trace_outline(&ShapeKind::Star.outline(size as f32 * 2.0))?;
                ctx.fill();
                Ok(())
            })?;
        }

        for i in 0..6 {
            let angle = i as f64 / 6.0 * TAU + time * 0.7;
            let (x, y) = (angle.cos() * w * 0.5, angle.sin() * w * 0.5);
            let size = 10.0 + (time * 1.2 + i as f64).sin() * 4.0;
            let top = size * 0.3;

            ctx.set_fill_style_str(HEART_COLORS[i % HEART_COLORS.len()]);
            self.isolated(|ctx| {
                ctx.translate(x, y)?;
                ctx.begin_path();
                ctx.move_to(0.0, top);
                ctx.bezier_curve_to(-size / 2.0, top - size / 2.0, -size / 2.0, 0.0, 0.0, 0.0);
                ctx.bezier_curve_to(size / 2.0, 0.0, size / 2.0, top - size / 2.0, 0.0, top);
                ctx.line_to(0.0, size);
                ctx.close_path();
                ctx.fill();
                Ok(())
            })?;
        }
        Ok(())
    }
}

impl Renderer for CanvasRenderer {
    fn clear(&mut self, layout: &Layout) -> Result<(), RenderError> {
        self.ctx
            .clear_rect(0.0, 0.0, layout.width as f64, layout.height as f64);
        Ok(())
    }

    fn draw_background(&mut self, layout: &Layout) -> Result<(), RenderError> {
        let (w, h) = (layout.width as f64, layout.height as f64);
        let gradient = self
            .ctx
            .create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w.max(h))?;
        gradient.add_color_stop(0.0, WALL_GRADIENT[0])?;
        gradient.add_color_stop(0.5, WALL_GRADIENT[1])?;
        gradient.add_color_stop(1.0, WALL_GRADIENT[2])?;
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.fill_rect(0.0, 0.0, w, h);
        Ok(())
    }

    fn draw_floor(&mut self, layout: &Layout) -> Result<(), RenderError> {
        let ctx = &self.ctx;
        let (w, h, floor) = (
            layout.width as f64,
            layout.height as f64,
            layout.floor_y as f64,
        );
        let gradient = ctx.create_linear_gradient(0.0, floor, 0.0, h);
        gradient.add_color_stop(0.0, FLOOR_GRADIENT[0])?;
        gradient.add_color_stop(1.0, FLOOR_GRADIENT[1])?;
        ctx.set_fill_style_canvas_gradient(&gradient);
        ctx.fill_rect(0.0, floor, w, h - floor);

        ctx.set_stroke_style_str("rgba(0, 0, 0, 0.3)");
        ctx.set_line_width(3.0);
        ctx.begin_path();
        ctx.move_to(0.0, floor);
        ctx.line_to(w, floor);
        ctx.stroke();
        Ok(())
    }

    fn draw_monster(&mut self, monster: &Monster) -> Result<(), RenderError> {
        let center = monster.draw_center();
        let (w, h) = (monster.width as f64, monster.height as f64);

        self.isolated(|ctx| {
            ctx.translate(center.x as f64, center.y as f64)?;
            ctx.rotate(monster.rotation as f64)?;
            ctx.scale(monster.scale as f64, monster.scale as f64)?;

            ctx.set_fill_style_str("rgba(0, 0, 0, 0.2)");
            ctx.begin_path();
            ctx.ellipse(0.0, h * 0.45, w * 0.45, h * 0.12, 0.0, 0.0, TAU)?;
            ctx.fill();

            self.draw_monster_arms(monster)?;
            self.draw_monster_body(monster)?;
            self.draw_monster_face(monster)?;
            if monster.mood() == MonsterMood::Happy {
                self.draw_happy_effect(monster)?;
            }
            Ok(())
        })
    }

    fn draw_shape(&mut self, shape: &Shape, hint: bool) -> Result<(), RenderError> {
        let size = shape.size as f64;

        self.isolated(|ctx| {
            ctx.translate(shape.pos.x as f64, shape.pos.y as f64)?;
            ctx.rotate(shape.rotation as f64)?;
            ctx.scale(shape.scale as f64, (shape.scale * shape.squash) as f64)?;

            ctx.set_fill_style_str("rgba(0, 0, 0, 0.2)");
            ctx.begin_path();
            ctx.ellipse(2.0, size * 0.4, size * 0.35, size * 0.12, 0.0, 0.0, TAU)?;
            ctx.fill();

            if shape.is_dragging {
                self.draw_glow(shape, 1.0)?;
            } else if hint {
                self.draw_glow(shape, (shape.hint_pulse as f64).sin() * 0.5 + 0.5)?;
            }

            let gradient = self.shape_gradient(shape.kind, size)?;
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.set_stroke_style_str(&tint(shape.kind.color(), -30.0));
            ctx.set_line_width(4.0);
            ctx.set_line_join("round");
            self.trace_outline(&shape.kind.outline(shape.size))?;
            ctx.fill();
            ctx.stroke();

            if shape.is_dragging {
                let time = self.time_ms / 100.0;
                ctx.set_fill_style_str("#FFFFFF");
                ctx.set_global_alpha(0.8);
                for i in 0..4 {
                    let angle = i as f64 / 4.0 * TAU + time;
                    let r = 3.0 + (time + i as f64).sin() * 2.0;
                    ctx.begin_path();
                    ctx.arc(angle.cos() * size * 0.6, angle.sin() * size * 0.6, r, 0.0, TAU)?;
                    ctx.fill();
                }
                ctx.set_global_alpha(1.0);
            }
            Ok(())
        })
    }

    fn draw_particle(&mut self, particle: &Particle) -> Result<(), RenderError> {
        let size = particle.size as f64;

        self.isolated(|ctx| {
            ctx.set_global_alpha(particle.opacity() as f64);
            ctx.translate(particle.pos.x as f64, particle.pos.y as f64)?;
            ctx.rotate(particle.rotation as f64)?;
            ctx.set_fill_style_str(&css_color(particle.color));
            ctx.fill_rect(-size / 2.0, -size / 2.0, size, size * 0.5);
            Ok(())
        })
    }

    fn draw_flash(&mut self, layout: &Layout, alpha: f32) -> Result<(), RenderError> {
        self.ctx
            .set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.4));
        self.ctx
            .fill_rect(0.0, 0.0, layout.width as f64, layout.height as f64);
        Ok(())
    }
}
