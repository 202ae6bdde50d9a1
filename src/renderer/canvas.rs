//! Canvas 2D renderer

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Renderer;
use super::shapes::{SKY_COLOR, Scene, Shape};

/// Draws scenes onto an HTML canvas
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Acquire the 2D context; `None` if the browser refuses one
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn draw_shape(&self, shape: &Shape) {
        match shape {
            Shape::Rect {
                min, size, color, ..
            } => {
                self.ctx.set_fill_style_str(&color.to_css());
                self.ctx
                    .fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
            }
            Shape::Circle {
                center,
                radius,
                rotation,
                color,
                ..
            } => {
                self.ctx.save();
                self.ctx.translate(center.x as f64, center.y as f64).ok();
                self.ctx.rotate(*rotation as f64).ok();
                self.ctx.set_fill_style_str(&color.to_css());
                self.ctx.begin_path();
                self.ctx.arc(0.0, 0.0, *radius as f64, 0.0, TAU).ok();
                self.ctx.fill();
                self.ctx.restore();
            }
        }
    }
}

impl Renderer for CanvasRenderer {
    fn draw(&mut self, scene: &Scene) {
        let w = scene.viewport.width as f64;
        let h = scene.viewport.height as f64;

        self.ctx.set_fill_style_str(&SKY_COLOR.to_css());
        self.ctx.fill_rect(0.0, 0.0, w, h);

        for shape in &scene.shapes {
            self.draw_shape(shape);
        }

        self.ctx.set_fill_style_str("#ffffff");
        self.ctx.set_font("bold 32px sans-serif");
        self.ctx
            .fill_text(&scene.hud.score.to_string(), w / 2.0 - 8.0, 48.0)
            .ok();

        if let Some(banner) = scene.hud.banner() {
            self.ctx.set_font("bold 28px sans-serif");
            self.ctx.fill_text(banner, w / 2.0 - 140.0, h / 2.0).ok();
            self.ctx.set_font("18px sans-serif");
            self.ctx
                .fill_text(
                    &format!("Best: {}", scene.hud.best),
                    w / 2.0 - 40.0,
                    h / 2.0 + 32.0,
                )
                .ok();
        }
    }
}
