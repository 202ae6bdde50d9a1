//! Character-grid renderer for headless runs
//!
//! Samples the scene at cell centres, one cell per `cell` pixels.

use glam::Vec2;

use super::Renderer;
use super::shapes::{Layer, Scene};

/// Rasterizes scenes into rows of characters
#[derive(Debug, Clone)]
pub struct TextRenderer {
    cols: usize,
    rows: usize,
    grid: Vec<char>,
    hud_line: String,
}

impl TextRenderer {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            grid: vec![' '; cols * rows],
            hud_line: String::new(),
        }
    }

    fn glyph(layer: Layer) -> char {
        match layer {
            Layer::Obstacle => '#',
            Layer::Cap => '=',
            Layer::Actor => '@',
        }
    }

    /// Last frame as text, HUD line first
    pub fn frame(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * (self.rows + 1));
        out.push_str(&self.hud_line);
        out.push('\n');
        for row in self.grid.chunks(self.cols.max(1)) {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }
}

impl Renderer for TextRenderer {
    fn draw(&mut self, scene: &Scene) {
        let cell = Vec2::new(
            scene.viewport.width / self.cols.max(1) as f32,
            scene.viewport.height / self.rows.max(1) as f32,
        );
        for row in 0..self.rows {
            for col in 0..self.cols {
                let p = Vec2::new((col as f32 + 0.5) * cell.x, (row as f32 + 0.5) * cell.y);
                // Later shapes sit on top
                let ch = scene
                    .shapes
                    .iter()
                    .rev()
                    .find(|s| s.contains(p))
                    .map(|s| Self::glyph(s.layer()))
                    .unwrap_or(' ');
                self.grid[row * self.cols + col] = ch;
            }
        }

        self.hud_line = format!("score {}  best {}", scene.hud.score, scene.hud.best);
        if let Some(banner) = scene.hud.banner() {
            self.hud_line.push_str("  ");
            self.hud_line.push_str(banner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::shapes::build_scene;
    use crate::sim::{GameState, Viewport};
    use crate::tuning::Tuning;

    #[test]
    fn test_idle_frame_shows_actor() {
        let state = GameState::new(1, Tuning::default(), Viewport::new(800.0, 600.0));
        let mut renderer = TextRenderer::new(80, 30);
        renderer.draw(&build_scene(&state, 4));
        let frame = renderer.frame();
        let mut lines = frame.lines();
        let hud = lines.next().unwrap_or_default();
        assert!(hud.starts_with("score 0  best 4"));
        // Actor centre (80, 300) lands in column 8, row 15
        let row = lines.nth(15).unwrap_or_default();
        assert_eq!(row.chars().nth(8), Some('@'));
    }

    #[test]
    fn test_running_frame_shows_columns() {
        let mut state = GameState::new(1, Tuning::default(), Viewport::new(800.0, 600.0));
        state.reset(3);
        let mut renderer = TextRenderer::new(80, 30);
        renderer.draw(&build_scene(&state, 0));
        assert!(renderer.frame().contains('#'));
    }
}
