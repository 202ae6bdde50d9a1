//! Scene generation for 2D primitives
//!
//! Turns read-only game state into a flat list of shapes plus HUD values.
//! Backends only rasterize; nothing here mutates the simulation.

use glam::Vec2;

use crate::consts::{ACTOR_DRAW_RADIUS, OBSTACLE_DRAW_WIDTH};
use crate::sim::{GamePhase, GameState, Obstacle, Viewport};
use crate::tilt_for_velocity;

/// Opaque RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// CSS hex form (`#rrggbb`)
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Column fill
pub const OBSTACLE_COLOR: Color = Color(0x27, 0x40, 0x64);
/// Cap drawn over each gap edge, slightly lighter than the column
pub const CAP_COLOR: Color = Color(0x3a, 0x5a, 0x8c);
/// Actor disc
pub const ACTOR_COLOR: Color = Color(0xff, 0xb7, 0x03);
pub const SKY_COLOR: Color = Color(0x8e, 0xca, 0xe6);

/// Height of the cap strip at each gap face
const CAP_HEIGHT: f32 = 12.0;

/// What a shape depicts (lets text backends pick a glyph)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Obstacle,
    Cap,
    Actor,
}

/// A single drawable primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        min: Vec2,
        size: Vec2,
        color: Color,
        layer: Layer,
    },
    Circle {
        center: Vec2,
        radius: f32,
        /// Rotation in radians (sprite tilt)
        rotation: f32,
        color: Color,
        layer: Layer,
    },
}

impl Shape {
    /// Whether a point lies inside the shape (rotation ignored)
    pub fn contains(&self, p: Vec2) -> bool {
        match self {
            Shape::Rect { min, size, .. } => {
                p.x >= min.x && p.x < min.x + size.x && p.y >= min.y && p.y < min.y + size.y
            }
            Shape::Circle { center, radius, .. } => p.distance_squared(*center) <= radius * radius,
        }
    }

    pub fn layer(&self) -> Layer {
        match self {
            Shape::Rect { layer, .. } | Shape::Circle { layer, .. } => *layer,
        }
    }
}

/// Overlay text values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub best: u32,
    pub phase: GamePhase,
}

impl Hud {
    /// Overlay headline for the current phase, if any
    pub fn banner(&self) -> Option<&'static str> {
        match self.phase {
            GamePhase::Idle => Some("Press Space to start"),
            GamePhase::Running => None,
            GamePhase::Paused => Some("Paused"),
            GamePhase::GameOver => Some("Game Over - press Enter"),
        }
    }
}

/// Everything a backend needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub viewport: Viewport,
    /// Back to front
    pub shapes: Vec<Shape>,
    pub hud: Hud,
}

/// Column shapes for one obstacle: top barrier, bottom barrier and both caps
pub fn obstacle_shapes(obstacle: &Obstacle, viewport_height: f32) -> [Shape; 4] {
    let bottom_y = obstacle.gap_bottom();
    // Caps are centred on the hit column
    let cap_x = obstacle.x - (OBSTACLE_DRAW_WIDTH - obstacle.width) / 2.0;
    [
        Shape::Rect {
            min: Vec2::new(obstacle.x, 0.0),
            size: Vec2::new(obstacle.width, obstacle.gap_top),
            color: OBSTACLE_COLOR,
            layer: Layer::Obstacle,
        },
        Shape::Rect {
            min: Vec2::new(obstacle.x, bottom_y),
            size: Vec2::new(obstacle.width, obstacle.bottom_face(viewport_height)),
            color: OBSTACLE_COLOR,
            layer: Layer::Obstacle,
        },
        Shape::Rect {
            min: Vec2::new(cap_x, obstacle.gap_top - CAP_HEIGHT),
            size: Vec2::new(OBSTACLE_DRAW_WIDTH, CAP_HEIGHT),
            color: CAP_COLOR,
            layer: Layer::Cap,
        },
        Shape::Rect {
            min: Vec2::new(cap_x, bottom_y),
            size: Vec2::new(OBSTACLE_DRAW_WIDTH, CAP_HEIGHT),
            color: CAP_COLOR,
            layer: Layer::Cap,
        },
    ]
}

/// Build the scene for the current state
pub fn build_scene(state: &GameState, best: u32) -> Scene {
    let mut shapes = Vec::with_capacity(state.obstacles.len() * 4 + 1);

    for obstacle in &state.obstacles {
        shapes.extend(obstacle_shapes(obstacle, state.viewport.height));
    }

    shapes.push(Shape::Circle {
        center: Vec2::new(state.actor.x, state.actor.y),
        radius: ACTOR_DRAW_RADIUS,
        rotation: tilt_for_velocity(state.actor.vel),
        color: ACTOR_COLOR,
        layer: Layer::Actor,
    });

    Scene {
        viewport: state.viewport,
        shapes,
        hud: Hud {
            score: state.score,
            best,
            phase: state.phase,
        },
    }
}
