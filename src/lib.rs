//! Flappy Canvas - a single-screen gap-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, scoring)
//! - `session`: Run state machine and frame driver
//! - `renderer`: Scene building plus Canvas 2D / text renderers
//! - `audio`: Sound cues behind the `SoundPlayer` capability
//! - `platform`: Key-value storage and input mapping
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use session::{FrameStatus, Session};
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Reference display rate the per-step tuning values were authored for
    pub const REFERENCE_FPS: f64 = 60.0;
    /// Fixed simulation step length in milliseconds
    pub const STEP_MS: f64 = 1000.0 / REFERENCE_FPS;
    /// Largest frame delta fed to the accumulator (tab switches, debugger stalls)
    pub const MAX_FRAME_MS: f64 = 100.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Actor physics (per step)
    pub const GRAVITY: f32 = 0.277;
    pub const FLAP_IMPULSE: f32 = -7.2;

    /// Actor geometry
    pub const ACTOR_X: f32 = 80.0;
    pub const ACTOR_WIDTH: f32 = 46.0;
    pub const ACTOR_HEIGHT: f32 = 32.0;
    /// Collision inset applied to every side of the actor box
    pub const HITBOX_PADDING: f32 = 6.0;
    /// Radius of the fallback disc drawn when no sprite is available
    pub const ACTOR_DRAW_RADIUS: f32 = 22.0;

    /// Obstacle defaults
    pub const SCROLL_SPEED: f32 = 2.737;
    pub const GAP_MIN: u32 = 130;
    pub const GAP_MAX: u32 = 180;
    /// Minimum visible face above and below every gap
    pub const FACE_MIN: u32 = 140;
    /// Collision width of an obstacle column
    pub const OBSTACLE_WIDTH: f32 = 70.0;
    /// Visual width of an obstacle cap (wider than the hit column)
    pub const OBSTACLE_DRAW_WIDTH: f32 = 146.0;

    /// Horizontal spacing = max(width * SPACING_RATIO, MIN_SPACING)
    pub const SPACING_RATIO: f32 = 0.30;
    pub const MIN_SPACING: f32 = 380.0;
    /// Pre-seeded obstacles cover [SEED_START_RATIO, SEED_END_RATIO) * width
    pub const SEED_START_RATIO: f32 = 0.4;
    pub const SEED_END_RATIO: f32 = 1.8;

    /// Sprite tilt limits (radians)
    pub const TILT_MIN: f32 = -0.35;
    pub const TILT_MAX: f32 = 0.5;
}

/// Sprite tilt for a given vertical velocity
#[inline]
pub fn tilt_for_velocity(vel: f32) -> f32 {
    (vel / 10.0).clamp(consts::TILT_MIN, consts::TILT_MAX)
}

/// Horizontal obstacle spacing for a viewport width
#[inline]
pub fn spacing_for_width(width: f32, ratio: f32, min_spacing: f32) -> f32 {
    (width * ratio).max(min_spacing)
}
