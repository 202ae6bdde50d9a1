//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod obstacles;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{Aabb, CollisionKind, boundary_collision, obstacle_collision};
pub use obstacles::{ObstacleStream, SpawnClock, Spacing, gap_top_range};
pub use physics::{apply_flap, apply_gravity};
pub use state::{Actor, GameEvent, GamePhase, GameState, Obstacle, Viewport};
pub use tick::{StepOutcome, StepSignal, TickInput, step, tick};
