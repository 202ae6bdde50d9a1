//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, CollisionKind};
use super::obstacles::{ObstacleStream, SpawnClock, Spacing};
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, before the first start
    Idle,
    /// Active gameplay
    Running,
    /// Frozen mid-run
    Paused,
    /// Run ended, waiting for a restart
    GameOver,
}

/// Drawable area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The player-controlled falling/flapping entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Fixed horizontal centre
    pub x: f32,
    /// Vertical centre (y grows downward)
    pub y: f32,
    /// Vertical velocity (pixels per step)
    pub vel: f32,
    pub width: f32,
    pub height: f32,
    /// Collision inset on every side
    pub padding: f32,
}

impl Actor {
    pub fn new(tuning: &Tuning, viewport: Viewport) -> Self {
        Self {
            x: tuning.actor_x,
            y: viewport.height / 2.0,
            vel: 0.0,
            width: tuning.actor_width,
            height: tuning.actor_height,
            padding: tuning.hitbox_padding,
        }
    }

    /// Put the actor back at the vertical centre, at rest
    pub fn reset(&mut self, viewport: Viewport) {
        self.y = viewport.height / 2.0;
        self.vel = 0.0;
    }

    /// Unpadded sprite bounds
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(
            Vec2::new(self.x, self.y),
            Vec2::new(self.width / 2.0, self.height / 2.0),
        )
    }

    /// Padded collision box
    pub fn hitbox(&self) -> Aabb {
        self.bounds().inset(self.padding)
    }
}

/// A paired top/bottom barrier with a traversable gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge of the column
    pub x: f32,
    /// Lower face of the top barrier
    pub gap_top: f32,
    /// Gap height
    pub gap: f32,
    /// Collision width of the column
    pub width: f32,
    /// Already scored
    pub passed: bool,
}

impl Obstacle {
    /// Upper face of the bottom barrier
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + self.gap
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Height of the bottom barrier within a viewport
    #[inline]
    pub fn bottom_face(&self, viewport_height: f32) -> f32 {
        viewport_height - self.gap_bottom()
    }
}

/// Signals produced for the UI collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Flapped,
    Scored { score: u32 },
    Paused,
    Resumed,
    GameOver { score: u32, best: u32, new_best: bool },
    BestUpdated { best: u32 },
}

/// Complete run state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub actor: Actor,
    pub obstacles: ObstacleStream,
    /// Spacing fixed at the last reset
    pub spacing: Spacing,
    pub spawn_clock: SpawnClock,
    pub score: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated time (ms), advanced by one step per tick
    pub time_ms: f64,
    /// What ended the run, if it has ended
    pub collision: Option<CollisionKind>,
    /// Events not yet drained by the session
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle game state with the given seed
    pub fn new(seed: u64, tuning: Tuning, viewport: Viewport) -> Self {
        let spacing = Spacing::for_viewport(&tuning, viewport);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            viewport,
            actor: Actor::new(&tuning, viewport),
            obstacles: ObstacleStream::new(),
            spacing,
            spawn_clock: SpawnClock::new(spacing.interval_ms),
            score: 0,
            phase: GamePhase::Idle,
            time_ticks: 0,
            time_ms: 0.0,
            collision: None,
            events: Vec::new(),
        }
    }

    /// Reset for a fresh run and enter `Running`
    ///
    /// Re-seeds the RNG, recomputes spacing from the current viewport and
    /// pre-seeds obstacles across the visible and near-off-screen width.
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.actor.reset(self.viewport);
        self.score = 0;
        self.time_ticks = 0;
        self.time_ms = 0.0;
        self.collision = None;
        self.spacing = Spacing::for_viewport(&self.tuning, self.viewport);
        self.obstacles.clear();
        self.obstacles
            .seed(&mut self.rng, &self.tuning, self.viewport, self.spacing);
        self.spawn_clock = SpawnClock::after_seed(
            self.obstacles.last().map(|o| o.x),
            &self.tuning,
            self.viewport,
            self.spacing,
            self.time_ms,
        );
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::Started);
    }

    /// Flap: overwrite velocity with the impulse
    ///
    /// No-op once the run is over. Returns whether the flap was applied.
    pub fn flap(&mut self) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        super::physics::apply_flap(&mut self.actor, self.tuning.flap_impulse);
        self.events.push(GameEvent::Flapped);
        true
    }

    /// Apply a new viewport size
    ///
    /// Floor and default spawn position follow immediately; spacing waits
    /// for the next reset. On the title screen the actor is re-centred.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.phase == GamePhase::Idle {
            self.actor.reset(viewport);
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_and_centred() {
        let state = GameState::new(1, Tuning::default(), Viewport::new(800.0, 600.0));
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.actor.y, 300.0);
        assert_eq!(state.actor.vel, 0.0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_reset_seeds_obstacles_and_runs() {
        let mut state = GameState::new(1, Tuning::default(), Viewport::new(800.0, 600.0));
        state.reset(42);
        assert_eq!(state.phase, GamePhase::Running);
        // Spacing max(240, 380) = 380; x = 320, 700, 1080 (< 1440)
        let xs: Vec<f32> = state.obstacles.iter().map(|o| o.x).collect();
        assert_eq!(xs, vec![320.0, 700.0, 1080.0]);
        assert_eq!(state.drain_events(), vec![GameEvent::Started]);
    }

    #[test]
    fn test_flap_ignored_after_game_over() {
        let mut state = GameState::new(1, Tuning::default(), Viewport::new(800.0, 600.0));
        state.reset(1);
        state.actor.vel = 3.0;
        state.phase = GamePhase::GameOver;
        assert!(!state.flap());
        assert_eq!(state.actor.vel, 3.0);
    }

    #[test]
    fn test_hitbox_is_padded() {
        let actor = Actor::new(&Tuning::default(), Viewport::new(800.0, 600.0));
        let hb = actor.hitbox();
        assert_eq!(hb.top(), 300.0 - 16.0 + 6.0);
        assert_eq!(hb.bottom(), 300.0 + 16.0 - 6.0);
        assert_eq!(hb.left(), 80.0 - 23.0 + 6.0);
    }

    #[test]
    fn test_resize_recentres_only_when_idle() {
        let mut state = GameState::new(1, Tuning::default(), Viewport::new(800.0, 600.0));
        state.resize(Viewport::new(1024.0, 768.0));
        assert_eq!(state.actor.y, 384.0);

        state.reset(1);
        state.actor.y = 100.0;
        state.resize(Viewport::new(800.0, 600.0));
        assert_eq!(state.actor.y, 100.0);
        assert_eq!(state.viewport.height, 600.0);
    }
}
