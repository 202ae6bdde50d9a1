//! Fixed timestep simulation tick
//!
//! `step` is the pure per-frame core: physics, boundary check, obstacle
//! scroll/prune, column collision, scoring. `tick` wraps it with input,
//! phase gating, spawn cadence and phase transitions.

use super::autopilot;
use super::collision::{CollisionKind, boundary_collision, first_obstacle_collision};
use super::physics::apply_gravity;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::STEP_MS;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap before this step
    pub flap: bool,
    /// Demo mode - the autopilot flies
    pub autopilot: bool,
}

/// Terminal signal of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSignal {
    Continue,
    GameOver(CollisionKind),
}

/// Result of one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub signal: StepSignal,
    /// Points gained this step
    pub scored: u32,
}

impl StepOutcome {
    /// Nothing happened (phase gated)
    pub const NONE: StepOutcome = StepOutcome {
        signal: StepSignal::Continue,
        scored: 0,
    };

    fn game_over(kind: CollisionKind) -> Self {
        Self {
            signal: StepSignal::GameOver(kind),
            scored: 0,
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.signal, StepSignal::GameOver(_))
    }
}

/// Advance physics, obstacles, collisions and score by one step
///
/// Does not look at the phase; callers gate on `Running`.
pub fn step(state: &mut GameState) -> StepOutcome {
    apply_gravity(&mut state.actor, state.tuning.gravity);

    let hitbox = state.actor.hitbox();
    if let Some(kind) = boundary_collision(&hitbox, state.viewport.height) {
        return StepOutcome::game_over(kind);
    }

    state.obstacles.advance(state.tuning.scroll_speed);
    state.obstacles.prune(0.0);

    if let Some(kind) = first_obstacle_collision(&hitbox, &state.obstacles) {
        return StepOutcome::game_over(kind);
    }

    let actor_x = state.actor.x;
    let mut scored = 0;
    for obstacle in state.obstacles.iter_mut() {
        if !obstacle.passed && obstacle.right() < actor_x {
            obstacle.passed = true;
            scored += 1;
        }
    }
    state.score += scored;

    StepOutcome {
        signal: StepSignal::Continue,
        scored,
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> StepOutcome {
    if state.phase != GamePhase::Running {
        return StepOutcome::NONE;
    }

    if input.flap || (input.autopilot && autopilot::wants_flap(state)) {
        state.flap();
    }

    state.time_ticks += 1;

    if state.spawn_clock.due(state.time_ms) {
        state.obstacles.spawn(
            &mut state.rng,
            &state.tuning,
            state.viewport,
            state.spacing,
            None,
        );
        state.spawn_clock.mark(state.time_ms);
    }

    let outcome = step(state);
    state.time_ms += STEP_MS;

    // One event per point so the HUD sees every intermediate score
    let first = state.score - outcome.scored;
    for score in (first + 1)..=state.score {
        state.events.push(GameEvent::Scored { score });
    }

    if let StepSignal::GameOver(kind) = outcome.signal {
        state.phase = GamePhase::GameOver;
        state.collision = Some(kind);
        log::info!(
            "Run over after {} ticks: {:?}, score {}",
            state.time_ticks,
            kind,
            state.score
        );
    }

    outcome
}
