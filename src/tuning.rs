//! Data-driven game balance
//!
//! Every number the simulation reads lives here so a run can be re-tuned
//! without touching code. Stored as JSON under `flappy_canvas_tuning`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::storage::KeyValueStore;

/// Tuning values for one run (per-step units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Added to vertical velocity every step
    pub gravity: f32,
    /// Velocity set by a flap (negative = up)
    pub flap_impulse: f32,
    /// Obstacle scroll per step (pixels)
    pub scroll_speed: f32,
    /// Inclusive gap height range
    pub gap_min: u32,
    pub gap_max: u32,
    /// Minimum face height above and below a gap
    pub face_min: u32,
    pub obstacle_width: f32,
    pub actor_x: f32,
    pub actor_width: f32,
    pub actor_height: f32,
    pub hitbox_padding: f32,
    pub spacing_ratio: f32,
    pub min_spacing: f32,
    pub seed_start_ratio: f32,
    pub seed_end_ratio: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            scroll_speed: SCROLL_SPEED,
            gap_min: GAP_MIN,
            gap_max: GAP_MAX,
            face_min: FACE_MIN,
            obstacle_width: OBSTACLE_WIDTH,
            actor_x: ACTOR_X,
            actor_width: ACTOR_WIDTH,
            actor_height: ACTOR_HEIGHT,
            hitbox_padding: HITBOX_PADDING,
            spacing_ratio: SPACING_RATIO,
            min_spacing: MIN_SPACING,
            seed_start_ratio: SEED_START_RATIO,
            seed_end_ratio: SEED_END_RATIO,
        }
    }
}

/// Why a tuning set was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// A value that must be strictly positive was not
    NotPositive { field: &'static str, value: f32 },
    /// Flap impulse must push upward
    FlapNotUpward(f32),
    /// gap_min > gap_max
    InvertedGapRange { min: u32, max: u32 },
    /// Padding eats the whole actor box
    PaddingTooLarge { padding: f32 },
    /// Seed range ends before it starts
    InvertedSeedRange { start: f32, end: f32 },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::NotPositive { field, value } => {
                write!(f, "{} must be positive (got {})", field, value)
            }
            TuningError::FlapNotUpward(v) => write!(f, "flap_impulse must be negative (got {})", v),
            TuningError::InvertedGapRange { min, max } => {
                write!(f, "gap_min {} exceeds gap_max {}", min, max)
            }
            TuningError::PaddingTooLarge { padding } => {
                write!(f, "hitbox_padding {} leaves an empty hitbox", padding)
            }
            TuningError::InvertedSeedRange { start, end } => {
                write!(f, "seed range {}..{} is empty", start, end)
            }
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// LocalStorage / file key
    pub const STORAGE_KEY: &'static str = "flappy_canvas_tuning";

    /// Check that the values describe a playable game
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("gravity", self.gravity),
            ("scroll_speed", self.scroll_speed),
            ("obstacle_width", self.obstacle_width),
            ("actor_width", self.actor_width),
            ("actor_height", self.actor_height),
            ("min_spacing", self.min_spacing),
            ("gap_min", self.gap_min as f32),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }
        if !(self.flap_impulse < 0.0) {
            return Err(TuningError::FlapNotUpward(self.flap_impulse));
        }
        if self.gap_min > self.gap_max {
            return Err(TuningError::InvertedGapRange {
                min: self.gap_min,
                max: self.gap_max,
            });
        }
        let half_min = self.actor_width.min(self.actor_height) / 2.0;
        if self.hitbox_padding < 0.0 || self.hitbox_padding >= half_min {
            return Err(TuningError::PaddingTooLarge {
                padding: self.hitbox_padding,
            });
        }
        if self.seed_end_ratio <= self.seed_start_ratio {
            return Err(TuningError::InvertedSeedRange {
                start: self.seed_start_ratio,
                end: self.seed_end_ratio,
            });
        }
        Ok(())
    }

    /// Spawn interval in milliseconds for a given pixel spacing
    ///
    /// Time for an obstacle to scroll `spacing` pixels at the reference rate.
    pub fn spawn_interval_ms(&self, spacing: f32) -> f64 {
        spacing as f64 / (self.scroll_speed as f64 * REFERENCE_FPS) * 1000.0
    }

    /// Load tuning overrides from a store, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Tuning>(&json) {
                Ok(tuning) => match tuning.validate() {
                    Ok(()) => {
                        log::info!("Loaded tuning overrides");
                        tuning
                    }
                    Err(e) => {
                        log::warn!("Ignoring invalid tuning: {}", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("Ignoring malformed tuning JSON: {}", e);
                    Self::default()
                }
            },
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Tuning unavailable: {}", e);
                Self::default()
            }
        }
    }
}
