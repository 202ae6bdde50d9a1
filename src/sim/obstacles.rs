//! Obstacle stream: spawning, scrolling and recycling gap columns
//!
//! Obstacles are spawned ahead of the viewport and dropped once their right
//! edge has scrolled past the left edge. One `Spacing` value, fixed at reset,
//! drives the pre-seed spacing, the default spawn offset and the spawn
//! interval, so visual spacing stays constant whatever the tuning.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Obstacle, Viewport};
use crate::consts::STEP_MS;
use crate::spacing_for_width;
use crate::tuning::Tuning;

/// Horizontal spacing between obstacles and the matching spawn interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    /// Pixels between consecutive obstacle left edges
    pub px: f32,
    /// Simulated milliseconds for an obstacle to scroll `px`
    pub interval_ms: f64,
}

impl Spacing {
    pub fn for_viewport(tuning: &Tuning, viewport: Viewport) -> Self {
        let px = spacing_for_width(viewport.width, tuning.spacing_ratio, tuning.min_spacing);
        Self {
            px,
            interval_ms: tuning.spawn_interval_ms(px),
        }
    }
}

/// Time-based spawn cadence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnClock {
    pub last_spawn_ms: f64,
    pub interval_ms: f64,
}

impl SpawnClock {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            last_spawn_ms: 0.0,
            interval_ms,
        }
    }

    /// Clock phased so the first timed spawn lands one spacing behind the
    /// last pre-seeded obstacle
    pub fn after_seed(
        last_seeded_x: Option<f32>,
        tuning: &Tuning,
        viewport: Viewport,
        spacing: Spacing,
        now_ms: f64,
    ) -> Self {
        // A timed spawn appears at width + spacing; wait until the last seed
        // has scrolled to the right edge
        let delay_ms = match last_seeded_x {
            Some(x) => ((x - viewport.width).max(0.0) / tuning.scroll_speed) as f64 * STEP_MS,
            None => 0.0,
        };
        Self {
            last_spawn_ms: now_ms + delay_ms - spacing.interval_ms,
            interval_ms: spacing.interval_ms,
        }
    }

    /// Elapsed time since the last spawn exceeds the interval
    #[inline]
    pub fn due(&self, now_ms: f64) -> bool {
        now_ms - self.last_spawn_ms > self.interval_ms
    }

    /// Record a spawn (advances by whole intervals to avoid drift)
    pub fn mark(&mut self, now_ms: f64) {
        self.last_spawn_ms += self.interval_ms;
        if now_ms - self.last_spawn_ms > self.interval_ms {
            self.last_spawn_ms = now_ms;
        }
    }
}

/// Inclusive range of valid gap-top offsets
///
/// Keeps `face_min` above and below the gap. On a viewport too short for
/// that, the faces shrink evenly so the gap still fits on screen.
pub fn gap_top_range(gap: u32, viewport_height: f32, face_min: u32) -> (u32, u32) {
    let height = viewport_height.max(0.0) as u32;
    let room = height.saturating_sub(gap);
    let face = face_min.min(room / 2);
    (face, room - face)
}

/// Ordered obstacle sequence (spawn order)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleStream {
    items: Vec<Obstacle>,
    next_id: u32,
}

impl ObstacleStream {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }

    /// Spawn one obstacle at `at`, or just beyond the right edge by default
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        tuning: &Tuning,
        viewport: Viewport,
        spacing: Spacing,
        at: Option<f32>,
    ) -> &Obstacle {
        let gap = rng
            .random_range(tuning.gap_min..=tuning.gap_max)
            .min(viewport.height.max(0.0) as u32);
        let (min_top, max_top) = gap_top_range(gap, viewport.height, tuning.face_min);
        let gap_top = rng.random_range(min_top..=max_top);
        let x = at.unwrap_or(viewport.width + spacing.px);

        let id = self.next_id;
        self.next_id += 1;
        log::debug!("Spawn obstacle {} at x={} gap={}@{}", id, x, gap, gap_top);

        self.items.push(Obstacle {
            id,
            x,
            gap_top: gap_top as f32,
            gap: gap as f32,
            width: tuning.obstacle_width,
            passed: false,
        });
        &self.items[self.items.len() - 1]
    }

    /// Pre-seed obstacles across the visible and near-off-screen width
    pub fn seed<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        tuning: &Tuning,
        viewport: Viewport,
        spacing: Spacing,
    ) {
        let end = viewport.width * tuning.seed_end_ratio;
        let mut x = viewport.width * tuning.seed_start_ratio;
        while x < end {
            self.spawn(rng, tuning, viewport, spacing, Some(x));
            x += spacing.px;
        }
    }

    /// Scroll every obstacle left
    pub fn advance(&mut self, speed: f32) {
        for obstacle in &mut self.items {
            obstacle.x -= speed;
        }
    }

    /// Drop obstacles whose right edge is at or left of `threshold_x`
    ///
    /// Returns how many were removed.
    pub fn prune(&mut self, threshold_x: f32) -> usize {
        let before = self.items.len();
        self.items.retain(|o| o.right() > threshold_x);
        before - self.items.len()
    }

    /// Drop everything (ids keep counting)
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Obstacle> {
        self.items.iter_mut()
    }

    pub fn last(&self) -> Option<&Obstacle> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.items
    }

    /// Insert a pre-built obstacle (tests, replays)
    pub fn push(&mut self, mut obstacle: Obstacle) {
        obstacle.id = self.next_id;
        self.next_id += 1;
        self.items.push(obstacle);
    }
}

impl Default for ObstacleStream {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ObstacleStream {
    type Item = &'a Obstacle;
    type IntoIter = std::slice::Iter<'a, Obstacle>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
