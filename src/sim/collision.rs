//! Collision detection for axis-aligned boxes and gap columns
//!
//! The actor is tested as a padded rectangle. An obstacle is a fixed-width
//! column that is solid everywhere except its gap, so the test is a
//! horizontal overlap followed by a vertical "outside the gap" check.

use glam::Vec2;

use super::state::Obstacle;

/// Axis-aligned bounding box (screen space, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box centred at `center` with the given half extents
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Shrink every side by `padding`
    pub fn inset(&self, padding: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(padding),
            max: self.max - Vec2::splat(padding),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Strict overlap on the x axis with the span [x0, x1)
    #[inline]
    pub fn overlaps_x(&self, x0: f32, x1: f32) -> bool {
        self.right() > x0 && self.left() < x1
    }
}

/// Which surface ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// Padded box reached the bottom edge
    Floor,
    /// Padded box reached the top edge
    Ceiling,
    /// Hit the solid part above a gap
    ObstacleTop { obstacle_id: u32 },
    /// Hit the solid part below a gap
    ObstacleBottom { obstacle_id: u32 },
}

/// Floor/ceiling check; touching counts
pub fn boundary_collision(hitbox: &Aabb, floor: f32) -> Option<CollisionKind> {
    if hitbox.bottom() >= floor {
        Some(CollisionKind::Floor)
    } else if hitbox.top() <= 0.0 {
        Some(CollisionKind::Ceiling)
    } else {
        None
    }
}

/// Test the actor box against one obstacle column
pub fn obstacle_collision(hitbox: &Aabb, obstacle: &Obstacle) -> Option<CollisionKind> {
    if !hitbox.overlaps_x(obstacle.x, obstacle.right()) {
        return None;
    }
    if hitbox.top() < obstacle.gap_top {
        Some(CollisionKind::ObstacleTop {
            obstacle_id: obstacle.id,
        })
    } else if hitbox.bottom() > obstacle.gap_bottom() {
        Some(CollisionKind::ObstacleBottom {
            obstacle_id: obstacle.id,
        })
    } else {
        None
    }
}

/// First obstacle (in spawn order) the box collides with
pub fn first_obstacle_collision<'a>(
    hitbox: &Aabb,
    obstacles: impl IntoIterator<Item = &'a Obstacle>,
) -> Option<CollisionKind> {
    obstacles
        .into_iter()
        .find_map(|obstacle| obstacle_collision(hitbox, obstacle))
}
