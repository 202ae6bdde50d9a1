//! Demo-mode pilot
//!
//! Flaps whenever the next step would carry the actor below a hover line
//! just above the next gap's lower face. A flap rises about 90 px before
//! gravity wins again, which fits inside the smallest default gap.

use super::state::GameState;

/// Clearance kept between the hitbox bottom and the gap's lower face
const HOVER_MARGIN: f32 = 8.0;

/// Hover line (actor centre y) the pilot defends
pub fn hover_line(state: &GameState) -> f32 {
    let hitbox = state.actor.hitbox();
    let half_height = (hitbox.bottom() - hitbox.top()) / 2.0;
    state
        .obstacles
        .iter()
        .find(|o| o.right() >= hitbox.left())
        .map(|o| o.gap_bottom() - half_height - HOVER_MARGIN)
        .unwrap_or(state.viewport.height / 2.0)
}

/// Whether the pilot flaps this step
pub fn wants_flap(state: &GameState) -> bool {
    let predicted = state.actor.y + state.actor.vel + state.tuning.gravity;
    predicted >= hover_line(state)
}
