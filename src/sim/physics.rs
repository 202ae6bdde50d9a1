//! Actor physics: constant gravity and a non-accumulating flap impulse

use super::state::Actor;

/// Add gravity to velocity, then velocity to position
#[inline]
pub fn apply_gravity(actor: &mut Actor, gravity: f32) {
    actor.vel += gravity;
    actor.y += actor.vel;
}

/// Overwrite velocity with the flap impulse
#[inline]
pub fn apply_flap(actor: &mut Actor, impulse: f32) {
    actor.vel = impulse;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn actor() -> Actor {
        Actor::new(&Tuning::default(), Viewport::new(800.0, 600.0))
    }

    #[test]
    fn test_one_step_from_rest() {
        let mut a = actor();
        assert_eq!(a.y, 300.0);
        apply_gravity(&mut a, 0.277);
        assert!((a.vel - 0.277).abs() < 1e-6);
        assert!((a.y - 300.277).abs() < 1e-4);
    }

    #[test]
    fn test_flap_is_not_cumulative() {
        let mut a = actor();
        apply_flap(&mut a, -7.2);
        apply_flap(&mut a, -7.2);
        assert_eq!(a.vel, -7.2);
    }

    proptest! {
        #[test]
        fn prop_gravity_adds_exactly_g(vel in -20.0f32..20.0, g in 0.01f32..2.0) {
            let mut a = actor();
            a.vel = vel;
            let y0 = a.y;
            apply_gravity(&mut a, g);
            prop_assert_eq!(a.vel, vel + g);
            prop_assert_eq!(a.y, y0 + (vel + g));
        }

        #[test]
        fn prop_flap_overwrites_any_velocity(vel in -50.0f32..50.0) {
            let mut a = actor();
            a.vel = vel;
            apply_flap(&mut a, -7.2);
            prop_assert_eq!(a.vel, -7.2);
        }
    }
}
