#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement strategies that advance enemy kinematics once per tick.
//!
//! Strategies are plain [`Motion`] values with no state of their own; every
//! per-entity quantity they consume, such as the oscillation angle, lives in
//! the entity's [`Kinematics`]. The same strategy value can therefore drive any
//! number of entities.

use cowboy_shooter_core::{ticks_to_seconds, Kinematics, Motion};
use rand::Rng;

const RAMP_SCALE: f32 = 0.25;
const JITTER_PROBABILITY: f64 = 0.01;
const DRIFT_ANGLE_STEP: f32 = 0.1;
const ZIG_ZAG_ANGLE_STEP: f32 = 0.033;

/// Speed reached after `elapsed_ticks` of play.
///
/// Grows with the logarithm of elapsed seconds and never exceeds `max_speed`.
#[must_use]
pub fn ramped_speed(base_speed: f32, max_speed: f32, elapsed_ticks: u64) -> f32 {
    let seconds = ticks_to_seconds(elapsed_ticks) as f32;
    let headroom = (max_speed - base_speed).max(0.0);
    base_speed + (seconds.ln_1p() * RAMP_SCALE).min(headroom)
}

/// Advances `body` by a single tick according to `motion`.
///
/// When `elapsed_ticks` is provided the speed is first recomputed with
/// [`ramped_speed`]; otherwise the current speed is reused.
pub fn advance<R>(motion: Motion, body: &mut Kinematics, elapsed_ticks: Option<u64>, rng: &mut R)
where
    R: Rng + ?Sized,
{
    if let Some(elapsed_ticks) = elapsed_ticks {
        body.speed = ramped_speed(body.base_speed, body.max_speed, elapsed_ticks);
    }

    match motion {
        Motion::LinearDescent => {
            body.position.y += body.speed;
            if rng.gen_bool(JITTER_PROBABILITY) {
                let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                body.position.x += sign * body.speed;
            }
        }
        Motion::SinusoidalDrift => {
            body.position.y += body.angle.sin() * body.speed;
            body.position.x += body.speed;
            body.angle += DRIFT_ANGLE_STEP;
        }
        Motion::ZigZag => {
            body.position.y += body.speed;
            body.position.x += body.angle.cos() * body.speed;
            body.angle += ZIG_ZAG_ANGLE_STEP;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_starts_at_base_speed() {
        assert_eq!(ramped_speed(1.0, 3.0, 0), 1.0);
    }

    #[test]
    fn ramp_follows_logarithmic_curve() {
        let one_minute = ramped_speed(1.0, 3.0, 3_600);
        let expected = 1.0 + 61.0_f32.ln() * 0.25;

        assert!((one_minute - expected).abs() < 1e-5);
    }

    #[test]
    fn ramp_is_capped_at_max_speed() {
        assert_eq!(ramped_speed(1.0, 3.0, u64::MAX / 2), 3.0);
    }

    #[test]
    fn ramp_tolerates_inverted_bounds() {
        assert_eq!(ramped_speed(2.0, 1.0, 600), 2.0);
    }
}
