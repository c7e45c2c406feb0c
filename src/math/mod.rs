//! Math utilities for the projection and movement code.
//!
//! - [`vec`] holds the small vector types used for world and view space
//! - angle helpers keep yaw in the canonical `[-π, π)` range

pub mod vec;

use std::f32::consts::{PI, TAU};

/// Converts degrees to radians.
///
/// # Example
/// ```
/// use mantrap::math::deg_to_rad;
///
/// assert!((deg_to_rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
/// ```
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * (PI / 180.0)
}

/// Converts radians to degrees.
pub fn rad_to_deg(radians: f32) -> f32 {
    radians * (180.0 / PI)
}

/// Wraps an angle into `[-π, π)`.
///
/// Values already in range come back bit-identical, which keeps snapped
/// yaw constants exact.
pub fn wrap_pi(radians: f32) -> f32 {
    if (-PI..PI).contains(&radians) {
        return radians;
    }
    let wrapped = (radians + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn wrap_360(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Cubic ease `3t² − 2t³`, with `t` clamped to `[0, 1]`.
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_pi_keeps_in_range_values_exact() {
        for value in [0.0, PI / 2.0, -PI, -PI / 2.0, 3.0, -3.0] {
            assert_eq!(wrap_pi(value), value);
        }
    }

    #[test]
    fn test_wrap_pi_folds_out_of_range_values() {
        assert!((wrap_pi(PI) + PI).abs() < 1e-6);
        assert!((wrap_pi(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_pi(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        for step in -40..40 {
            let wrapped = wrap_pi(step as f32 * 0.7);
            assert!((-PI..PI).contains(&wrapped), "{wrapped}");
        }
    }

    #[test]
    fn test_smoothstep_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(0.5), 0.5);
        assert_eq!(smoothstep(2.0), 1.0);
        assert!(smoothstep(0.25) < 0.25);
    }

    #[test]
    fn test_wrap_360() {
        assert_eq!(wrap_360(-90.0), 270.0);
        assert_eq!(wrap_360(720.0), 0.0);
        assert!((rad_to_deg(deg_to_rad(45.0)) - 45.0).abs() < 1e-4);
    }
}
