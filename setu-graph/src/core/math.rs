//! Mathematical primitives for planar pose handling.

use std::f32::consts::PI;

/// Normalize angle to [-π, π].
///
/// # Example
/// ```
/// use setu_graph::core::math::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(2.0 * PI + 0.5) - 0.5).abs() < 1e-5);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

/// Euclidean distance between two planar positions.
#[inline]
pub fn planar_distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = ax - bx;
    let dy = ay - by;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_angle_wraps() {
        assert_relative_eq!(normalize_angle(0.0), 0.0);
        assert_relative_eq!(normalize_angle(2.0 * PI), 0.0, epsilon = 1e-6);
        assert_relative_eq!(normalize_angle(-3.0 * PI).abs(), PI, epsilon = 1e-5);
        assert_relative_eq!(normalize_angle(PI + 0.001), -PI + 0.001, epsilon = 1e-5);
    }

    #[test]
    fn test_normalize_keeps_nan() {
        assert!(normalize_angle(f32::NAN).is_nan());
    }

    #[test]
    fn test_planar_distance() {
        assert_relative_eq!(planar_distance(0.0, 0.0, 3.0, 4.0), 5.0);
        assert_relative_eq!(planar_distance(1.0, 1.0, 1.0, 1.0), 0.0);
    }
}
