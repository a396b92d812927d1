//! Raw odometry input types.

use serde::{Deserialize, Serialize};

/// Orientation quaternion.
///
/// Field order follows the usual robotics message layout (x, y, z, w).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    /// Create a quaternion from its components.
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Identity quaternion (no rotation).
    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Quaternion for a pure rotation of `yaw` radians about the z axis.
    pub fn from_yaw(yaw: f32) -> Self {
        let (s, c) = (yaw * 0.5).sin_cos();
        Self::new(0.0, 0.0, s, c)
    }

    /// Squared norm. Equals 1.0 for a unit quaternion.
    pub fn norm_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

/// One position + orientation reading from the odometry stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OdometryReading {
    /// Position [x, y] in meters
    pub position: [f32; 2],
    /// Orientation as a unit quaternion
    pub orientation: Quaternion,
}

impl OdometryReading {
    /// Create a new reading.
    pub fn new(x: f32, y: f32, orientation: Quaternion) -> Self {
        Self {
            position: [x, y],
            orientation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_yaw_is_unit() {
        let q = Quaternion::from_yaw(1.2);
        assert_relative_eq!(q.norm_squared(), 1.0, epsilon = 1e-6);
        assert_eq!(q.x, 0.0);
        assert_eq!(q.y, 0.0);
    }
}
