//! Planar pose type.

use serde::{Deserialize, Serialize};

use crate::core::math::{normalize_angle, planar_distance};

/// Agent pose in the plane.
///
/// Position (x, y) in meters and heading in radians, normalized to [-π, π].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarPose {
    /// X position in meters
    pub x: f32,
    /// Y position in meters
    pub y: f32,
    /// Heading in radians, normalized to [-π, π]
    pub heading: f32,
}

impl PlanarPose {
    /// Create a new pose with heading normalized to [-π, π].
    #[inline]
    pub fn new(x: f32, y: f32, heading: f32) -> Self {
        Self {
            x,
            y,
            heading: normalize_angle(heading),
        }
    }

    /// Pose at origin with zero heading.
    #[inline]
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            heading: 0.0,
        }
    }

    /// Euclidean distance over (x, y) to another pose. Heading is ignored.
    #[inline]
    pub fn distance_to(&self, other: &PlanarPose) -> f32 {
        planar_distance(self.x, self.y, other.x, other.y)
    }

    /// Pose as the ordered triple `[x, y, heading]`.
    #[inline]
    pub fn to_array(&self) -> [f32; 3] {
        [self.x, self.y, self.heading]
    }
}

impl Default for PlanarPose {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f32; 3]> for PlanarPose {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}
