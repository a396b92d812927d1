//! Planar pose sampling from odometry readings.

use crate::core::types::{OdometryReading, PlanarPose, RotationMatrix};

/// Converts odometry readings into planar poses.
///
/// The orientation is expanded into a rotation matrix and decomposed into
/// roll/pitch/yaw; only yaw survives as heading. Position is copied as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseSampler;

impl PoseSampler {
    /// Create a new sampler.
    pub fn new() -> Self {
        Self
    }

    /// Sample a planar pose from one reading.
    ///
    /// A degenerate quaternion (e.g. all zeros) yields a NaN heading.
    pub fn sample(&self, reading: &OdometryReading) -> PlanarPose {
        let rotation = RotationMatrix::from_quaternion(&reading.orientation);
        let (_roll, _pitch, yaw) = rotation.to_rpy();

        PlanarPose {
            x: reading.position[0],
            y: reading.position[1],
            heading: yaw,
        }
    }
}
