//! Homogeneous rigid transform restricted to planar motion.

use serde::{Deserialize, Serialize};

use super::cloud::Point3D;
use crate::core::math::normalize_angle;

/// 4x4 homogeneous rigid transform.
///
/// Maps points from a source frame into a target frame. Transforms
/// produced by registration are planar: a rotation about z plus an
/// (x, y) translation, so the matrix has the form
///
/// ```text
/// | cos θ  -sin θ  0  tx |
/// | sin θ   cos θ  0  ty |
/// |   0       0    1   0 |
/// |   0       0    0   1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    matrix: [[f32; 4]; 4],
}

impl RigidTransform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self::planar(0.0, 0.0, 0.0)
    }

    /// Planar transform: rotation `yaw` about z, then translation (tx, ty).
    pub fn planar(tx: f32, ty: f32, yaw: f32) -> Self {
        let (s, c) = yaw.sin_cos();
        Self {
            matrix: [
                [c, -s, 0.0, tx],
                [s, c, 0.0, ty],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Wrap a raw row-major matrix.
    pub fn from_matrix(matrix: [[f32; 4]; 4]) -> Self {
        Self { matrix }
    }

    /// Row-major matrix.
    pub fn matrix(&self) -> &[[f32; 4]; 4] {
        &self.matrix
    }

    /// Translation component (tx, ty, tz).
    pub fn translation(&self) -> [f32; 3] {
        [self.matrix[0][3], self.matrix[1][3], self.matrix[2][3]]
    }

    /// Rotation about z in radians, normalized to [-π, π].
    pub fn yaw(&self) -> f32 {
        normalize_angle(self.matrix[1][0].atan2(self.matrix[0][0]))
    }

    /// Apply the transform to a point.
    pub fn apply(&self, p: &Point3D) -> Point3D {
        let m = &self.matrix;
        Point3D::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
            m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
        )
    }

    /// True if every matrix entry is finite.
    pub fn is_finite(&self) -> bool {
        self.matrix.iter().flatten().all(|v| v.is_finite())
    }

    /// Entries in row-major order.
    pub fn to_row_major(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (i, v) in self.matrix.iter().flatten().enumerate() {
            out[i] = *v;
        }
        out
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}
