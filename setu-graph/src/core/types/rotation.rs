//! 3x3 rotation matrix with Euler angle extraction.

use std::f32::consts::FRAC_PI_2;

use super::odometry::Quaternion;

/// Row-major 3x3 rotation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix {
    pub m: [[f32; 3]; 3],
}

impl RotationMatrix {
    /// Build the rotation matrix of a quaternion.
    ///
    /// The quaternion is scaled by `2 / |q|²`, so slightly non-unit input
    /// still yields a proper rotation. A zero quaternion yields NaN entries.
    pub fn from_quaternion(q: &Quaternion) -> Self {
        let d = q.norm_squared();
        let s = 2.0 / d;
        let (xs, ys, zs) = (q.x * s, q.y * s, q.z * s);
        let (wx, wy, wz) = (q.w * xs, q.w * ys, q.w * zs);
        let (xx, xy, xz) = (q.x * xs, q.x * ys, q.x * zs);
        let (yy, yz, zz) = (q.y * ys, q.y * zs, q.z * zs);

        Self {
            m: [
                [1.0 - (yy + zz), xy - wz, xz + wy],
                [xy + wz, 1.0 - (xx + zz), yz - wx],
                [xz - wy, yz + wx, 1.0 - (xx + yy)],
            ],
        }
    }

    /// Decompose into (roll, pitch, yaw) using the ZYX convention.
    ///
    /// ```text
    /// R = Rz(yaw) · Ry(pitch) · Rx(roll)
    /// ```
    ///
    /// At gimbal lock (|pitch| = π/2) roll is fixed to zero and the remaining
    /// rotation is folded into yaw.
    pub fn to_rpy(&self) -> (f32, f32, f32) {
        let m = &self.m;

        if m[2][0].abs() >= 1.0 {
            let yaw = 0.0;
            if m[2][0] < 0.0 {
                let pitch = FRAC_PI_2;
                let roll = yaw + m[0][1].atan2(m[0][2]);
                (roll, pitch, yaw)
            } else {
                let pitch = -FRAC_PI_2;
                let roll = -yaw + (-m[0][1]).atan2(-m[0][2]);
                (roll, pitch, yaw)
            }
        } else {
            let pitch = -m[2][0].asin();
            let cp = pitch.cos();
            let roll = (m[2][1] / cp).atan2(m[2][2] / cp);
            let yaw = (m[1][0] / cp).atan2(m[0][0] / cp);
            (roll, pitch, yaw)
        }
    }
}
