//! Core data types for graph building.
//!
//! - [`PlanarPose`]: Agent pose (x, y, heading) in meters and radians
//! - [`Quaternion`], [`OdometryReading`]: Raw orientation + position input
//! - [`RotationMatrix`]: 3x3 rotation with Euler decomposition
//! - [`Point3D`], [`PointSet`]: 3D observations
//! - [`RigidTransform`]: 4x4 homogeneous planar transform
//! - [`Timestamped<T>`]: Generic timestamp wrapper

mod cloud;
mod odometry;
mod pose;
mod rotation;
mod timestamped;
mod transform;

pub use cloud::{Point3D, PointSet};
pub use odometry::{OdometryReading, Quaternion};
pub use pose::PlanarPose;
pub use rotation::RotationMatrix;
pub use timestamped::Timestamped;
pub use transform::RigidTransform;
