//! Point set registration (transform estimation between two clouds).
//!
//! # Components
//!
//! - [`Registration`]: Opaque capability that fits a rigid transform to two
//!   point sets in a single call
//! - [`PlanarPointToPoint`]: Default closed-form planar implementation
//! - [`TransformEstimator`]: Bounded random subsampling in front of a
//!   registration primitive
//!
//! # Example
//!
//! ```
//! use setu_graph::algorithms::registration::{
//!     CorrespondenceMode, EstimatorConfig, PlanarPointToPoint, RegistrationConfig,
//!     TransformEstimator,
//! };
//! use setu_graph::core::types::{Point3D, PointSet};
//!
//! let previous_cloud: PointSet = (0..40)
//!     .map(|i| Point3D::new((i % 8) as f32 * 0.25, (i / 8) as f32 * 0.5, 0.0))
//!     .collect();
//! // Same scene seen after driving 0.3 m forward
//! let current_cloud: PointSet = previous_cloud
//!     .iter()
//!     .map(|p| Point3D::new(p.x - 0.3, p.y, p.z))
//!     .collect();
//!
//! let registration = PlanarPointToPoint::new(RegistrationConfig {
//!     correspondence: CorrespondenceMode::Index,
//!     ..RegistrationConfig::default()
//! });
//! let mut estimator = TransformEstimator::new(&EstimatorConfig::default(), registration);
//!
//! // Transform mapping the current cloud into the previous keyframe's frame
//! let transform = estimator.estimate(&current_cloud, &previous_cloud)?;
//! assert!((transform.translation()[0] - 0.3).abs() < 1e-4);
//! assert!(transform.yaw().abs() < 1e-4);
//! # Ok::<(), setu_graph::Error>(())
//! ```

mod estimator;
mod planar;
mod subsample;

pub use estimator::{EstimatorConfig, TransformEstimator};
pub use planar::{CorrespondenceMode, PlanarPointToPoint, RegistrationConfig};
pub use subsample::random_subsample;

use crate::core::types::{PointSet, RigidTransform};
use crate::error::Result;

/// Trait for rigid-transform registration primitives.
///
/// Implementations return the transform that maps `source` into the frame of
/// `target`, minimizing point-to-point alignment error under planar motion.
/// The two sets may differ in size.
///
/// Errors:
/// - [`Error::DataInsufficient`](crate::Error::DataInsufficient) for empty
///   or degenerate input
/// - [`Error::MalformedInput`](crate::Error::MalformedInput) for non-finite
///   coordinates
pub trait Registration: Send {
    /// Estimate the transform from `source` to `target`.
    fn register(&self, source: &PointSet, target: &PointSet) -> Result<RigidTransform>;
}

impl<R: Registration + ?Sized> Registration for Box<R> {
    fn register(&self, source: &PointSet, target: &PointSet) -> Result<RigidTransform> {
        (**self).register(source, target)
    }
}
