//! Transform estimation with bounded random subsampling.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::planar::PlanarPointToPoint;
use super::subsample::random_subsample;
use super::Registration;
use crate::core::types::{PointSet, RigidTransform};
use crate::error::{Error, Result};

/// Configuration for [`TransformEstimator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Maximum number of points drawn from each input set.
    pub subsample_cap: usize,

    /// RNG seed for reproducible subsampling. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            subsample_cap: 5000,
            seed: None,
        }
    }
}

/// Estimates the rigid transform between two clouds.
///
/// Each input is independently subsampled to at most `subsample_cap` points
/// before the registration primitive is called once on the pair.
pub struct TransformEstimator<R: Registration = PlanarPointToPoint> {
    registration: R,
    subsample_cap: usize,
    rng: StdRng,
}

impl<R: Registration> TransformEstimator<R> {
    /// Create a new estimator around a registration primitive.
    pub fn new(config: &EstimatorConfig, registration: R) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            registration,
            subsample_cap: config.subsample_cap,
            rng,
        }
    }

    /// Estimate the transform mapping `source` into the frame of `target`.
    ///
    /// Fails with [`Error::DataInsufficient`] when either subsample is empty
    /// (the primitive is not called) or when the primitive rejects the
    /// input. Malformed input reported by the primitive is folded into
    /// `DataInsufficient`.
    pub fn estimate(&mut self, source: &PointSet, target: &PointSet) -> Result<RigidTransform> {
        let source_sample = random_subsample(source, self.subsample_cap, &mut self.rng);
        let target_sample = random_subsample(target, self.subsample_cap, &mut self.rng);

        if source_sample.is_empty() || target_sample.is_empty() {
            return Err(Error::DataInsufficient(format!(
                "empty subsample (source {}, target {})",
                source_sample.len(),
                target_sample.len()
            )));
        }

        log::debug!(
            "Registering {} of {} source points against {} of {} target points",
            source_sample.len(),
            source.len(),
            target_sample.len(),
            target.len()
        );

        match self.registration.register(&source_sample, &target_sample) {
            Ok(transform) => Ok(transform),
            Err(Error::MalformedInput(msg)) => Err(Error::DataInsufficient(msg)),
            Err(e) => Err(e),
        }
    }

    /// Subsample cap in points.
    pub fn subsample_cap(&self) -> usize {
        self.subsample_cap
    }

    /// The wrapped registration primitive.
    pub fn registration(&self) -> &R {
        &self.registration
    }
}
