//! Keyframe gating.
//!
//! Not every pose becomes a keyframe. A candidate is accepted only once the
//! agent has moved far enough in the plane from the last accepted keyframe.
//! Heading changes alone never trigger a keyframe.

use serde::{Deserialize, Serialize};

use crate::core::types::PlanarPose;

/// Configuration for keyframe gating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyframeConfig {
    /// Minimum planar distance (meters) from the last keyframe.
    pub threshold_distance: f32,
}

impl Default for KeyframeConfig {
    fn default() -> Self {
        Self {
            threshold_distance: 0.5, // 50cm
        }
    }
}

/// Distance-threshold keyframe gate.
#[derive(Debug, Clone)]
pub struct KeyframeGate {
    threshold: f32,
}

impl KeyframeGate {
    pub fn new(config: &KeyframeConfig) -> Self {
        Self {
            threshold: config.threshold_distance,
        }
    }

    /// Planar distance used for gating.
    #[inline]
    pub fn distance(&self, current: &PlanarPose, last_accepted: &PlanarPose) -> f32 {
        current.distance_to(last_accepted)
    }

    /// Accept iff distance >= threshold. A tie at the threshold is accepted.
    pub fn should_accept(&self, current: &PlanarPose, last_accepted: &PlanarPose) -> bool {
        self.distance(current, last_accepted) >= self.threshold
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl Default for KeyframeGate {
    fn default() -> Self {
        Self::new(&KeyframeConfig::default())
    }
}
