//! Range gating filter for point clouds.
//!
//! Removes points too close to the sensor (self-reflection) or too far
//! away to be reliable.

use serde::{Deserialize, Serialize};

use crate::core::types::{Point3D, PointSet};

/// Configuration for range filtering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeFilterConfig {
    /// Minimum valid range in meters.
    ///
    /// Default: 0.1m
    pub min_range: f32,

    /// Maximum valid range in meters.
    ///
    /// Default: 12.0m
    pub max_range: f32,
}

impl Default for RangeFilterConfig {
    fn default() -> Self {
        Self {
            min_range: 0.1,
            max_range: 12.0,
        }
    }
}

/// Range filter for point clouds.
#[derive(Debug, Clone)]
pub struct RangeFilter {
    config: RangeFilterConfig,
}

impl RangeFilter {
    /// Create a new range filter with the given configuration.
    pub fn new(config: RangeFilterConfig) -> Self {
        Self { config }
    }

    /// Check if a point lies within the configured range band (inclusive).
    #[inline]
    pub fn is_valid(&self, point: &Point3D) -> bool {
        let range = point.range();
        range.is_finite() && range >= self.config.min_range && range <= self.config.max_range
    }

    /// Apply range filtering, keeping the order of surviving points.
    pub fn apply(&self, cloud: &PointSet) -> PointSet {
        cloud.iter().copied().filter(|p| self.is_valid(p)).collect()
    }
}

impl Default for RangeFilter {
    fn default() -> Self {
        Self::new(RangeFilterConfig::default())
    }
}
