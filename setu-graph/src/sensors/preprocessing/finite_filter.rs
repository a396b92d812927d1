//! Removal of undefined points.

use crate::core::types::PointSet;

/// Drops every point with a NaN or infinite coordinate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FiniteFilter;

impl FiniteFilter {
    /// Apply the filter. Surviving points keep their relative order.
    pub fn apply(&self, cloud: &PointSet) -> PointSet {
        cloud.iter().copied().filter(|p| p.is_finite()).collect()
    }
}
