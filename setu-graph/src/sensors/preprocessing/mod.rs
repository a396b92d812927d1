//! Point cloud preprocessing.
//!
//! Turns raw sensor point collections into clean point sets ready for
//! transform estimation.
//!
//! # Pipeline
//!
//! ```text
//! raw PointSet → FiniteFilter → [RangeFilter] → clean PointSet
//! ```
//!
//! The finite filter always runs first, so no consumer ever sees a point
//! with an undefined coordinate. The range filter is optional.

mod finite_filter;
mod range_filter;

pub use finite_filter::FiniteFilter;
pub use range_filter::{RangeFilter, RangeFilterConfig};

use serde::{Deserialize, Serialize};

use crate::core::types::PointSet;

/// Trait for point cloud filtering operations.
///
/// Filters are pure: the output depends only on the input set, and the
/// relative order of surviving points is preserved.
pub trait CloudFilter: Send + Sync {
    /// Apply the filter, returning a new point set.
    fn filter(&self, cloud: &PointSet) -> PointSet;

    /// Get the name of this filter for diagnostics.
    fn name(&self) -> &'static str;
}

impl CloudFilter for FiniteFilter {
    fn filter(&self, cloud: &PointSet) -> PointSet {
        self.apply(cloud)
    }

    fn name(&self) -> &'static str {
        "FiniteFilter"
    }
}

impl CloudFilter for RangeFilter {
    fn filter(&self, cloud: &PointSet) -> PointSet {
        self.apply(cloud)
    }

    fn name(&self) -> &'static str {
        "RangeFilter"
    }
}

/// Configuration for the cloud preprocessor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Optional range gate applied after undefined points are removed.
    pub range_filter: Option<RangeFilterConfig>,
}

/// Cloud preprocessing pipeline.
pub struct CloudPreprocessor {
    filters: Vec<Box<dyn CloudFilter>>,
}

impl CloudPreprocessor {
    /// Create a new preprocessor with the given configuration.
    pub fn new(config: PreprocessorConfig) -> Self {
        let mut filters: Vec<Box<dyn CloudFilter>> = vec![Box::new(FiniteFilter)];
        if let Some(range) = config.range_filter {
            filters.push(Box::new(RangeFilter::new(range)));
        }
        Self { filters }
    }

    /// Process a raw point set through every filter.
    pub fn process(&self, raw: &PointSet) -> PointSet {
        let mut cloud = raw.clone();
        for filter in &self.filters {
            let before = cloud.len();
            cloud = filter.filter(&cloud);
            if cloud.len() != before {
                log::trace!(
                    "{} removed {} of {} points",
                    filter.name(),
                    before - cloud.len(),
                    before
                );
            }
        }
        cloud
    }

    /// Names of the active filters, in application order.
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }
}

impl Default for CloudPreprocessor {
    fn default() -> Self {
        Self::new(PreprocessorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Point3D;

    fn raw_cloud() -> PointSet {
        PointSet::from_points(vec![
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::undefined(),
            Point3D::new(20.0, 0.0, 0.0),
            Point3D::new(0.0, f32::NAN, 1.0),
            Point3D::new(0.0, 2.0, 0.0),
        ])
    }

    #[test]
    fn test_default_pipeline_only_removes_undefined() {
        let preprocessor = CloudPreprocessor::default();
        assert_eq!(preprocessor.filter_names(), vec!["FiniteFilter"]);

        let clean = preprocessor.process(&raw_cloud());
        assert_eq!(clean.len(), 3);
        assert!(clean.all_finite());
        assert_eq!(clean.points()[0], Point3D::new(1.0, 0.0, 0.0));
        assert_eq!(clean.points()[1], Point3D::new(20.0, 0.0, 0.0));
        assert_eq!(clean.points()[2], Point3D::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn test_range_filter_stage() {
        let preprocessor = CloudPreprocessor::new(PreprocessorConfig {
            range_filter: Some(RangeFilterConfig {
                min_range: 0.5,
                max_range: 10.0,
            }),
        });
        assert_eq!(preprocessor.filter_names(), vec!["FiniteFilter", "RangeFilter"]);

        let clean = preprocessor.process(&raw_cloud());
        assert_eq!(clean.len(), 2);
        assert_eq!(clean.points()[1].y, 2.0);
    }

    #[test]
    fn test_empty_cloud() {
        let clean = CloudPreprocessor::default().process(&PointSet::new());
        assert!(clean.is_empty());
    }
}
