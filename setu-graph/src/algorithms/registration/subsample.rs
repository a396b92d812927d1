//! Bounded random subsampling.

use rand::Rng;

use crate::core::types::PointSet;

/// Draw up to `cap` points from `cloud` without replacement.
///
/// Sets with `cap` points or fewer are returned whole. Otherwise exactly
/// `cap` distinct indices are drawn uniformly and the sampled points keep
/// their original relative order.
pub fn random_subsample<R: Rng + ?Sized>(cloud: &PointSet, cap: usize, rng: &mut R) -> PointSet {
    if cloud.len() <= cap {
        return cloud.clone();
    }

    let mut indices = rand::seq::index::sample(rng, cloud.len(), cap).into_vec();
    indices.sort_unstable();

    let points = cloud.points();
    indices.into_iter().map(|i| points[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Point3D;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn line_cloud(n: usize) -> PointSet {
        (0..n).map(|i| Point3D::new(i as f32, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_small_cloud_returned_whole() {
        let mut rng = StdRng::seed_from_u64(7);
        let cloud = line_cloud(10);
        assert_eq!(random_subsample(&cloud, 10, &mut rng), cloud);
        assert_eq!(random_subsample(&cloud, 50, &mut rng), cloud);
    }

    #[test]
    fn test_sample_is_distinct_and_ordered() {
        let mut rng = StdRng::seed_from_u64(42);
        let sample = random_subsample(&line_cloud(1000), 100, &mut rng);

        assert_eq!(sample.len(), 100);
        let xs: Vec<f32> = sample.iter().map(|p| p.x).collect();
        // Strictly increasing means no index was drawn twice
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_zero_cap() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(random_subsample(&line_cloud(5), 0, &mut rng).is_empty());
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let cloud = line_cloud(500);
        let a = random_subsample(&cloud, 50, &mut StdRng::seed_from_u64(3));
        let b = random_subsample(&cloud, 50, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
