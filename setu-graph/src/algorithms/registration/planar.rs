//! Closed-form planar point-to-point registration.
//!
//! Single-pass alignment of two point sets under planar rigid motion:
//!
//! ```text
//! 1. Pair each source point with a target point (nearest in xy, or by index)
//! 2. Center both sides on their centroids
//! 3. θ = atan2(Σ (sx·ty − sy·tx), Σ (sx·tx + sy·ty))
//! 4. t = c_target − R(θ) · c_source
//! ```
//!
//! Only x and y take part in the fit; z passes through the resulting
//! transform unchanged. There is no iteration: callers wanting ICP-style
//! refinement must loop themselves.

use kiddo::{KdTree, SquaredEuclidean};
use serde::{Deserialize, Serialize};

use super::Registration;
use crate::core::types::{Point3D, PointSet, RigidTransform};
use crate::error::{Error, Result};

/// Minimum mean squared spread for a side to count as non-degenerate.
const MIN_SPREAD: f32 = 1e-10;

/// Leaf bucket size of `kiddo::KdTree`. A full bucket whose points all share
/// one coordinate on the split axis cannot be split.
const KDTREE_BUCKET_SIZE: usize = 32;

/// Fixed rotation (radians) applied to xy before indexing. Distances are
/// unchanged, but points along axis-aligned walls stop sharing a coordinate.
const INDEX_ROTATION: f32 = 0.618_034;

/// How source points are paired with target points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrespondenceMode {
    /// Nearest target point in the xy plane (k-d tree lookup).
    #[default]
    Nearest,
    /// Point i of the source pairs with point i of the target, over the
    /// shorter of the two sets.
    Index,
}

/// Configuration for [`PlanarPointToPoint`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Correspondence strategy.
    pub correspondence: CorrespondenceMode,

    /// Reject nearest-neighbor pairs farther apart than this (meters).
    ///
    /// `None` keeps every pair. Ignored in index mode.
    pub max_correspondence_distance: Option<f32>,

    /// Minimum number of pairs needed to attempt the fit.
    pub min_correspondences: usize,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            correspondence: CorrespondenceMode::Nearest,
            max_correspondence_distance: None,
            min_correspondences: 3,
        }
    }
}

/// Planar point-to-point registration primitive.
#[derive(Debug, Clone, Default)]
pub struct PlanarPointToPoint {
    config: RegistrationConfig,
}

impl PlanarPointToPoint {
    /// Create a new registration primitive with the given configuration.
    pub fn new(config: RegistrationConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    /// Pair source and target points. Returns (source_idx, target_idx).
    fn find_correspondences(&self, source: &[Point3D], target: &[Point3D]) -> Vec<(usize, usize)> {
        match self.config.correspondence {
            CorrespondenceMode::Index => {
                let n = source.len().min(target.len());
                (0..n).map(|i| (i, i)).collect()
            }
            CorrespondenceMode::Nearest => {
                let index = NearestIndex::build(target);
                let max_dist_sq = self.config.max_correspondence_distance.map(|d| d * d);

                source
                    .iter()
                    .enumerate()
                    .filter_map(|(i, p)| {
                        let (target_idx, dist_sq) = index.nearest(p);
                        match max_dist_sq {
                            Some(max) if dist_sq > max => None,
                            _ => Some((i, target_idx)),
                        }
                    })
                    .collect()
            }
        }
    }

    /// Closed-form fit over the given pairs.
    fn solve(
        &self,
        source: &[Point3D],
        target: &[Point3D],
        pairs: &[(usize, usize)],
    ) -> Result<RigidTransform> {
        let n = pairs.len() as f32;

        let (mut scx, mut scy, mut tcx, mut tcy) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
        for &(si, ti) in pairs {
            scx += source[si].x;
            scy += source[si].y;
            tcx += target[ti].x;
            tcy += target[ti].y;
        }
        scx /= n;
        scy /= n;
        tcx /= n;
        tcy /= n;

        let mut cross = 0.0f32;
        let mut dot = 0.0f32;
        let mut source_spread = 0.0f32;
        let mut target_spread = 0.0f32;

        for &(si, ti) in pairs {
            let sx = source[si].x - scx;
            let sy = source[si].y - scy;
            let tx = target[ti].x - tcx;
            let ty = target[ti].y - tcy;

            cross += sx * ty - sy * tx;
            dot += sx * tx + sy * ty;
            source_spread += sx * sx + sy * sy;
            target_spread += tx * tx + ty * ty;
        }

        if source_spread / n < MIN_SPREAD || target_spread / n < MIN_SPREAD {
            return Err(Error::DataInsufficient(
                "corresponding points are coincident in the plane".into(),
            ));
        }

        let theta = cross.atan2(dot);
        let (s, c) = theta.sin_cos();
        let tx = tcx - (c * scx - s * scy);
        let ty = tcy - (s * scx + c * scy);

        let transform = RigidTransform::planar(tx, ty, theta);
        if !transform.is_finite() {
            return Err(Error::MalformedInput(
                "registration produced a non-finite transform".into(),
            ));
        }
        Ok(transform)
    }
}

impl Registration for PlanarPointToPoint {
    fn register(&self, source: &PointSet, target: &PointSet) -> Result<RigidTransform> {
        if source.is_empty() || target.is_empty() {
            return Err(Error::DataInsufficient(format!(
                "cannot register empty point sets (source {}, target {})",
                source.len(),
                target.len()
            )));
        }
        if !source.all_finite() || !target.all_finite() {
            return Err(Error::MalformedInput(
                "point set contains undefined coordinates".into(),
            ));
        }

        if planar_spread(source.points()) < MIN_SPREAD || planar_spread(target.points()) < MIN_SPREAD
        {
            return Err(Error::DataInsufficient(
                "point set collapses to a single position in the plane".into(),
            ));
        }

        let pairs = self.find_correspondences(source.points(), target.points());
        if pairs.len() < self.config.min_correspondences {
            return Err(Error::DataInsufficient(format!(
                "{} correspondences found, {} required",
                pairs.len(),
                self.config.min_correspondences
            )));
        }

        self.solve(source.points(), target.points(), &pairs)
    }
}

/// Nearest-neighbor lookup over the xy projection of a point set.
enum NearestIndex {
    Tree(KdTree<f32, 2>),
    /// Brute-force scan, for sets with too many repeated coordinates.
    Linear(Vec<[f32; 2]>),
}

impl NearestIndex {
    fn build(points: &[Point3D]) -> Self {
        let entries: Vec<[f32; 2]> = points.iter().map(index_coords).collect();

        let repeats = max_axis_multiplicity(&entries);
        if repeats >= KDTREE_BUCKET_SIZE {
            log::debug!(
                "{} points share a coordinate, using linear nearest-neighbor search",
                repeats
            );
            return NearestIndex::Linear(entries);
        }

        let mut tree: KdTree<f32, 2> = KdTree::new();
        for (i, entry) in entries.iter().enumerate() {
            tree.add(entry, i as u64);
        }
        NearestIndex::Tree(tree)
    }

    /// Index and squared distance of the point nearest to `p`.
    fn nearest(&self, p: &Point3D) -> (usize, f32) {
        let query = index_coords(p);
        match self {
            NearestIndex::Tree(tree) => {
                let nearest = tree.nearest_one::<SquaredEuclidean>(&query);
                (nearest.item as usize, nearest.distance)
            }
            NearestIndex::Linear(entries) => entries
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    let dx = e[0] - query[0];
                    let dy = e[1] - query[1];
                    (i, dx * dx + dy * dy)
                })
                .fold((0, f32::INFINITY), |best, candidate| {
                    if candidate.1 < best.1 { candidate } else { best }
                }),
        }
    }
}

/// xy coordinates in the rotated indexing frame.
fn index_coords(p: &Point3D) -> [f32; 2] {
    let (s, c) = INDEX_ROTATION.sin_cos();
    [c * p.x - s * p.y, s * p.x + c * p.y]
}

/// Largest number of entries sharing one value on either axis.
fn max_axis_multiplicity(entries: &[[f32; 2]]) -> usize {
    (0..2)
        .map(|axis| {
            let mut values: Vec<f32> = entries.iter().map(|e| e[axis]).collect();
            values.sort_unstable_by(f32::total_cmp);
            values
                .chunk_by(|a, b| a == b)
                .map(<[f32]>::len)
                .max()
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0)
}

/// Mean squared xy distance of the points from their centroid.
fn planar_spread(points: &[Point3D]) -> f32 {
    let n = points.len() as f32;
    let cx = points.iter().map(|p| p.x).sum::<f32>() / n;
    let cy = points.iter().map(|p| p.y).sum::<f32>() / n;
    points
        .iter()
        .map(|p| (p.x - cx).powi(2) + (p.y - cy).powi(2))
        .sum::<f32>()
        / n
}
