//! 3D point and point set types.

use serde::{Deserialize, Serialize};

/// A 3D point in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    /// X coordinate in meters
    pub x: f32,
    /// Y coordinate in meters
    pub y: f32,
    /// Z coordinate in meters
    pub z: f32,
}

impl Point3D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Point with all coordinates undefined.
    #[inline]
    pub fn undefined() -> Self {
        Self::new(f32::NAN, f32::NAN, f32::NAN)
    }

    /// True if every coordinate is finite (no NaN, no infinity).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Distance from the sensor origin.
    #[inline]
    pub fn range(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Default for Point3D {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

/// Ordered collection of 3D points.
///
/// May contain duplicates. Raw sets straight from the sensor may also
/// contain undefined points; sets produced by the cloud preprocessor never do.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    points: Vec<Point3D>,
}

impl PointSet {
    /// Create an empty point set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty point set with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Create from a vector of points.
    pub fn from_points(points: Vec<Point3D>) -> Self {
        Self { points }
    }

    /// Append a point.
    #[inline]
    pub fn push(&mut self, point: Point3D) {
        self.points.push(point);
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points as a slice.
    #[inline]
    pub fn points(&self) -> &[Point3D] {
        &self.points
    }

    /// Iterate over points.
    pub fn iter(&self) -> impl Iterator<Item = &Point3D> + '_ {
        self.points.iter()
    }

    /// True if no point has an undefined coordinate.
    pub fn all_finite(&self) -> bool {
        self.points.iter().all(Point3D::is_finite)
    }

    /// Consume the set and return its points.
    pub fn into_points(self) -> Vec<Point3D> {
        self.points
    }
}

impl FromIterator<Point3D> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point3D>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
