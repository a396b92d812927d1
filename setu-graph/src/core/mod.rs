//! Core foundation layer.
//!
//! Bottom layer of the graph builder with no internal dependencies.
//!
//! # Contents
//!
//! - [`types`]: Poses, points, point sets and rigid transforms
//! - [`math`]: Angle normalization and planar distances

pub mod math;
pub mod types;
