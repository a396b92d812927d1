//! Sensor processing layer.
//!
//! Turns raw sensor readings into the clean values the session loop
//! consumes.
//!
//! # Contents
//!
//! - [`pose_sampler`]: Orientation + position to planar pose
//! - [`preprocessing`]: Point cloud filtering

pub mod pose_sampler;
pub mod preprocessing;
