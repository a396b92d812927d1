//! Algorithms layer.
//!
//! # Contents
//!
//! - [`registration`]: Rigid-transform registration and the subsampling
//!   transform estimator built on it

pub mod registration;
