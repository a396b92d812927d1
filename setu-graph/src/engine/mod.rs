//! Orchestration layer.
//!
//! This layer turns sensor snapshots into a keyframe pose graph.
//!
//! # Contents
//!
//! - [`keyframe`]: distance-threshold keyframe gate
//! - [`graph`]: append-only pose graph store and its export formats
//! - [`session`]: the session loop state machine

pub mod graph;
pub mod keyframe;
pub mod session;

pub use graph::{ConstraintEdge, ExportFormat, KeyframeVertex, PoseGraph};
pub use keyframe::{KeyframeConfig, KeyframeGate};
pub use session::{SessionLoop, SessionState, SessionStats, TickOutcome};
