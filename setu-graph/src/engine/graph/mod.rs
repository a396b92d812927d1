//! Keyframe pose graph store.
//!
//! # Components
//!
//! - [`PoseGraph`]: append-only vertex/edge arenas with path invariants
//! - [`ExportFormat`]: DOT or JSON rendering used at shutdown
//!
//! # Example
//!
//! ```
//! use setu_graph::core::types::{PlanarPose, RigidTransform};
//! use setu_graph::engine::graph::{ExportFormat, PoseGraph};
//!
//! let mut graph = PoseGraph::new();
//! graph.initialize(PlanarPose::new(0.0, 0.0, 0.0)).unwrap();
//! let key = graph
//!     .commit_keyframe(PlanarPose::new(0.0, 0.6, 0.0), RigidTransform::identity())
//!     .unwrap();
//! assert_eq!(key, 1);
//!
//! let dot = graph.export(ExportFormat::Dot).unwrap();
//! assert!(dot.contains("0 -- 1"));
//! ```

mod export;
mod pose_graph;

pub use export::ExportFormat;
pub use pose_graph::{ConstraintEdge, KeyframeVertex, PoseGraph};
