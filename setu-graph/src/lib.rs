//! SetuGraph - Incremental keyframe pose graph from odometry and point clouds
//!
//! # Architecture
//!
//! The crate is organized into layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                threads/  +  main                    │  ← Runtime
//! │           (replay thread, session thread)           │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                 io/  +  state/                      │  ← Infrastructure
//! │     (sensor log, graph sinks, single-slot buffers)  │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    engine/                          │  ← Orchestration
//! │        (keyframe gate, pose graph, session loop)    │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                  algorithms/                        │  ← Core algorithms
//! │       (random subsampling, planar registration)     │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   sensors/                          │  ← Sensor processing
//! │          (pose sampler, cloud preprocessing)        │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                (types, math)                        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Data flow
//!
//! ```text
//! odometry ─▶ PoseSampler ───────▶ pose slot  ─┐
//!                                              ├─▶ SessionLoop::tick
//! cloud ────▶ CloudPreprocessor ─▶ cloud slot ─┘        │
//!                                                       ▼
//!                         KeyframeGate ─▶ TransformEstimator ─▶ PoseGraph
//! ```
//!
//! Only the session loop writes the graph. Each accepted keyframe adds one
//! vertex and one edge to the previous keyframe; the graph is exported once
//! when the session shuts down.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;
pub mod error;

// ============================================================================
// Layer 2: Sensor processing (depends on core)
// ============================================================================
pub mod sensors;

// ============================================================================
// Layer 3: Algorithms (depends on core)
// ============================================================================
pub mod algorithms;

// ============================================================================
// Layer 4: Infrastructure (buffers, log files, sinks)
// ============================================================================
pub mod io;
pub mod state;

// ============================================================================
// Layer 5: Engine (depends on all layers above)
// ============================================================================
pub mod engine;

// ============================================================================
// Layer 6: Runtime
// ============================================================================
pub mod config;
pub mod threads;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use error::{Error, Result};

// Core types
pub use core::math;
pub use core::types::{
    OdometryReading, PlanarPose, Point3D, PointSet, Quaternion, RigidTransform, Timestamped,
};

// Sensors
pub use sensors::pose_sampler::PoseSampler;
pub use sensors::preprocessing::{CloudPreprocessor, PreprocessorConfig, RangeFilterConfig};

// Algorithms - Registration
pub use algorithms::registration::{
    CorrespondenceMode, EstimatorConfig, PlanarPointToPoint, Registration, RegistrationConfig,
    TransformEstimator,
};

// Engine
pub use engine::{
    ConstraintEdge, ExportFormat, KeyframeConfig, KeyframeGate, KeyframeVertex, PoseGraph,
    SessionLoop, SessionState, SessionStats, TickOutcome,
};

// Infrastructure
pub use io::{FileSink, GraphSink, SensorLogReader, SensorLogWriter, SensorRecord, WriterSink};
pub use state::{LatestSlot, SensorSlots, Snapshot};

// Runtime
pub use config::SetuConfig;
