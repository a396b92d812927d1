//! Append-only keyframe pose graph.
//!
//! Vertices are keyframe poses, edges are the rigid transforms estimated
//! between consecutive keyframes. The graph only ever grows as a simple path:
//!
//! ```text
//! [K0] ──T01── [K1] ──T12── [K2] ──T23── [K3]
//! ```
//!
//! Vertices and edges live in insertion-ordered arenas. Keys are assigned by
//! the graph and equal the vertex's position in the arena.

use serde::{Deserialize, Serialize};

use super::export::{self, ExportFormat};
use crate::core::types::{PlanarPose, RigidTransform};
use crate::error::{Error, Result};

/// A keyframe vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyframeVertex {
    /// Graph-assigned key, starting at 0.
    pub key: u64,

    /// Pose of the keyframe as [x, y, heading].
    pub pose: [f32; 3],
}

/// A constraint edge between consecutive keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstraintEdge {
    /// Key of the older vertex.
    pub source: u64,

    /// Key of the newer vertex.
    pub target: u64,

    /// Estimated transform between the two keyframe clouds.
    pub transform: RigidTransform,
}

/// Pose graph store.
///
/// The only way to grow the graph is through [`initialize`](Self::initialize)
/// followed by keyframe/constraint pairs. Every `append_keyframe` must be
/// followed by its `append_constraint` before the next keyframe;
/// [`commit_keyframe`](Self::commit_keyframe) does both in one step.
#[derive(Debug, Default, Clone)]
pub struct PoseGraph {
    vertices: Vec<KeyframeVertex>,
    edges: Vec<ConstraintEdge>,
}

impl PoseGraph {
    /// Create an empty, uninitialized graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the origin vertex (key 0).
    pub fn initialize(&mut self, first_pose: PlanarPose) -> Result<u64> {
        if !self.vertices.is_empty() {
            return Err(Error::IllegalState(format!(
                "graph already initialized with {} vertices",
                self.vertices.len()
            )));
        }
        self.vertices.push(KeyframeVertex {
            key: 0,
            pose: first_pose.to_array(),
        });
        Ok(0)
    }

    /// Append a keyframe vertex and return its key.
    ///
    /// Fails before [`initialize`](Self::initialize), and while the newest
    /// vertex is still waiting for its constraint.
    pub fn append_keyframe(&mut self, pose: PlanarPose) -> Result<u64> {
        let Some(last) = self.vertices.last() else {
            return Err(Error::IllegalState(
                "append_keyframe called before initialize".into(),
            ));
        };
        if self.pending_constraint() {
            return Err(Error::IllegalState(format!(
                "vertex {} has no constraint yet",
                last.key
            )));
        }

        let key = last.key + 1;
        self.vertices.push(KeyframeVertex {
            key,
            pose: pose.to_array(),
        });
        Ok(key)
    }

    /// Link the two most recently added vertices with `transform`.
    pub fn append_constraint(&mut self, transform: RigidTransform) -> Result<()> {
        let n = self.vertices.len();
        if n < 2 {
            return Err(Error::IllegalState(format!(
                "append_constraint needs two vertices, graph has {n}"
            )));
        }
        if !self.pending_constraint() {
            return Err(Error::IllegalState(format!(
                "vertex {} is already constrained",
                self.vertices[n - 1].key
            )));
        }

        self.edges.push(ConstraintEdge {
            source: self.vertices[n - 2].key,
            target: self.vertices[n - 1].key,
            transform,
        });
        Ok(())
    }

    /// Append a vertex and its constraint as a single step.
    ///
    /// Either both are added or, on error, neither is.
    pub fn commit_keyframe(&mut self, pose: PlanarPose, transform: RigidTransform) -> Result<u64> {
        let key = self.append_keyframe(pose)?;
        if let Err(e) = self.append_constraint(transform) {
            self.vertices.pop();
            return Err(e);
        }
        Ok(key)
    }

    /// Serialize the whole graph.
    pub fn export(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Dot => Ok(export::to_dot(&self.vertices, &self.edges)),
            ExportFormat::Json => export::to_json(&self.vertices, &self.edges),
        }
    }

    /// All vertices in insertion order.
    pub fn vertices(&self) -> &[KeyframeVertex] {
        &self.vertices
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[ConstraintEdge] {
        &self.edges
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Most recently added vertex.
    pub fn latest_vertex(&self) -> Option<&KeyframeVertex> {
        self.vertices.last()
    }

    /// Look up a vertex by key.
    pub fn vertex(&self, key: u64) -> Option<&KeyframeVertex> {
        let index = usize::try_from(key).ok()?;
        self.vertices.get(index)
    }

    pub fn is_initialized(&self) -> bool {
        !self.vertices.is_empty()
    }

    /// True when the newest vertex has been appended without its edge.
    fn pending_constraint(&self) -> bool {
        self.vertices.len() > self.edges.len() + 1
    }
}
