//! Textual serialization of the pose graph.

use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::pose_graph::{ConstraintEdge, KeyframeVertex};
use crate::error::{Error, Result};

/// Output format for [`PoseGraph::export`](super::PoseGraph::export).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Undirected Graphviz graph.
    #[default]
    Dot,
    /// JSON object with `vertices` and `edges` arrays.
    Json,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dot" => Ok(Self::Dot),
            "json" => Ok(Self::Json),
            other => Err(Error::Config(format!("unknown export format: {other}"))),
        }
    }
}

#[derive(Serialize)]
struct GraphSnapshot<'a> {
    vertices: &'a [KeyframeVertex],
    edges: &'a [ConstraintEdge],
}

/// Render vertices and edges as an undirected Graphviz graph.
///
/// ```text
/// graph G {
///   0 [pose="0,0,0"];
///   1 [pose="0,0.6,0"];
///   0 -- 1 [transform="1,0,0,0,0,1,0,-0.6,0,0,1,0,0,0,0,1"];
/// }
/// ```
///
/// Transform entries are row-major. Output depends only on graph contents.
pub(super) fn to_dot(vertices: &[KeyframeVertex], edges: &[ConstraintEdge]) -> String {
    let mut out = String::from("graph G {\n");

    // Writing into a String cannot fail
    for v in vertices {
        let _ = writeln!(
            out,
            "  {} [pose=\"{},{},{}\"];",
            v.key, v.pose[0], v.pose[1], v.pose[2]
        );
    }
    for e in edges {
        let values: Vec<String> = e
            .transform
            .to_row_major()
            .iter()
            .map(|v| v.to_string())
            .collect();
        let _ = writeln!(
            out,
            "  {} -- {} [transform=\"{}\"];",
            e.source,
            e.target,
            values.join(",")
        );
    }

    out.push_str("}\n");
    out
}

/// Render vertices and edges as pretty-printed JSON.
pub(super) fn to_json(vertices: &[KeyframeVertex], edges: &[ConstraintEdge]) -> Result<String> {
    let snapshot = GraphSnapshot { vertices, edges };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}
