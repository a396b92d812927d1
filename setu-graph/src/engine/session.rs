//! Session loop: turns polled sensor snapshots into graph growth.
//!
//! # State machine
//!
//! ```text
//!                    pose + cloud seen
//! AwaitingFirstObservation ─────────────▶ Running ──┐
//!          │                                 │  ▲    │ tick
//!          │ shutdown                        │  └────┘
//!          ▼                                 │ shutdown
//!      Terminated ◀──────────────────────────┘
//! ```
//!
//! Each running tick reads the latest pose and cloud, gates the pose against
//! the last accepted keyframe and, on acceptance, estimates the transform
//! from the current cloud to the last accepted cloud. The vertex and its
//! edge are committed together only after estimation succeeds, so a failed
//! estimate leaves the graph exactly as it was.

use std::sync::Arc;

use serde::Serialize;

use super::graph::{ExportFormat, PoseGraph};
use super::keyframe::KeyframeGate;
use crate::algorithms::registration::{PlanarPointToPoint, Registration, TransformEstimator};
use crate::core::types::{PlanarPose, PointSet};
use crate::error::{Error, Result};
use crate::io::sink::GraphSink;
use crate::state::SensorSlots;

/// Lifecycle state of a [`SessionLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SessionState {
    /// Waiting for the first pose and the first clean cloud.
    #[default]
    AwaitingFirstObservation,
    /// Graph initialized, gating every tick.
    Running,
    /// Exported; no further ticks accepted.
    Terminated,
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Still missing a pose or a cloud.
    Waiting,
    /// Origin keyframe created.
    Initialized { key: u64 },
    /// Not far enough from the last keyframe.
    Rejected { distance: f32 },
    /// New keyframe and edge committed.
    Accepted { key: u64, distance: f32 },
    /// Estimation failed; the candidate was discarded.
    Dropped { reason: String },
    /// Same snapshot as a previously dropped candidate; not re-evaluated.
    Stale,
}

/// Per-session counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub ticks: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub dropped: u64,
    pub stale: u64,
}

/// State carried from the last accepted keyframe.
#[derive(Debug, Clone)]
struct AcceptedKeyframe {
    pose: PlanarPose,
    cloud: Arc<PointSet>,
}

/// Drives keyframe gating, estimation and graph growth.
///
/// The loop is the only writer of its [`PoseGraph`]. It does not block on
/// anything except the registration call inside [`tick`](Self::tick).
pub struct SessionLoop<R: Registration = PlanarPointToPoint> {
    state: SessionState,
    gate: KeyframeGate,
    estimator: TransformEstimator<R>,
    graph: PoseGraph,
    last_accepted: Option<AcceptedKeyframe>,
    /// (pose seq, cloud seq) of the last dropped candidate.
    dropped_at: Option<(u64, u64)>,
    stats: SessionStats,
}

impl<R: Registration> SessionLoop<R> {
    pub fn new(gate: KeyframeGate, estimator: TransformEstimator<R>) -> Self {
        Self {
            state: SessionState::AwaitingFirstObservation,
            gate,
            estimator,
            graph: PoseGraph::new(),
            last_accepted: None,
            dropped_at: None,
            stats: SessionStats::default(),
        }
    }

    /// Run one polling step against the latest sensor snapshots.
    ///
    /// Estimation failures are absorbed into [`TickOutcome::Dropped`]. Any
    /// error returned here is a sequencing defect, including ticking after
    /// shutdown.
    pub fn tick(&mut self, slots: &SensorSlots) -> Result<TickOutcome> {
        if self.state == SessionState::Terminated {
            return Err(Error::IllegalState("tick after shutdown".into()));
        }
        self.stats.ticks += 1;

        let (Some(pose), Some(cloud)) = (slots.pose.latest(), slots.cloud.latest()) else {
            return Ok(TickOutcome::Waiting);
        };

        if self.state == SessionState::AwaitingFirstObservation {
            let key = self.graph.initialize(*pose.value)?;
            self.last_accepted = Some(AcceptedKeyframe {
                pose: *pose.value,
                cloud: cloud.value,
            });
            self.state = SessionState::Running;
            log::info!(
                "Session initialized: keyframe {} at ({:.3}, {:.3}, {:.3})",
                key,
                pose.value.x,
                pose.value.y,
                pose.value.heading
            );
            return Ok(TickOutcome::Initialized { key });
        }

        if self.dropped_at == Some((pose.seq, cloud.seq)) {
            self.stats.stale += 1;
            return Ok(TickOutcome::Stale);
        }

        let Some(last) = self.last_accepted.as_ref() else {
            return Err(Error::IllegalState(
                "running session has no accepted keyframe".into(),
            ));
        };

        let distance = self.gate.distance(&pose.value, &last.pose);
        if !self.gate.should_accept(&pose.value, &last.pose) {
            self.stats.rejected += 1;
            log::debug!(
                "Keyframe rejected: moved {:.3}m (< {:.3}m)",
                distance,
                self.gate.threshold()
            );
            return Ok(TickOutcome::Rejected { distance });
        }

        let transform = match self.estimator.estimate(&cloud.value, &last.cloud) {
            Ok(t) => t,
            Err(e) if e.is_recoverable() => {
                self.stats.dropped += 1;
                self.dropped_at = Some((pose.seq, cloud.seq));
                log::warn!("Keyframe candidate dropped: {e}");
                return Ok(TickOutcome::Dropped {
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        let key = self.graph.commit_keyframe(*pose.value, transform)?;
        self.last_accepted = Some(AcceptedKeyframe {
            pose: *pose.value,
            cloud: cloud.value,
        });
        self.dropped_at = None;
        self.stats.accepted += 1;

        let t = transform.translation();
        log::info!(
            "Keyframe {} accepted: moved {:.3}m, transform ({:.3}, {:.3}, {:.3} rad)",
            key,
            distance,
            t[0],
            t[1],
            transform.yaw()
        );
        Ok(TickOutcome::Accepted { key, distance })
    }

    /// Terminate the session and hand the exported graph to `sink`.
    ///
    /// Shutting down before initialization exports an empty graph.
    pub fn shutdown(&mut self, sink: &mut dyn GraphSink, format: ExportFormat) -> Result<()> {
        match self.state {
            SessionState::Terminated => {
                return Err(Error::IllegalState("session already terminated".into()));
            }
            SessionState::AwaitingFirstObservation => {
                log::warn!("Shutdown before first observation; exporting empty graph");
            }
            SessionState::Running => {}
        }
        self.state = SessionState::Terminated;

        let serialized = self.graph.export(format)?;
        sink.write_graph(&serialized)?;
        log::info!(
            "Session terminated: {} keyframes, {} constraints exported to {} sink",
            self.graph.num_vertices(),
            self.graph.num_edges(),
            sink.name()
        );
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn graph(&self) -> &PoseGraph {
        &self.graph
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn estimator(&self) -> &TransformEstimator<R> {
        &self.estimator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::registration::EstimatorConfig;
    use crate::core::types::{Point3D, RigidTransform};
    use crate::engine::keyframe::KeyframeConfig;
    use crate::io::sink::WriterSink;

    /// Returns identity for any non-empty pair.
    struct IdentityRegistration;

    impl Registration for IdentityRegistration {
        fn register(&self, _: &PointSet, _: &PointSet) -> Result<RigidTransform> {
            Ok(RigidTransform::identity())
        }
    }

    fn session() -> SessionLoop<IdentityRegistration> {
        let estimator = TransformEstimator::new(
            &EstimatorConfig {
                subsample_cap: 5000,
                seed: Some(3),
            },
            IdentityRegistration,
        );
        SessionLoop::new(KeyframeGate::new(&KeyframeConfig::default()), estimator)
    }

    fn cloud() -> PointSet {
        (0..20)
            .map(|i| Point3D::new(i as f32 * 0.1, 1.0, 0.0))
            .collect()
    }

    #[test]
    fn test_waits_for_both_streams() {
        let mut session = session();
        let slots = SensorSlots::new();

        assert_eq!(session.tick(&slots).unwrap(), TickOutcome::Waiting);
        slots.pose.publish(PlanarPose::identity());
        assert_eq!(session.tick(&slots).unwrap(), TickOutcome::Waiting);
        assert_eq!(session.state(), SessionState::AwaitingFirstObservation);

        slots.cloud.publish(cloud());
        assert_eq!(
            session.tick(&slots).unwrap(),
            TickOutcome::Initialized { key: 0 }
        );
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_reject_then_accept() {
        let mut session = session();
        let slots = SensorSlots::new();
        slots.pose.publish(PlanarPose::new(0.0, 0.0, 0.0));
        slots.cloud.publish(cloud());
        session.tick(&slots).unwrap();

        slots.pose.publish(PlanarPose::new(0.0, 0.3, 0.0));
        assert!(matches!(
            session.tick(&slots).unwrap(),
            TickOutcome::Rejected { .. }
        ));
        assert_eq!(session.graph().num_vertices(), 1);

        slots.pose.publish(PlanarPose::new(0.0, 0.6, 0.0));
        assert!(matches!(
            session.tick(&slots).unwrap(),
            TickOutcome::Accepted { key: 1, .. }
        ));
        assert_eq!(session.graph().num_edges(), 1);
        assert_eq!(session.stats().accepted, 1);
        assert_eq!(session.stats().rejected, 1);
    }

    #[test]
    fn test_dropped_candidate_not_retried() {
        let mut session = session();
        let slots = SensorSlots::new();
        slots.pose.publish(PlanarPose::identity());
        slots.cloud.publish(PointSet::new());
        session.tick(&slots).unwrap();

        slots.pose.publish(PlanarPose::new(1.0, 0.0, 0.0));
        assert!(matches!(
            session.tick(&slots).unwrap(),
            TickOutcome::Dropped { .. }
        ));
        assert_eq!(session.tick(&slots).unwrap(), TickOutcome::Stale);
        assert_eq!(session.graph().num_vertices(), 1);
        assert_eq!(session.graph().num_edges(), 0);

        // A fresh cloud is still estimated against the empty keyframe cloud
        slots.cloud.publish(cloud());
        assert!(matches!(
            session.tick(&slots).unwrap(),
            TickOutcome::Dropped { .. }
        ));
        assert_eq!(session.stats().dropped, 2);
        assert_eq!(session.stats().stale, 1);
    }

    #[test]
    fn test_shutdown_exports_and_terminates() {
        let mut session = session();
        let slots = SensorSlots::new();
        slots.pose.publish(PlanarPose::identity());
        slots.cloud.publish(cloud());
        session.tick(&slots).unwrap();
        slots.pose.publish(PlanarPose::new(0.5, 0.0, 0.0));
        session.tick(&slots).unwrap();

        let mut sink = WriterSink::new(Vec::new());
        session.shutdown(&mut sink, ExportFormat::Dot).unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();

        assert!(text.contains("0 -- 1"));
        assert_eq!(session.state(), SessionState::Terminated);
        assert!(matches!(session.tick(&slots), Err(Error::IllegalState(_))));

        let mut again = WriterSink::new(Vec::new());
        assert!(matches!(
            session.shutdown(&mut again, ExportFormat::Dot),
            Err(Error::IllegalState(_))
        ));
    }

    #[test]
    fn test_shutdown_before_init_exports_empty() {
        let mut session = session();
        let mut sink = WriterSink::new(Vec::new());
        session.shutdown(&mut sink, ExportFormat::Dot).unwrap();
        assert_eq!(sink.into_inner(), b"graph G {\n}\n");
    }
}
