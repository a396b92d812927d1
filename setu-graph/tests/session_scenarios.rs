//! End-to-end session loop scenarios.
//!
//! Drives the session loop through the public API: sensor slots in, pose
//! graph and export out.

mod common;

use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use common::{observe, planar_session, room_outline, session_with, straight_trajectory};
use setu_graph::threads::SensorIngest;
use setu_graph::{
    CorrespondenceMode, Error, ExportFormat, OdometryReading, PlanarPose, Point3D, PointSet,
    PreprocessorConfig, Quaternion, Registration, RegistrationConfig, RigidTransform,
    SensorLogReader, SensorLogWriter, SensorSlots, SessionState, TickOutcome, WriterSink,
};
use tempfile::NamedTempFile;

fn index_registration() -> RegistrationConfig {
    RegistrationConfig {
        correspondence: CorrespondenceMode::Index,
        ..Default::default()
    }
}

#[test]
fn test_reject_then_accept_scenario() {
    let room = room_outline(4.0, 3.0, 0.05);
    let mut session = planar_session(0.5, index_registration());
    let slots = SensorSlots::new();

    let origin = PlanarPose::new(0.0, 0.0, 0.0);
    slots.pose.publish(origin);
    slots.cloud.publish(observe(&room, &origin));
    assert_eq!(
        session.tick(&slots).unwrap(),
        TickOutcome::Initialized { key: 0 }
    );

    let short = PlanarPose::new(0.0, 0.3, 0.0);
    slots.pose.publish(short);
    slots.cloud.publish(observe(&room, &short));
    match session.tick(&slots).unwrap() {
        TickOutcome::Rejected { distance } => assert_relative_eq!(distance, 0.3, epsilon = 1e-6),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(session.graph().num_vertices(), 1);
    assert_eq!(session.graph().num_edges(), 0);

    let far = PlanarPose::new(0.0, 0.6, 0.0);
    slots.pose.publish(far);
    slots.cloud.publish(observe(&room, &far));
    match session.tick(&slots).unwrap() {
        TickOutcome::Accepted { key, distance } => {
            assert_eq!(key, 1);
            assert_relative_eq!(distance, 0.6, epsilon = 1e-6);
        }
        other => panic!("expected acceptance, got {other:?}"),
    }

    let graph = session.graph();
    assert_eq!(graph.num_vertices(), 2);
    assert_eq!(graph.num_edges(), 1);
    assert_eq!((graph.edges()[0].source, graph.edges()[0].target), (0, 1));
    assert_eq!(graph.vertex(1).unwrap().pose, [0.0, 0.6, 0.0]);
}

#[test]
fn test_estimated_transform_maps_current_into_previous() {
    let room = room_outline(5.0, 4.0, 0.05);
    let mut session = planar_session(0.5, index_registration());
    let slots = SensorSlots::new();

    let origin = PlanarPose::identity();
    slots.pose.publish(origin);
    slots.cloud.publish(observe(&room, &origin));
    session.tick(&slots).unwrap();

    let moved = PlanarPose::new(0.6, 0.2, 0.3);
    slots.pose.publish(moved);
    slots.cloud.publish(observe(&room, &moved));
    assert!(matches!(
        session.tick(&slots).unwrap(),
        TickOutcome::Accepted { key: 1, .. }
    ));

    let transform = session.graph().edges()[0].transform;
    assert_relative_eq!(transform.yaw(), 0.3, epsilon = 1e-3);
    assert_relative_eq!(transform.translation()[0], 0.6, epsilon = 1e-3);
    assert_relative_eq!(transform.translation()[1], 0.2, epsilon = 1e-3);
}

#[test]
fn test_nearest_mode_follows_small_steps() {
    let room = room_outline(4.0, 3.0, 0.02);
    let mut session = planar_session(0.04, RegistrationConfig::default());
    let slots = SensorSlots::new();

    for pose in straight_trajectory(4, 0.05) {
        slots.pose.publish(pose);
        slots.cloud.publish(observe(&room, &pose));
        session.tick(&slots).unwrap();
    }

    let graph = session.graph();
    assert_eq!(graph.num_vertices(), 4);
    for edge in graph.edges() {
        // One nearest-neighbor pass: direction right, magnitude roughly right
        assert!(edge.transform.translation()[0] > 0.0);
        assert!(edge.transform.yaw().abs() < 0.05);
    }
}

#[test]
fn test_empty_target_leaves_graph_unchanged() {
    let mut session = planar_session(0.5, RegistrationConfig::default());
    let slots = SensorSlots::new();

    slots.pose.publish(PlanarPose::identity());
    slots.cloud.publish(PointSet::new());
    session.tick(&slots).unwrap();

    slots.pose.publish(PlanarPose::new(2.0, 0.0, 0.0));
    slots.cloud.publish(room_outline(4.0, 3.0, 0.1));
    assert!(matches!(
        session.tick(&slots).unwrap(),
        TickOutcome::Dropped { .. }
    ));

    assert_eq!(session.graph().num_vertices(), 1);
    assert_eq!(session.graph().num_edges(), 0);
    assert_eq!(session.state(), SessionState::Running);

    // Same snapshot again: not retried
    assert_eq!(session.tick(&slots).unwrap(), TickOutcome::Stale);
    assert_eq!(session.stats().dropped, 1);
}

#[test]
fn test_degenerate_cloud_dropped_then_recovers() {
    let room = room_outline(4.0, 3.0, 0.05);
    let mut session = planar_session(0.5, index_registration());
    let slots = SensorSlots::new();

    let origin = PlanarPose::identity();
    slots.pose.publish(origin);
    slots.cloud.publish(observe(&room, &origin));
    session.tick(&slots).unwrap();

    // Every point at the same planar position
    let column: PointSet = (0..50)
        .map(|i| Point3D::new(1.0, 1.0, i as f32 * 0.05))
        .collect();
    slots.pose.publish(PlanarPose::new(1.0, 0.0, 0.0));
    slots.cloud.publish(column);
    assert!(matches!(
        session.tick(&slots).unwrap(),
        TickOutcome::Dropped { .. }
    ));

    let moved = PlanarPose::new(1.0, 0.0, 0.0);
    slots.cloud.publish(observe(&room, &moved));
    assert!(matches!(
        session.tick(&slots).unwrap(),
        TickOutcome::Accepted { key: 1, .. }
    ));
    assert_eq!(session.graph().num_edges(), 1);
}

/// Records the sizes it was called with.
#[derive(Clone, Default)]
struct SizeRecorder {
    calls: Arc<Mutex<Vec<(usize, usize)>>>,
}

impl Registration for SizeRecorder {
    fn register(&self, source: &PointSet, target: &PointSet) -> setu_graph::Result<RigidTransform> {
        self.calls.lock().unwrap().push((source.len(), target.len()));
        Ok(RigidTransform::identity())
    }
}

fn grid_cloud(n: usize) -> PointSet {
    (0..n)
        .map(|i| Point3D::new((i % 100) as f32 * 0.01, (i / 100) as f32 * 0.01, 0.0))
        .collect()
}

#[test]
fn test_subsample_cap_applied_before_registration() {
    let recorder = SizeRecorder::default();
    let calls = recorder.calls.clone();
    let mut session = session_with(0.5, recorder);
    let slots = SensorSlots::new();

    // Previous keyframe cloud: 3000 points
    slots.pose.publish(PlanarPose::identity());
    slots.cloud.publish(grid_cloud(3000));
    session.tick(&slots).unwrap();

    // Current cloud: 8000 points
    slots.pose.publish(PlanarPose::new(0.0, 1.0, 0.0));
    slots.cloud.publish(grid_cloud(8000));
    session.tick(&slots).unwrap();

    // Source is the current cloud, target the previous keyframe cloud
    assert_eq!(*calls.lock().unwrap(), vec![(5000, 3000)]);
}

#[test]
fn test_recorded_log_with_undefined_points() {
    let room = room_outline(4.0, 3.0, 0.05);
    let file = NamedTempFile::new().unwrap();

    let mut writer = SensorLogWriter::create(file.path()).unwrap();
    for (i, x) in [0.0f32, 0.2, 0.55, 0.7, 1.1].iter().enumerate() {
        let pose = PlanarPose::new(*x, 0.0, 0.0);
        let t = i as u64 * 100_000;

        // Cloud first, so the odometry tick sees a cloud taken at its pose
        let mut raw = observe(&room, &pose);
        raw.push(Point3D::undefined());
        raw.push(Point3D::new(f32::NAN, 1.0, 0.0));
        writer.record_cloud(t, &raw).unwrap();

        writer
            .record_odometry(t + 50_000, &OdometryReading::new(*x, 0.0, Quaternion::identity()))
            .unwrap();
    }
    writer.flush().unwrap();

    let ingest = SensorIngest::new(PreprocessorConfig::default());
    let slots = SensorSlots::new();
    let mut session = planar_session(0.5, index_registration());
    let mut reader = SensorLogReader::open(file.path()).unwrap();

    while let Some(record) = reader.next_immediate().unwrap() {
        ingest.ingest(&record, &slots);
        session.tick(&slots).unwrap();
    }

    // Keyframes at x = 0.0, 0.55, 1.1
    let graph = session.graph();
    assert_eq!(graph.num_vertices(), 3);
    assert_eq!(graph.num_edges(), 2);
    assert_eq!(session.stats().dropped, 0);
    for edge in graph.edges() {
        assert_relative_eq!(edge.transform.translation()[0], 0.55, epsilon = 1e-3);
    }

    let mut sink = WriterSink::new(Vec::new());
    session.shutdown(&mut sink, ExportFormat::Json).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&sink.into_inner()).unwrap();
    assert_eq!(json["vertices"].as_array().unwrap().len(), 3);
    assert_eq!(json["edges"][1]["source"], 1);
    assert_eq!(json["edges"][1]["target"], 2);
}

#[test]
fn test_tick_after_shutdown_is_illegal() {
    let mut session = planar_session(0.5, RegistrationConfig::default());
    let slots = SensorSlots::new();
    let mut sink = WriterSink::new(Vec::new());

    session.shutdown(&mut sink, ExportFormat::Dot).unwrap();
    assert_eq!(sink.into_inner(), b"graph G {\n}\n");
    assert!(matches!(session.tick(&slots), Err(Error::IllegalState(_))));
}
