//! Test utilities for SetuGraph scenarios.
//!
//! Helpers for building synthetic rooms, observing them from a pose, and
//! wiring up session loops.

#![allow(dead_code)]

use setu_graph::{
    EstimatorConfig, KeyframeConfig, KeyframeGate, PlanarPointToPoint, PlanarPose, Point3D,
    PointSet, Registration, RegistrationConfig, SessionLoop, TransformEstimator,
};

/// Outline of a rectangular room in world coordinates, one point every
/// `spacing` meters along each wall.
pub fn room_outline(width: f32, height: f32, spacing: f32) -> PointSet {
    let nx = (width / spacing) as usize;
    let ny = (height / spacing) as usize;
    let (x0, y0) = (-width / 2.0, -height / 2.0);
    let mut cloud = PointSet::new();

    for i in 0..nx {
        let x = x0 + i as f32 * spacing;
        cloud.push(Point3D::new(x, y0, 0.3));
        cloud.push(Point3D::new(x, y0 + height, 0.3));
    }
    for j in 1..ny {
        let y = y0 + j as f32 * spacing;
        cloud.push(Point3D::new(x0, y, 0.3));
        cloud.push(Point3D::new(x0 + width, y, 0.3));
    }
    cloud
}

/// Express world points in the sensor frame of `pose`.
///
/// Point order is preserved, so two observations of the same world cloud
/// correspond index by index.
pub fn observe(world: &PointSet, pose: &PlanarPose) -> PointSet {
    let (s, c) = pose.heading.sin_cos();
    world
        .iter()
        .map(|p| {
            let dx = p.x - pose.x;
            let dy = p.y - pose.y;
            Point3D::new(c * dx + s * dy, -s * dx + c * dy, p.z)
        })
        .collect()
}

/// Session loop with the default planar registration.
pub fn planar_session(
    threshold: f32,
    registration: RegistrationConfig,
) -> SessionLoop<PlanarPointToPoint> {
    let estimator = TransformEstimator::new(
        &EstimatorConfig {
            subsample_cap: 5000,
            seed: Some(42),
        },
        PlanarPointToPoint::new(registration),
    );
    SessionLoop::new(
        KeyframeGate::new(&KeyframeConfig {
            threshold_distance: threshold,
        }),
        estimator,
    )
}

/// Session loop around an arbitrary registration primitive.
pub fn session_with<R: Registration>(threshold: f32, registration: R) -> SessionLoop<R> {
    let estimator = TransformEstimator::new(
        &EstimatorConfig {
            subsample_cap: 5000,
            seed: Some(42),
        },
        registration,
    );
    SessionLoop::new(
        KeyframeGate::new(&KeyframeConfig {
            threshold_distance: threshold,
        }),
        estimator,
    )
}

/// Straight-line trajectory along x.
pub fn straight_trajectory(n: usize, spacing: f32) -> Vec<PlanarPose> {
    (0..n)
        .map(|i| PlanarPose::new(i as f32 * spacing, 0.0, 0.0))
        .collect()
}
