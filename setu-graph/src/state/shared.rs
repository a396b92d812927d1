//! Sensor buffers shared between the ingestion and session threads.

use std::sync::Arc;

use super::slot::LatestSlot;
use crate::core::types::{PlanarPose, PointSet};

/// Latest sampled pose and latest clean cloud.
///
/// Written by whichever thread ingests sensor data, read by the session
/// loop on every tick. The two streams are independent: neither slot
/// waits for the other.
#[derive(Debug, Default)]
pub struct SensorSlots {
    pub pose: LatestSlot<PlanarPose>,
    pub cloud: LatestSlot<PointSet>,
}

impl SensorSlots {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Shared handle to the sensor slots.
pub type SensorSlotsHandle = Arc<SensorSlots>;

/// Create a new set of empty sensor slots.
pub fn create_sensor_slots() -> SensorSlotsHandle {
    Arc::new(SensorSlots::new())
}
