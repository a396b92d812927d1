//! State shared between threads.
//!
//! This module provides:
//! - `LatestSlot`: single-slot, last-write-wins buffer with sequence numbers
//! - `SensorSlotsHandle`: the pose and cloud slots read by the session loop

mod shared;
mod slot;

pub use shared::{SensorSlots, SensorSlotsHandle, create_sensor_slots};
pub use slot::{LatestSlot, Snapshot};
