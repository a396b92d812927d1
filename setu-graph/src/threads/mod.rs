//! Thread management for the SetuGraph daemon.
//!
//! This module provides two threads:
//! - `ReplayThread`: replays a sensor log into the sensor slots
//! - `SessionThread`: ticks the session loop and exports the graph on stop

mod replay_thread;
mod session_thread;

pub use replay_thread::{ReplaySummary, ReplayThread, ReplayThreadConfig, SensorIngest};
pub use session_thread::{SessionSummary, SessionThread, SessionThreadConfig};
