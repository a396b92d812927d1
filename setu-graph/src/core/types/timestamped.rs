//! Generic timestamp wrapper.

use serde::{Deserialize, Serialize};

/// Value stamped with the time it was observed.
///
/// Timestamps are in microseconds, matching the sensor log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timestamped<T> {
    /// The wrapped data
    pub data: T,
    /// Timestamp in microseconds
    pub timestamp_us: u64,
}

impl<T> Timestamped<T> {
    /// Create a new timestamped value.
    #[inline]
    pub fn new(data: T, timestamp_us: u64) -> Self {
        Self { data, timestamp_us }
    }
}
