//! I/O and infrastructure layer.
//!
//! This layer handles sensor input and graph output.
//!
//! # Contents
//!
//! - [`sensor_log`]: JSON-lines recording and paced replay of sensor streams
//! - [`sink`]: destinations for the exported pose graph

pub mod sensor_log;
pub mod sink;

pub use sensor_log::{RawPoint, SensorLogReader, SensorLogWriter, SensorRecord};
pub use sink::{FileSink, GraphSink, WriterSink};
