//! JSON-lines sensor log for recording and replaying sensor streams.
//!
//! One record per line, tagged by `type`:
//!
//! ```text
//! {"type":"odometry","timestamp_us":0,"position":[0.0,0.0],"orientation":{"x":0.0,"y":0.0,"z":0.0,"w":1.0}}
//! {"type":"cloud","timestamp_us":100000,"points":[[1.0,0.5,0.0],[null,null,null]]}
//! ```
//!
//! Undefined point coordinates are written as `null`. Blank lines and lines
//! starting with `#` are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::core::types::{OdometryReading, Point3D, PointSet, Quaternion, Timestamped};
use crate::error::{Error, Result};

/// Point with possibly undefined coordinates.
pub type RawPoint = [Option<f32>; 3];

/// One line of a sensor log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SensorRecord {
    /// Position + orientation reading.
    Odometry {
        timestamp_us: u64,
        position: [f32; 2],
        orientation: Quaternion,
    },
    /// Raw point observation.
    Cloud {
        timestamp_us: u64,
        points: Vec<RawPoint>,
    },
}

impl SensorRecord {
    /// Build an odometry record.
    pub fn odometry(timestamp_us: u64, reading: &OdometryReading) -> Self {
        SensorRecord::Odometry {
            timestamp_us,
            position: reading.position,
            orientation: reading.orientation,
        }
    }

    /// Build a cloud record. Non-finite coordinates become `null`.
    pub fn cloud(timestamp_us: u64, cloud: &PointSet) -> Self {
        let finite = |v: f32| v.is_finite().then_some(v);
        SensorRecord::Cloud {
            timestamp_us,
            points: cloud
                .iter()
                .map(|p| [finite(p.x), finite(p.y), finite(p.z)])
                .collect(),
        }
    }

    /// Timestamp of this record in microseconds.
    pub fn timestamp_us(&self) -> u64 {
        match self {
            SensorRecord::Odometry { timestamp_us, .. } => *timestamp_us,
            SensorRecord::Cloud { timestamp_us, .. } => *timestamp_us,
        }
    }

    /// Odometry reading, if this is an odometry record.
    pub fn to_odometry(&self) -> Option<Timestamped<OdometryReading>> {
        match self {
            SensorRecord::Odometry {
                timestamp_us,
                position,
                orientation,
            } => Some(Timestamped::new(
                OdometryReading::new(position[0], position[1], *orientation),
                *timestamp_us,
            )),
            SensorRecord::Cloud { .. } => None,
        }
    }

    /// Raw point set, if this is a cloud record. `null` coordinates become NaN.
    pub fn to_cloud(&self) -> Option<Timestamped<PointSet>> {
        match self {
            SensorRecord::Cloud {
                timestamp_us,
                points,
            } => {
                let value = |v: Option<f32>| v.unwrap_or(f32::NAN);
                let cloud = points
                    .iter()
                    .map(|p| Point3D::new(value(p[0]), value(p[1]), value(p[2])))
                    .collect();
                Some(Timestamped::new(cloud, *timestamp_us))
            }
            SensorRecord::Odometry { .. } => None,
        }
    }
}

/// Reads [`SensorRecord`]s from a JSON-lines log.
///
/// Supports both immediate reading and paced playback with a speed
/// multiplier, measured against the first record's timestamp.
///
/// # Example
///
/// ```no_run
/// use setu_graph::io::SensorLogReader;
///
/// let mut reader = SensorLogReader::open("session.jsonl")?;
/// reader.set_speed(2.0);
/// while let Some(record) = reader.next_paced()? {
///     println!("record at {} us", record.timestamp_us());
/// }
/// # Ok::<(), setu_graph::Error>(())
/// ```
pub struct SensorLogReader<R: BufRead = BufReader<File>> {
    reader: R,
    line: String,
    line_number: u64,
    records_read: u64,
    playback_speed: f32,
    playback_start: Option<(Instant, u64)>,
}

impl SensorLogReader<BufReader<File>> {
    /// Open a log file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> SensorLogReader<R> {
    /// Read from any buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_number: 0,
            records_read: 0,
            playback_speed: 0.0,
            playback_start: None,
        }
    }

    /// Set playback speed.
    ///
    /// - 0.0 = as fast as possible (no timing)
    /// - 1.0 = real-time
    /// - 2.0 = 2x speed
    pub fn set_speed(&mut self, speed: f32) {
        self.playback_speed = speed;
    }

    pub fn speed(&self) -> f32 {
        self.playback_speed
    }

    /// Number of records returned so far.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Read the next record without any timing delay.
    ///
    /// Returns `None` at end of input. A line that does not parse is a
    /// [`Error::MalformedInput`] carrying its line number.
    pub fn next_immediate(&mut self) -> Result<Option<SensorRecord>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = self.line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let record: SensorRecord = serde_json::from_str(trimmed).map_err(|e| {
                Error::MalformedInput(format!("line {}: {}", self.line_number, e))
            })?;
            self.records_read += 1;
            return Ok(Some(record));
        }
    }

    /// Read the next record, sleeping to match the recorded timing.
    pub fn next_paced(&mut self) -> Result<Option<SensorRecord>> {
        let record = self.next_immediate()?;
        if let Some(ref record) = record
            && self.playback_speed > 0.0
        {
            self.wait_for_timing(record.timestamp_us());
        }
        Ok(record)
    }

    fn wait_for_timing(&mut self, timestamp_us: u64) {
        let Some((start, first_us)) = self.playback_start else {
            self.playback_start = Some((Instant::now(), timestamp_us));
            return;
        };

        let offset_us = timestamp_us.saturating_sub(first_us);
        let target = Duration::from_micros((offset_us as f64 / self.playback_speed as f64) as u64);
        let elapsed = start.elapsed();
        if target > elapsed {
            std::thread::sleep(target - elapsed);
        }
    }
}

/// Writes [`SensorRecord`]s as JSON lines.
pub struct SensorLogWriter<W: Write = BufWriter<File>> {
    writer: W,
    records_written: u64,
}

impl SensorLogWriter<BufWriter<File>> {
    /// Create (or truncate) a log file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> SensorLogWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records_written: 0,
        }
    }

    /// Append one record.
    pub fn write_record(&mut self, record: &SensorRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.records_written += 1;
        Ok(())
    }

    /// Append an odometry reading.
    pub fn record_odometry(&mut self, timestamp_us: u64, reading: &OdometryReading) -> Result<()> {
        self.write_record(&SensorRecord::odometry(timestamp_us, reading))
    }

    /// Append a raw cloud.
    pub fn record_cloud(&mut self, timestamp_us: u64, cloud: &PointSet) -> Result<()> {
        self.write_record(&SensorRecord::cloud(timestamp_us, cloud))
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
