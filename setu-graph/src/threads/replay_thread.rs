//! Replay Thread - feeds recorded sensor streams into the sensor slots.
//!
//! Each odometry record is sampled into a planar pose and each cloud record
//! is cleaned by the preprocessor before being published. Publishing
//! overwrites the previous value, so records arriving faster than the
//! session loop ticks are never seen by it.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::io::{SensorLogReader, SensorRecord};
use crate::sensors::pose_sampler::PoseSampler;
use crate::sensors::preprocessing::{CloudPreprocessor, PreprocessorConfig};
use crate::state::{SensorSlots, SensorSlotsHandle};

/// Turns sensor records into slot updates.
pub struct SensorIngest {
    sampler: PoseSampler,
    preprocessor: CloudPreprocessor,
}

impl SensorIngest {
    pub fn new(preprocessing: PreprocessorConfig) -> Self {
        Self {
            sampler: PoseSampler::new(),
            preprocessor: CloudPreprocessor::new(preprocessing),
        }
    }

    /// Convert one record and publish it into its slot.
    pub fn ingest(&self, record: &SensorRecord, slots: &SensorSlots) {
        if let Some(reading) = record.to_odometry() {
            slots.pose.publish(self.sampler.sample(&reading.data));
        } else if let Some(raw) = record.to_cloud() {
            let clean = self.preprocessor.process(&raw.data);
            if clean.len() < raw.data.len() {
                log::debug!(
                    "Cloud at {} us: kept {} of {} points",
                    raw.timestamp_us,
                    clean.len(),
                    raw.data.len()
                );
            }
            slots.cloud.publish(clean);
        }
    }
}

impl Default for SensorIngest {
    fn default() -> Self {
        Self::new(PreprocessorConfig::default())
    }
}

/// Configuration for the replay thread.
#[derive(Debug, Clone)]
pub struct ReplayThreadConfig {
    /// JSON-lines sensor log.
    pub file: PathBuf,
    /// Playback speed multiplier (0.0 = as fast as possible).
    pub speed: f32,
    /// Clear the running flag once the log is exhausted.
    pub stop_at_end: bool,
    pub preprocessing: PreprocessorConfig,
}

/// Counts of what the replay published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub odometry_records: u64,
    pub cloud_records: u64,
    /// False if the replay was interrupted before the end of the log.
    pub completed: bool,
}

/// Replay thread handle.
pub struct ReplayThread {
    handle: JoinHandle<Result<ReplaySummary>>,
}

impl ReplayThread {
    /// Open the log and start replaying it.
    ///
    /// The log is opened before the thread starts, so a missing file is
    /// reported here rather than from [`join`](Self::join). A replay error
    /// always clears `running`.
    pub fn spawn(
        config: ReplayThreadConfig,
        slots: SensorSlotsHandle,
        running: Arc<AtomicBool>,
    ) -> Result<Self> {
        let mut reader = SensorLogReader::open(&config.file)?;
        reader.set_speed(config.speed);
        log::info!(
            "Replaying {} at {}x",
            config.file.display(),
            config.speed
        );

        let handle = thread::Builder::new()
            .name("replay".into())
            .spawn(move || {
                let ingest = SensorIngest::new(config.preprocessing);
                let result = run_replay(&mut reader, &ingest, &slots, &running);
                match &result {
                    Ok(summary) if summary.completed && config.stop_at_end => {
                        log::info!("Replay finished, requesting shutdown");
                        running.store(false, Ordering::Relaxed);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        log::error!("Replay failed, requesting shutdown: {e}");
                        running.store(false, Ordering::Relaxed);
                    }
                }
                result
            })?;

        Ok(Self { handle })
    }

    /// Wait for the replay to finish.
    pub fn join(self) -> Result<ReplaySummary> {
        self.handle
            .join()
            .map_err(|_| Error::IllegalState("replay thread panicked".into()))?
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

fn run_replay<R: std::io::BufRead>(
    reader: &mut SensorLogReader<R>,
    ingest: &SensorIngest,
    slots: &SensorSlots,
    running: &AtomicBool,
) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    while running.load(Ordering::Relaxed) {
        let Some(record) = reader.next_paced()? else {
            summary.completed = true;
            break;
        };
        match record {
            SensorRecord::Odometry { .. } => summary.odometry_records += 1,
            SensorRecord::Cloud { .. } => summary.cloud_records += 1,
        }
        ingest.ingest(&record, slots);
    }

    log::info!(
        "Replay stopped: {} odometry, {} cloud records",
        summary.odometry_records,
        summary.cloud_records
    );
    Ok(summary)
}
