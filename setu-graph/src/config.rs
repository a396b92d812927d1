//! Configuration loading for SetuGraph.
//!
//! All settings come from a single TOML file. Every section is optional and
//! falls back to its defaults.
//!
//! ## Example TOML
//!
//! ```toml
//! [keyframe]
//! threshold_distance = 0.5   # meters
//!
//! [estimator]
//! subsample_cap = 5000
//! seed = 7                   # omit for OS-seeded sampling
//!
//! [registration]
//! correspondence = "nearest" # or "index"
//! max_correspondence_distance = 0.3
//! min_correspondences = 3
//!
//! [preprocessing.range_filter]
//! min_range = 0.1
//! max_range = 12.0
//!
//! [session]
//! tick_interval_ms = 50
//!
//! [replay]
//! file = "session.jsonl"
//! speed = 1.0
//! stop_at_end = true
//!
//! [output]
//! path = "graph.dot"         # omit to write to stdout
//! format = "dot"             # or "json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::algorithms::registration::{EstimatorConfig, RegistrationConfig};
use crate::engine::graph::ExportFormat;
use crate::engine::keyframe::KeyframeConfig;
use crate::error::{Error, Result};
use crate::sensors::preprocessing::PreprocessorConfig;

/// Default config file looked up by [`SetuConfig::load_default`].
pub const DEFAULT_CONFIG_PATH: &str = "setu-graph.toml";

/// Session loop timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Polling interval of the session loop.
    pub tick_interval_ms: u64,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50, // 20 Hz
        }
    }
}

impl SessionSection {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Sensor log replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaySection {
    /// JSON-lines sensor log to replay.
    pub file: Option<PathBuf>,
    /// Playback speed multiplier. 0.0 replays as fast as possible.
    pub speed: f32,
    /// Shut the session down when the log is exhausted.
    pub stop_at_end: bool,
}

impl Default for ReplaySection {
    fn default() -> Self {
        Self {
            file: None,
            speed: 1.0,
            stop_at_end: true,
        }
    }
}

/// Graph export destination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Output file. Standard output when absent.
    pub path: Option<PathBuf>,
    pub format: ExportFormat,
}

/// Full SetuGraph configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetuConfig {
    #[serde(default)]
    pub keyframe: KeyframeConfig,

    #[serde(default)]
    pub estimator: EstimatorConfig,

    #[serde(default)]
    pub registration: RegistrationConfig,

    #[serde(default)]
    pub preprocessing: PreprocessorConfig,

    #[serde(default)]
    pub session: SessionSection,

    #[serde(default)]
    pub replay: ReplaySection,

    #[serde(default)]
    pub output: OutputSection,
}

impl SetuConfig {
    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Load [`DEFAULT_CONFIG_PATH`] if it exists, otherwise use defaults.
    pub fn load_default() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.keyframe.threshold_distance;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::Config(format!(
                "keyframe.threshold_distance must be finite and non-negative, got {threshold}"
            )));
        }
        if self.estimator.subsample_cap == 0 {
            return Err(Error::Config("estimator.subsample_cap must be positive".into()));
        }
        if self.registration.min_correspondences < 2 {
            return Err(Error::Config(format!(
                "registration.min_correspondences must be at least 2, got {}",
                self.registration.min_correspondences
            )));
        }
        if let Some(d) = self.registration.max_correspondence_distance
            && !(d.is_finite() && d > 0.0)
        {
            return Err(Error::Config(format!(
                "registration.max_correspondence_distance must be positive, got {d}"
            )));
        }
        if let Some(range) = &self.preprocessing.range_filter
            && !(range.min_range >= 0.0 && range.min_range <= range.max_range)
        {
            return Err(Error::Config(format!(
                "preprocessing.range_filter needs 0 <= min_range <= max_range, got [{}, {}]",
                range.min_range, range.max_range
            )));
        }
        if self.session.tick_interval_ms == 0 {
            return Err(Error::Config("session.tick_interval_ms must be positive".into()));
        }
        if !self.replay.speed.is_finite() || self.replay.speed < 0.0 {
            return Err(Error::Config(format!(
                "replay.speed must be finite and non-negative, got {}",
                self.replay.speed
            )));
        }
        Ok(())
    }
}
