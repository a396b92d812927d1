//! SetuGraph - keyframe pose graph builder
//!
//! Replays a recorded sensor log through the session loop and writes the
//! resulting pose graph on shutdown.
//!
//! # Usage
//!
//! ```bash
//! # With default config (setu-graph.toml if present)
//! cargo run --release -- --replay session.jsonl
//!
//! # With custom config file and JSON output
//! cargo run --release -- --config setu-graph.toml --output graph.json --format json
//! ```
//!
//! Stops when the replay reaches the end of the log (unless
//! `replay.stop_at_end = false`) or on Ctrl-C.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;

use setu_graph::config::SetuConfig;
use setu_graph::engine::graph::ExportFormat;
use setu_graph::state::create_sensor_slots;
use setu_graph::threads::{ReplayThread, ReplayThreadConfig, SessionThread, SessionThreadConfig};
use setu_graph::{
    FileSink, GraphSink, KeyframeGate, PlanarPointToPoint, SessionLoop, TransformEstimator,
    WriterSink,
};

#[derive(Parser)]
#[command(name = "setu-graph")]
#[command(about = "Build a keyframe pose graph from odometry and point clouds")]
struct Args {
    /// Configuration file (default: setu-graph.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sensor log to replay (overrides [replay] file)
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Graph output file (overrides [output] path; stdout if unset)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Export format: dot or json (overrides [output] format)
    #[arg(short, long)]
    format: Option<ExportFormat>,
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!("setu-graph starting");
    log::info!(
        "  Keyframe threshold: {} m",
        config.keyframe.threshold_distance
    );
    log::info!("  Subsample cap: {} points", config.estimator.subsample_cap);
    log::info!(
        "  Correspondence: {:?}",
        config.registration.correspondence
    );
    match &config.output.path {
        Some(path) => log::info!(
            "  Output: {} ({:?})",
            path.display(),
            config.output.format
        ),
        None => log::info!("  Output: stdout ({:?})", config.output.format),
    }

    // Setup signal handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    }) {
        log::error!("Error setting Ctrl-C handler: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&config, running) {
        Ok(()) => {
            log::info!("setu-graph shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("setu-graph error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> setu_graph::Result<SetuConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let config = SetuConfig::load(path)?;
            log::info!("Loaded config from {}", path.display());
            config
        }
        None => SetuConfig::load_default()?,
    };

    if let Some(replay) = &args.replay {
        config.replay.file = Some(replay.clone());
    }
    if let Some(output) = &args.output {
        config.output.path = Some(output.clone());
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    config.validate()?;
    Ok(config)
}

fn run(config: &SetuConfig, running: Arc<AtomicBool>) -> setu_graph::Result<()> {
    let slots = create_sensor_slots();

    let registration = PlanarPointToPoint::new(config.registration.clone());
    let estimator = TransformEstimator::new(&config.estimator, registration);
    let session = SessionLoop::new(KeyframeGate::new(&config.keyframe), estimator);

    let sink: Box<dyn GraphSink + Send> = match &config.output.path {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(WriterSink::stdout()),
    };

    let session_thread = SessionThread::spawn(
        session,
        slots.clone(),
        sink,
        SessionThreadConfig {
            tick_interval: config.session.tick_interval(),
            export_format: config.output.format,
        },
        running.clone(),
    )?;

    let replay_thread = match &config.replay.file {
        Some(file) => Some(ReplayThread::spawn(
            ReplayThreadConfig {
                file: file.clone(),
                speed: config.replay.speed,
                stop_at_end: config.replay.stop_at_end,
                preprocessing: config.preprocessing.clone(),
            },
            slots,
            running.clone(),
        )?),
        None => {
            log::warn!("No sensor log configured; waiting for Ctrl-C");
            None
        }
    };

    // A panicked replay never clears the flag
    let replay_ended = |replay: &Option<ReplayThread>| {
        config.replay.stop_at_end && replay.as_ref().is_some_and(ReplayThread::is_finished)
    };
    while running.load(Ordering::Relaxed)
        && !session_thread.is_finished()
        && !replay_ended(&replay_thread)
    {
        std::thread::sleep(Duration::from_millis(100));
    }
    running.store(false, Ordering::Relaxed);

    if let Some(replay) = replay_thread {
        match replay.join() {
            Ok(summary) => log::info!(
                "Replay: {} odometry, {} cloud records{}",
                summary.odometry_records,
                summary.cloud_records,
                if summary.completed { "" } else { " (interrupted)" }
            ),
            Err(e) => log::error!("Replay failed: {}", e),
        }
    }

    let summary = session_thread.join()?;
    log::info!(
        "Session: {} ticks, {} keyframes accepted, {} rejected, {} dropped",
        summary.stats.ticks,
        summary.stats.accepted,
        summary.stats.rejected,
        summary.stats.dropped
    );
    log::info!(
        "Graph: {} vertices, {} edges",
        summary.vertices,
        summary.edges
    );
    Ok(())
}
