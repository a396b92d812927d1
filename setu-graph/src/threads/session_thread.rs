//! Session Thread - drives the session loop at a fixed tick rate.
//!
//! The thread wakes on every tick of a `crossbeam_channel::tick` timer and
//! polls the sensor slots. It stops when the running flag is cleared or
//! when [`SessionThread::stop`] is called. On stop it runs one last tick so
//! the most recent snapshot is still considered, then exports the graph.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded, select, tick};
use serde::Serialize;

use crate::algorithms::registration::Registration;
use crate::engine::graph::ExportFormat;
use crate::engine::session::{SessionLoop, SessionStats};
use crate::error::{Error, Result};
use crate::io::GraphSink;
use crate::state::SensorSlotsHandle;

/// Configuration for the session thread.
#[derive(Debug, Clone)]
pub struct SessionThreadConfig {
    pub tick_interval: Duration,
    pub export_format: ExportFormat,
}

impl Default for SessionThreadConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            export_format: ExportFormat::Dot,
        }
    }
}

/// Final report of a session run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub stats: SessionStats,
    pub vertices: usize,
    pub edges: usize,
}

/// Session thread handle.
pub struct SessionThread {
    handle: JoinHandle<Result<SessionSummary>>,
    stop_tx: Sender<()>,
}

impl SessionThread {
    /// Spawn the session thread.
    pub fn spawn<R>(
        session: SessionLoop<R>,
        slots: SensorSlotsHandle,
        sink: Box<dyn GraphSink + Send>,
        config: SessionThreadConfig,
        running: Arc<AtomicBool>,
    ) -> Result<Self>
    where
        R: Registration + 'static,
    {
        let (stop_tx, stop_rx) = bounded(1);
        let handle = thread::Builder::new()
            .name("session".into())
            .spawn(move || run_session(session, slots, sink, config, running, stop_rx))?;

        Ok(Self { handle, stop_tx })
    }

    /// Ask the thread to stop at the next tick boundary.
    pub fn stop(&self) {
        // Full channel means a stop is already pending
        let _ = self.stop_tx.try_send(());
    }

    /// Stop the thread and wait for the export to finish.
    pub fn join(self) -> Result<SessionSummary> {
        self.stop();
        self.handle
            .join()
            .map_err(|_| Error::IllegalState("session thread panicked".into()))?
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

fn run_session<R: Registration>(
    mut session: SessionLoop<R>,
    slots: SensorSlotsHandle,
    mut sink: Box<dyn GraphSink + Send>,
    config: SessionThreadConfig,
    running: Arc<AtomicBool>,
    stop_rx: Receiver<()>,
) -> Result<SessionSummary> {
    log::info!(
        "Session thread starting ({} ms tick)",
        config.tick_interval.as_millis()
    );
    let ticker = tick(config.tick_interval);

    let mut loop_result = Ok(());
    while running.load(Ordering::Relaxed) {
        let stop_requested = select! {
            recv(ticker) -> _ => {
                loop_result = session.tick(&slots).map(|_| ());
                false
            }
            recv(stop_rx) -> _ => true,
        };
        if stop_requested || loop_result.is_err() {
            break;
        }
    }

    // Consider whatever arrived since the last tick
    let loop_result = loop_result.and_then(|_| session.tick(&slots).map(|_| ()));
    if let Err(ref e) = loop_result {
        log::error!("Session loop failed: {e}");
    }

    // Export even after a loop failure; the loop error takes precedence
    let shutdown_result = session.shutdown(sink.as_mut(), config.export_format);
    loop_result?;
    shutdown_result?;

    let graph = session.graph();
    Ok(SessionSummary {
        stats: session.stats(),
        vertices: graph.num_vertices(),
        edges: graph.num_edges(),
    })
}
