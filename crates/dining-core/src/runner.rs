//! Simulation driver.
//!
//! [`run_simulation`] owns the lifetime of one run:
//!
//! 1. Validate the configuration and lay the table.
//! 2. Emit the start record.
//! 3. Start every philosopher on its own named OS thread and the reporter
//!    as an async task.
//! 4. Wait for the configured duration or the interrupt, whichever is first.
//! 5. Raise the stop signal, clear the table so blocked philosophers wake,
//!    and wait (up to the grace period) for everyone to finish. Threads
//!    still running after that are left behind and do not hold the process
//!    open.
//! 6. Emit the termination record.
//!
//! Nothing inside the window detects or breaks a deadlock. If every
//! philosopher ends up holding its left stick, the status records show it
//! until the window closes.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use dining_types::{
    AgentId, StartRecord, TableSnapshot, TerminationReason, TerminationRecord,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::agent::{AgentError, Pacing, Philosopher};
use crate::clock::SimulationClock;
use crate::config::{ConfigError, SimulationConfig};
use crate::reporter::Reporter;
use crate::shutdown::StopSignal;
use crate::sink::ReportSink;
use crate::table::Table;

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The configuration was rejected before anything started.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The OS refused to start a philosopher thread.
    #[error("failed to start thread for philosopher {agent}: {source}")]
    Spawn {
        /// The philosopher that could not be started.
        agent: AgentId,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Completion report sent by a philosopher thread when its loop returns.
type Outcome = (AgentId, Result<(), AgentError>);

/// Per-run counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Completed meals per philosopher, index `i` is agent `i`.
    pub meals: Vec<u64>,
    /// Philosophers still running when the grace period ran out.
    pub detached: usize,
    /// Whether the reporter was still running when the grace period ran out.
    pub reporter_detached: bool,
}

impl SimulationStats {
    /// Total meals across the table.
    pub fn total_meals(&self) -> u64 {
        self.meals.iter().fold(0, |acc, m| acc.saturating_add(*m))
    }

    /// Philosophers that never ate.
    pub fn starved(&self) -> Vec<AgentId> {
        self.meals
            .iter()
            .enumerate()
            .filter(|(_, m)| **m == 0)
            .map(|(i, _)| AgentId::new(i))
            .collect()
    }
}

/// Result of the simulation run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Why the window closed.
    pub reason: TerminationReason,
    /// Elapsed time when the window closed.
    pub elapsed: Duration,
    /// Number of status records handed to the sink.
    pub status_records: u64,
    /// Registry contents after everyone stopped.
    pub final_snapshot: TableSnapshot,
    /// Meal counts and shutdown bookkeeping.
    pub stats: SimulationStats,
}

/// Run one simulation.
///
/// `interrupt` is any future that resolves when an external stop is
/// requested (the binary passes Ctrl-C). It is only polled during the wait
/// for the window to close.
///
/// # Errors
///
/// Returns [`RunnerError::Config`] if the configuration fails validation,
/// or [`RunnerError::Spawn`] if a philosopher thread cannot be started (the
/// ones already running are stopped first). Once every philosopher is
/// seated, the run always completes.
pub async fn run_simulation<I>(
    config: &SimulationConfig,
    sink: Arc<dyn ReportSink>,
    interrupt: I,
) -> Result<SimulationResult, RunnerError>
where
    I: Future<Output = ()>,
{
    config.validate()?;

    let size = config.table.agents;
    let table = Table::new(size);
    let stop = Arc::new(StopSignal::new());
    let clock = SimulationClock::start(config.timing.duration());

    info!(
        agents = size,
        duration_secs = config.timing.duration_secs,
        report_period_ms = config.timing.report_period_ms,
        "Simulation starting"
    );
    if let Err(e) = sink.on_start(&StartRecord {
        agent_count: size,
        started_at: clock.started_at(),
    }) {
        warn!(error = %e, "report sink rejected start record");
    }

    // --- Start philosophers ---
    let philosophers = table.seat(Pacing::from(&config.table));
    let meals: Vec<Arc<AtomicU64>> = philosophers.iter().map(|p| p.meals()).collect();
    let mut agent_done = Vec::with_capacity(size);
    for philosopher in philosophers {
        match spawn_philosopher(philosopher, Arc::clone(&stop)) {
            Ok(done) => agent_done.push(done),
            Err(e) => {
                error!(error = %e, "Aborting simulation start");
                stop.stop();
                table.clear();
                return Err(e);
            }
        }
    }

    // --- Start reporter ---
    let reporter = Reporter::new(
        table.registry(),
        Arc::clone(&sink),
        clock,
        config.timing.report_period(),
    );
    let reporter_handle = tokio::spawn(reporter.run(Arc::clone(&stop)));

    // --- Wait for the window to close ---
    let reason = tokio::select! {
        () = tokio::time::sleep(clock.remaining()) => TerminationReason::Completed,
        () = interrupt => TerminationReason::Interrupted,
    };
    let elapsed = clock.elapsed();
    info!(reason = %reason, elapsed_ms = elapsed.as_millis(), "Simulation window closed");

    // --- Supervised shutdown ---
    stop.stop();
    table.clear();
    let grace = config.timing.shutdown_grace();
    let (status_records, reporter_detached) = join_reporter(reporter_handle, grace).await;
    let detached = join_philosophers(agent_done, grace).await;

    let stats = SimulationStats {
        meals: meals.iter().map(|m| m.load(Ordering::Relaxed)).collect(),
        detached,
        reporter_detached,
    };

    if let Err(e) = sink.on_termination(&TerminationRecord {
        elapsed,
        duration: clock.duration(),
        reason,
        ended_at: Utc::now(),
    }) {
        warn!(error = %e, "report sink rejected termination record");
    }

    Ok(SimulationResult {
        reason,
        elapsed,
        status_records,
        final_snapshot: table.registry().snapshot(),
        stats,
    })
}

/// Start `philosopher` on a dedicated thread. The returned receiver
/// resolves when its loop returns.
fn spawn_philosopher(
    philosopher: Philosopher,
    stop: Arc<StopSignal>,
) -> Result<oneshot::Receiver<Outcome>, RunnerError> {
    let agent = philosopher.id();
    let (done_tx, done_rx) = oneshot::channel();
    thread::Builder::new()
        .name(format!("philosopher-{agent}"))
        .spawn(move || {
            let outcome = philosopher.run(&stop);
            if done_tx.send((agent, outcome)).is_err() {
                trace!(agent = %agent, "driver stopped waiting before philosopher finished");
            }
        })
        .map_err(|source| RunnerError::Spawn { agent, source })?;
    Ok(done_rx)
}

/// Wait for the reporter. Returns its record count and whether it had to be
/// left behind.
async fn join_reporter(handle: JoinHandle<u64>, grace: Duration) -> (u64, bool) {
    match tokio::time::timeout(grace, handle).await {
        Ok(Ok(count)) => (count, false),
        Ok(Err(e)) => {
            error!(error = %e, "reporter task failed");
            (0, false)
        }
        Err(_elapsed) => {
            warn!(grace_ms = grace.as_millis(), "reporter did not stop in time, detaching");
            (0, true)
        }
    }
}

/// Wait for every philosopher within one shared grace period. Returns the
/// number left running; their threads are simply abandoned.
async fn join_philosophers(done: Vec<oneshot::Receiver<Outcome>>, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now()
        .checked_add(grace)
        .unwrap_or_else(tokio::time::Instant::now);
    let mut detached: usize = 0;

    for receiver in done {
        match tokio::time::timeout_at(deadline, receiver).await {
            Ok(Ok((agent, Ok(())))) => debug!(agent = %agent, "philosopher stopped"),
            Ok(Ok((agent, Err(e)))) if e.is_closed() => {
                debug!(agent = %agent, "philosopher released by table clear");
            }
            Ok(Ok((agent, Err(e)))) => {
                error!(agent = %agent, error = %e, "philosopher loop failed");
            }
            Ok(Err(_closed)) => error!("philosopher thread exited without reporting"),
            Err(_elapsed) => detached = detached.saturating_add(1),
        }
    }

    if detached > 0 {
        warn!(detached, grace_ms = grace.as_millis(), "philosophers did not stop in time, detaching");
    }
    detached
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = %result.reason,
        elapsed_ms = result.elapsed.as_millis(),
        status_records = result.status_records,
        total_meals = result.stats.total_meals(),
        "Simulation ended"
    );

    let starved = result.stats.starved();
    if !starved.is_empty() {
        warn!(
            starved = ?starved.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "Some philosophers never ate"
        );
    }
    if result.stats.detached > 0 || result.stats.reporter_detached {
        warn!(
            philosophers = result.stats.detached,
            reporter = result.stats.reporter_detached,
            "Tasks were detached at shutdown"
        );
    }
}
