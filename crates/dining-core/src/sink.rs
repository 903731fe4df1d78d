//! Report sinks: where start, status, and termination records go.
//!
//! The core never formats anything. It hands each record to a
//! [`ReportSink`] and logs (but otherwise ignores) sink failures, so a full
//! disk or a closed stdout cannot stall the philosophers.

use std::sync::{Mutex, MutexGuard, PoisonError};

use dining_types::{StartRecord, StatusRecord, TerminationRecord};
use tracing::{Level, debug, info};

/// Errors a sink may report.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Writing to the underlying medium failed.
    #[error("sink I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Serializing a record failed.
    #[error("sink serialization error: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Consumer of simulation records.
///
/// Called from the driver (start, termination) and from the reporter task
/// (status), possibly concurrently with nothing else; implementations must
/// be thread-safe.
pub trait ReportSink: Send + Sync {
    /// Called once before any philosopher starts.
    fn on_start(&self, record: &StartRecord) -> Result<(), SinkError>;

    /// Called for every status snapshot.
    fn on_status(&self, record: &StatusRecord) -> Result<(), SinkError>;

    /// Called once after the simulation window closes.
    fn on_termination(&self, record: &TerminationRecord) -> Result<(), SinkError>;
}

/// Everything a [`MemorySink`] has received.
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    /// The start record, once received.
    pub start: Option<StartRecord>,
    /// Status records in arrival order.
    pub statuses: Vec<StatusRecord>,
    /// The termination record, once received.
    pub termination: Option<TerminationRecord>,
}

/// Sink that keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    recorded: Mutex<Recorded>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received so far.
    pub fn recorded(&self) -> Recorded {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReportSink for MemorySink {
    fn on_start(&self, record: &StartRecord) -> Result<(), SinkError> {
        self.lock().start = Some(record.clone());
        Ok(())
    }

    fn on_status(&self, record: &StatusRecord) -> Result<(), SinkError> {
        self.lock().statuses.push(record.clone());
        Ok(())
    }

    fn on_termination(&self, record: &TerminationRecord) -> Result<(), SinkError> {
        self.lock().termination = Some(record.clone());
        Ok(())
    }
}

/// Sink that emits records as structured `tracing` events.
///
/// Start and termination go out at `info`; status records at `debug` with
/// the snapshot serialized as JSON. The snapshot is only serialized when
/// `debug` is enabled for this module.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn on_start(&self, record: &StartRecord) -> Result<(), SinkError> {
        info!(
            agents = record.agent_count,
            started_at = %record.started_at,
            "Simulation started"
        );
        Ok(())
    }

    fn on_status(&self, record: &StatusRecord) -> Result<(), SinkError> {
        if !tracing::enabled!(Level::DEBUG) {
            return Ok(());
        }
        let agents = serde_json::to_string(&record.snapshot.agents)?;
        debug!(
            sequence = record.sequence,
            elapsed_ms = record.elapsed.as_millis(),
            eating = record.snapshot.eating().count(),
            agents,
            "Table status"
        );
        Ok(())
    }

    fn on_termination(&self, record: &TerminationRecord) -> Result<(), SinkError> {
        info!(
            reason = %record.reason,
            elapsed_ms = record.elapsed.as_millis(),
            duration_secs = record.duration.as_secs(),
            ended_at = %record.ended_at,
            "Simulation ended"
        );
        Ok(())
    }
}
