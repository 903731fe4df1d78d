//! Periodic status reporter.
//!
//! The reporter sleeps for one period, snapshots the registry, and hands a
//! [`StatusRecord`] to the sink, until the stop signal is raised. It only
//! ever takes the registry gate for the length of one snapshot copy and
//! never touches a stick, so it cannot join a circular wait.

use std::sync::Arc;
use std::time::Duration;

use dining_types::StatusRecord;
use tracing::{debug, warn};

use crate::clock::SimulationClock;
use crate::registry::StateRegistry;
use crate::shutdown::StopSignal;
use crate::sink::ReportSink;

/// Samples the registry on a fixed period.
pub struct Reporter {
    registry: Arc<StateRegistry>,
    sink: Arc<dyn ReportSink>,
    clock: SimulationClock,
    period: Duration,
}

impl Reporter {
    /// Create a reporter for `registry` writing to `sink`.
    pub fn new(
        registry: Arc<StateRegistry>,
        sink: Arc<dyn ReportSink>,
        clock: SimulationClock,
        period: Duration,
    ) -> Self {
        Self {
            registry,
            sink,
            clock,
            period,
        }
    }

    /// Take one snapshot and wrap it in a status record.
    pub fn sample(&self, sequence: u64) -> StatusRecord {
        let snapshot = self.registry.snapshot();
        StatusRecord {
            sequence,
            elapsed: self.clock.elapsed(),
            snapshot,
        }
    }

    /// Report until `stop` is raised. Returns the number of status records
    /// handed to the sink.
    pub async fn run(self, stop: Arc<StopSignal>) -> u64 {
        let mut sequence: u64 = 0;
        loop {
            tokio::select! {
                () = stop.stopped() => break,
                () = tokio::time::sleep(self.period) => {}
            }

            let record = self.sample(sequence);
            if let Err(e) = self.sink.on_status(&record) {
                warn!(error = %e, sequence, "report sink rejected status record");
            }
            sequence = sequence.saturating_add(1);
        }
        debug!(records = sequence, "Reporter stopped");
        sequence
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dining_types::{AgentId, PhilosopherState, ResourceId};

    use super::*;
    use crate::sink::MemorySink;

    fn reporter(sink: Arc<MemorySink>, registry: Arc<StateRegistry>) -> Reporter {
        Reporter::new(
            registry,
            sink,
            SimulationClock::start(Duration::from_secs(1)),
            Duration::from_millis(5),
        )
    }

    #[test]
    fn sample_copies_current_registry() {
        let registry = Arc::new(StateRegistry::new(2));
        registry
            .publish(AgentId::new(1), PhilosopherState::Hungry, vec![ResourceId::new(1)])
            .unwrap();
        let r = reporter(Arc::new(MemorySink::new()), Arc::clone(&registry));

        let record = r.sample(7);
        assert_eq!(record.sequence, 7);
        assert_eq!(record.snapshot, registry.snapshot());
    }

    #[tokio::test]
    async fn run_reports_until_stopped() {
        let sink = Arc::new(MemorySink::new());
        let registry = Arc::new(StateRegistry::new(3));
        let stop = Arc::new(StopSignal::new());

        let handle = tokio::spawn(reporter(Arc::clone(&sink), registry).run(Arc::clone(&stop)));
        tokio::time::sleep(Duration::from_millis(100)).await;
        stop.stop();
        let count = handle.await.unwrap();

        let recorded = sink.recorded();
        assert!(count > 0);
        assert_eq!(u64::try_from(recorded.statuses.len()).unwrap(), count);
        for (i, status) in recorded.statuses.iter().enumerate() {
            assert_eq!(status.sequence, u64::try_from(i).unwrap());
            assert_eq!(status.snapshot.len(), 3);
        }
        assert!(
            recorded
                .statuses
                .windows(2)
                .all(|w| w.first().map(|a| a.elapsed) <= w.last().map(|b| b.elapsed))
        );
    }
}
