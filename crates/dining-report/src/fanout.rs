//! Sink that forwards each record to several others.

use std::sync::Arc;

use dining_core::sink::{ReportSink, SinkError};
use dining_types::{StartRecord, StatusRecord, TerminationRecord};

/// Forwards every record to each inner sink in order.
///
/// A failing sink does not stop the others from receiving the record; the
/// first error is returned after all of them have been called.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn ReportSink>>,
}

impl FanoutSink {
    /// Add another sink at the end.
    pub fn push(&mut self, sink: Arc<dyn ReportSink>) {
        self.sinks.push(sink);
    }

    /// Number of inner sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether there are no inner sinks.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn forward<F>(&self, send: F) -> Result<(), SinkError>
    where
        F: Fn(&dyn ReportSink) -> Result<(), SinkError>,
    {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = send(sink.as_ref()) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl ReportSink for FanoutSink {
    fn on_start(&self, record: &StartRecord) -> Result<(), SinkError> {
        self.forward(|sink| sink.on_start(record))
    }

    fn on_status(&self, record: &StatusRecord) -> Result<(), SinkError> {
        self.forward(|sink| sink.on_status(record))
    }

    fn on_termination(&self, record: &TerminationRecord) -> Result<(), SinkError> {
        self.forward(|sink| sink.on_termination(record))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use dining_core::sink::MemorySink;
    use dining_types::TableSnapshot;

    use super::*;

    struct Broken;

    impl ReportSink for Broken {
        fn on_start(&self, _record: &StartRecord) -> Result<(), SinkError> {
            Err(std::io::Error::other("broken pipe").into())
        }

        fn on_status(&self, _record: &StatusRecord) -> Result<(), SinkError> {
            Err(std::io::Error::other("broken pipe").into())
        }

        fn on_termination(&self, _record: &TerminationRecord) -> Result<(), SinkError> {
            Err(std::io::Error::other("broken pipe").into())
        }
    }

    fn status(sequence: u64) -> StatusRecord {
        StatusRecord {
            sequence,
            elapsed: Duration::ZERO,
            snapshot: TableSnapshot::default(),
        }
    }

    #[test]
    fn every_sink_sees_every_record() {
        let a = Arc::new(MemorySink::new());
        let b = Arc::new(MemorySink::new());
        let mut fanout = FanoutSink::default();
        fanout.push(a.clone());
        fanout.push(b.clone());
        assert_eq!(fanout.len(), 2);

        fanout.on_status(&status(0)).unwrap();
        fanout.on_status(&status(1)).unwrap();

        assert_eq!(a.recorded().statuses.len(), 2);
        assert_eq!(b.recorded().statuses.len(), 2);
    }

    #[test]
    fn failing_sink_does_not_starve_the_rest() {
        let memory = Arc::new(MemorySink::new());
        let mut fanout = FanoutSink::default();
        assert!(fanout.is_empty());
        fanout.push(Arc::new(Broken));
        fanout.push(memory.clone());

        assert!(matches!(
            fanout.on_status(&status(0)),
            Err(SinkError::Io { .. })
        ));
        assert_eq!(memory.recorded().statuses.len(), 1);
    }
}
