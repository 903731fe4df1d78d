//! Simulation clock: start time and the fixed window length.
//!
//! Elapsed time is measured on the monotonic clock. The wall-clock start is
//! kept only for the start and termination records.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Start time plus configured duration of one simulation run.
#[derive(Debug, Clone, Copy)]
pub struct SimulationClock {
    /// Monotonic start instant.
    started: Instant,

    /// Wall-clock start time.
    started_at: DateTime<Utc>,

    /// Length of the simulation window.
    duration: Duration,
}

impl SimulationClock {
    /// Start the clock now.
    pub fn start(duration: Duration) -> Self {
        Self {
            started: Instant::now(),
            started_at: Utc::now(),
            duration,
        }
    }

    /// Time since [`start`](Self::start).
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left in the window, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed())
    }

    /// The configured window length.
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Wall-clock start time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_leaves_nothing_remaining() {
        let clock = SimulationClock::start(Duration::ZERO);
        assert_eq!(clock.remaining(), Duration::ZERO);
    }

    #[test]
    fn remaining_shrinks_as_time_passes() {
        let clock = SimulationClock::start(Duration::from_secs(60));
        let first = clock.remaining();
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.remaining() < first);
        assert!(clock.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn started_at_is_not_in_the_future() {
        let clock = SimulationClock::start(Duration::from_secs(1));
        assert!(clock.started_at() <= Utc::now());
        assert_eq!(clock.duration(), Duration::from_secs(1));
    }
}
