//! Stop signal shared by the driver, the reporter, and every philosopher.
//!
//! Philosophers run on their own threads. They poll
//! [`StopSignal::is_stopped`] between cycles and sleep through
//! [`StopSignal::pause`], which a stop cuts short. The reporter is async and
//! awaits [`StopSignal::stopped`].
//! The driver raises the signal only after the simulation window closes, so
//! it never interferes with contention inside the window.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;

/// One-shot stop flag with async notification.
#[derive(Debug, Default)]
pub struct StopSignal {
    /// Whether a stop has been requested.
    stopped: AtomicBool,

    /// Wakes async waiters when the flag is raised.
    notify: Notify,

    /// Paired with `wake` so blocking pauses see the flag change.
    gate: Mutex<()>,

    /// Wakes threads sleeping in [`pause`](Self::pause).
    wake: Condvar,
}

impl StopSignal {
    /// Create a signal in the running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag and wake every waiter, async or blocking.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        // Taking the gate orders the store before any paused thread's
        // re-check, so no wake-up is lost.
        drop(self.gate.lock().unwrap_or_else(PoisonError::into_inner));
        self.wake.notify_all();
        self.notify.notify_waiters();
    }

    /// Whether the flag has been raised.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Block the calling thread for `duration` or until the flag is raised,
    /// whichever comes first. Returns `true` if the pause was cut short.
    pub fn pause(&self, duration: Duration) -> bool {
        if duration.is_zero() {
            return self.is_stopped();
        }
        let guard = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
        let (_guard, timeout) = self
            .wake
            .wait_timeout_while(guard, duration, |_| !self.is_stopped())
            .unwrap_or_else(PoisonError::into_inner);
        !timeout.timed_out()
    }

    /// Wait until the flag is raised. Returns immediately if it already is.
    pub async fn stopped(&self) {
        loop {
            // Register before checking so a concurrent `stop` cannot slip
            // between the check and the await.
            let notified = self.notify.notified();
            if self.is_stopped() {
                return;
            }
            notified.await;
        }
    }
}
