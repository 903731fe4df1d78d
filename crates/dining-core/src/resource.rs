//! Sticks: exclusively held tokens with blocking acquisition.
//!
//! A [`Stick`] is a binary semaphore that also remembers who holds it. The
//! holder is recorded so a release by anyone else can be refused, and so
//! tests can check mutual exclusion directly.
//!
//! Acquisition never times out. Fairness between waiters is unspecified:
//! whichever thread the [`Condvar`] wakes and wins the mutex gets the stick,
//! so starvation and deadlock are both possible outcomes.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use dining_types::{AgentId, ResourceId};

/// Errors returned by stick operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// The caller tried to release a stick it does not hold.
    #[error("agent {agent} released stick {resource} held by {holder:?}")]
    NotHolder {
        /// The stick being released.
        resource: ResourceId,
        /// The agent attempting the release.
        agent: AgentId,
        /// The actual holder, if any.
        holder: Option<AgentId>,
    },

    /// The table is being cleared; no further acquisitions are granted.
    #[error("stick {resource} is closed")]
    Closed {
        /// The closed stick.
        resource: ResourceId,
    },
}

#[derive(Debug, Default)]
struct Slot {
    holder: Option<AgentId>,
    closed: bool,
}

/// A single stick on the table.
#[derive(Debug)]
pub struct Stick {
    id: ResourceId,
    slot: Mutex<Slot>,
    released: Condvar,
}

impl Stick {
    /// Create a free stick.
    pub fn new(id: ResourceId) -> Self {
        Self {
            id,
            slot: Mutex::new(Slot::default()),
            released: Condvar::new(),
        }
    }

    /// The stick's immutable identity.
    pub const fn id(&self) -> ResourceId {
        self.id
    }

    /// Block until the stick is free, then take it for `agent`.
    ///
    /// Not reentrant: an agent that already holds the stick blocks forever
    /// (until [`close`](Self::close)) if it asks again.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Closed`] if the stick is closed before or
    /// while waiting.
    pub fn acquire(&self, agent: AgentId) -> Result<(), ResourceError> {
        let mut slot = self.lock();
        loop {
            if slot.closed {
                return Err(ResourceError::Closed { resource: self.id });
            }
            if slot.holder.is_none() {
                slot.holder = Some(agent);
                return Ok(());
            }
            slot = self
                .released
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Put the stick back on the table.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotHolder`] if `agent` is not the holder.
    /// The stick is left untouched in that case.
    pub fn release(&self, agent: AgentId) -> Result<(), ResourceError> {
        let mut slot = self.lock();
        if slot.holder != Some(agent) {
            return Err(ResourceError::NotHolder {
                resource: self.id,
                agent,
                holder: slot.holder,
            });
        }
        slot.holder = None;
        drop(slot);
        self.released.notify_one();
        Ok(())
    }

    /// The agent currently holding the stick, if any.
    pub fn holder(&self) -> Option<AgentId> {
        self.lock().holder
    }

    /// Refuse all further acquisitions and wake every blocked acquirer.
    ///
    /// Used only when the table is cleared after the simulation window.
    pub fn close(&self) {
        self.lock().closed = true;
        self.released.notify_all();
    }

    // The slot only holds plain values assigned in one step, so a poisoned
    // mutex still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
