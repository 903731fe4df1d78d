//! Shared state registry: every philosopher's published (state, held) pair.
//!
//! One registry-wide [`Mutex`] serialises all publications and all
//! snapshots. A snapshot taken under the gate therefore sees each agent's
//! entry exactly as one `publish` call left it, and never a mix of two.

use std::sync::{Mutex, MutexGuard, PoisonError};

use dining_types::{AgentId, AgentStatus, PhilosopherState, ResourceId, TableSnapshot};

/// Errors returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The agent id is outside `0..len`.
    #[error("agent {agent} is not seated at this table (size {size})")]
    UnknownAgent {
        /// The offending agent id.
        agent: AgentId,
        /// Number of seats in the registry.
        size: usize,
    },
}

/// Mutually exclusive store of all agents' current status.
#[derive(Debug)]
pub struct StateRegistry {
    gate: Mutex<Vec<AgentStatus>>,
}

impl StateRegistry {
    /// Create a registry with `agents` seats, everyone thinking and empty
    /// handed.
    pub fn new(agents: usize) -> Self {
        let seats = (0..agents)
            .map(|i| AgentStatus::seated(AgentId::new(i)))
            .collect();
        Self {
            gate: Mutex::new(seats),
        }
    }

    /// Number of seats.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the registry has no seats.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Overwrite `agent`'s entry with `(state, held)` in one step.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownAgent`] if `agent` has no seat.
    pub fn publish(
        &self,
        agent: AgentId,
        state: PhilosopherState,
        held: Vec<ResourceId>,
    ) -> Result<(), RegistryError> {
        let mut seats = self.lock();
        let size = seats.len();
        let entry = seats
            .get_mut(agent.index())
            .ok_or(RegistryError::UnknownAgent { agent, size })?;
        entry.state = state;
        entry.held = held;
        Ok(())
    }

    /// Run `action` under the gate and, if it succeeds, overwrite `agent`'s
    /// entry with `(state, held)` before the gate opens again.
    ///
    /// Philosophers put their sticks down through this so that the release
    /// and the cleared entry become visible together.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownAgent`] (converted into `E`) if
    /// `agent` has no seat, or the error from `action`. The entry is left
    /// unchanged on either error.
    pub fn publish_with<E, F>(
        &self,
        agent: AgentId,
        state: PhilosopherState,
        held: Vec<ResourceId>,
        action: F,
    ) -> Result<(), E>
    where
        E: From<RegistryError>,
        F: FnOnce() -> Result<(), E>,
    {
        let mut seats = self.lock();
        let size = seats.len();
        let entry = seats
            .get_mut(agent.index())
            .ok_or(RegistryError::UnknownAgent { agent, size })?;
        action()?;
        entry.state = state;
        entry.held = held;
        Ok(())
    }

    /// Copy every agent's entry, in agent id order, under the gate.
    pub fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            agents: self.lock().clone(),
        }
    }

    // Entries are replaced field by field while the guard is held and no
    // code path can panic in between, so a poisoned gate is still coherent.
    fn lock(&self) -> MutexGuard<'_, Vec<AgentStatus>> {
        self.gate.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
