//! Record structs handed from the simulation core to its report sinks.
//!
//! A run produces exactly one [`StartRecord`], any number of
//! [`StatusRecord`]s, and exactly one [`TerminationRecord`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{PhilosopherState, TerminationReason};
use crate::ids::{AgentId, ResourceId};

/// One philosopher's published state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStatus {
    /// The philosopher this entry describes.
    pub agent_id: AgentId,
    /// Current phase.
    pub state: PhilosopherState,
    /// Sticks currently held, in acquisition order.
    pub held: Vec<ResourceId>,
}

impl AgentStatus {
    /// A freshly seated philosopher: thinking, holding nothing.
    pub const fn seated(agent_id: AgentId) -> Self {
        Self {
            agent_id,
            state: PhilosopherState::Thinking,
            held: Vec::new(),
        }
    }

    /// Whether this philosopher currently holds `resource`.
    pub fn holds(&self, resource: ResourceId) -> bool {
        self.held.contains(&resource)
    }
}

/// A consistent point-in-time copy of every philosopher's status, in agent
/// id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Per-agent status, index `i` is agent `i`.
    pub agents: Vec<AgentStatus>,
}

impl TableSnapshot {
    /// Number of philosophers in the snapshot.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Iterate over the philosophers currently eating.
    pub fn eating(&self) -> impl Iterator<Item = &AgentStatus> {
        self.agents
            .iter()
            .filter(|a| a.state == PhilosopherState::Eating)
    }

    /// Philosophers that claim to hold `resource`.
    pub fn holders_of(&self, resource: ResourceId) -> Vec<AgentId> {
        self.agents
            .iter()
            .filter(|a| a.holds(resource))
            .map(|a| a.agent_id)
            .collect()
    }
}

/// Emitted once when the simulation starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRecord {
    /// Number of philosophers (and sticks) at the table.
    pub agent_count: usize,
    /// Wall-clock start time.
    pub started_at: DateTime<Utc>,
}

/// Emitted by the reporter on every period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Zero-based sequence number of this status record.
    pub sequence: u64,
    /// Time since the simulation started.
    pub elapsed: Duration,
    /// The consistent snapshot taken for this record.
    pub snapshot: TableSnapshot,
}

/// Emitted once when the simulation window closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationRecord {
    /// Time since the simulation started when the window closed.
    pub elapsed: Duration,
    /// The configured duration of the window.
    pub duration: Duration,
    /// Why the window closed.
    pub reason: TerminationReason,
    /// Wall-clock end time.
    pub ended_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(id: usize, state: PhilosopherState, held: &[usize]) -> AgentStatus {
        AgentStatus {
            agent_id: AgentId::new(id),
            state,
            held: held.iter().copied().map(ResourceId::new).collect(),
        }
    }

    #[test]
    fn holders_of_finds_every_claimant() {
        let snap = TableSnapshot {
            agents: vec![
                status(0, PhilosopherState::Eating, &[0, 1]),
                status(1, PhilosopherState::Hungry, &[]),
                status(2, PhilosopherState::Hungry, &[2]),
            ],
        };
        assert_eq!(snap.holders_of(ResourceId::new(1)), vec![AgentId::new(0)]);
        assert!(snap.holders_of(ResourceId::new(3)).is_empty());
        assert_eq!(snap.eating().count(), 1);
    }

    #[test]
    fn seated_agent_holds_nothing() {
        let seated = AgentStatus::seated(AgentId::new(4));
        assert_eq!(seated.state, PhilosopherState::Thinking);
        assert!(seated.held.is_empty());
    }
}
