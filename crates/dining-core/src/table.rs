//! The round table: sticks and philosophers wired into a ring.
//!
//! Philosopher `i` takes stick `i` as its left stick and stick `(i + 1) mod N`
//! as its right one, so neighbours share exactly one stick and the last
//! philosopher's right stick is the first one's left.

use std::sync::Arc;

use dining_types::{AgentId, ResourceId};

use crate::agent::{Pacing, Philosopher};
use crate::registry::StateRegistry;
use crate::resource::Stick;

/// Sticks plus the shared registry for one simulation.
#[derive(Debug)]
pub struct Table {
    sticks: Vec<Arc<Stick>>,
    registry: Arc<StateRegistry>,
}

impl Table {
    /// Lay `size` sticks on the table and prepare `size` seats.
    pub fn new(size: usize) -> Self {
        Self {
            sticks: (0..size)
                .map(|i| Arc::new(Stick::new(ResourceId::new(i))))
                .collect(),
            registry: Arc::new(StateRegistry::new(size)),
        }
    }

    /// Number of seats (and sticks).
    pub fn size(&self) -> usize {
        self.sticks.len()
    }

    /// The shared registry.
    pub fn registry(&self) -> Arc<StateRegistry> {
        Arc::clone(&self.registry)
    }

    /// All sticks in id order.
    pub fn sticks(&self) -> &[Arc<Stick>] {
        &self.sticks
    }

    /// Seat one philosopher per stick, wired into the ring.
    pub fn seat(&self, pacing: Pacing) -> Vec<Philosopher> {
        let rights = self.sticks.iter().cycle().skip(1);
        self.sticks
            .iter()
            .zip(rights)
            .enumerate()
            .map(|(i, (left, right))| {
                Philosopher::new(
                    AgentId::new(i),
                    Arc::clone(left),
                    Arc::clone(right),
                    Arc::clone(&self.registry),
                    pacing,
                )
            })
            .collect()
    }

    /// Close every stick, waking anyone blocked on one.
    pub fn clear(&self) {
        for stick in &self.sticks {
            stick.close();
        }
    }
}
