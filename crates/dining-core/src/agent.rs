//! Philosophers: the per-agent state machine and acquisition protocol.
//!
//! Every philosopher runs the same cycle:
//!
//! ```text
//! think -> hungry -> take left -> take right -> eat -> put down (right, left)
//! ```
//!
//! The left stick is always taken first. No ordering by id, no
//! try-and-backoff, no timeout. With every philosopher doing the same thing
//! around a ring, circular wait is reachable: each can hold its left stick
//! and block forever on its right one.
//!
//! Publications into the [`StateRegistry`]:
//!
//! | step        | state      | held            |
//! |-------------|------------|-----------------|
//! | think       | `Thinking` | `[]`            |
//! | hungry      | `Hungry`   | `[]`            |
//! | take left   | `Hungry`   | `[left]`        |
//! | take right  | (none)     |                 |
//! | eat         | `Eating`   | `[left, right]` |
//! | put down    | `Thinking` | `[]`            |
//!
//! The single publication between the two acquisitions is what makes a
//! partial (or total) deadlock visible to the reporter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dining_types::{AgentId, PhilosopherState, ResourceId};
use rand::Rng;
use tracing::trace;

use crate::config::TableConfig;
use crate::registry::{RegistryError, StateRegistry};
use crate::resource::{ResourceError, Stick};
use crate::shutdown::StopSignal;

/// Errors that end a philosopher's loop.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// A stick operation failed.
    #[error("stick error: {source}")]
    Resource {
        /// The underlying stick error.
        #[from]
        source: ResourceError,
    },

    /// A registry publication failed.
    #[error("registry error: {source}")]
    Registry {
        /// The underlying registry error.
        #[from]
        source: RegistryError,
    },
}

impl AgentError {
    /// Whether this error only means the table was cleared under the agent.
    pub const fn is_closed(&self) -> bool {
        matches!(
            self,
            Self::Resource {
                source: ResourceError::Closed { .. }
            }
        )
    }
}

/// Optional pauses inside the cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pacing {
    /// Shortest think pause.
    pub think_min: Duration,
    /// Longest think pause.
    pub think_max: Duration,
    /// Eating pause.
    pub eat: Duration,
}

impl From<&TableConfig> for Pacing {
    fn from(config: &TableConfig) -> Self {
        let (think_min, think_max) = config.think_range();
        Self {
            think_min,
            think_max,
            eat: config.eat_delay(),
        }
    }
}

/// One philosopher seated between two sticks.
#[derive(Debug)]
pub struct Philosopher {
    id: AgentId,
    left: Arc<Stick>,
    right: Arc<Stick>,
    registry: Arc<StateRegistry>,
    pacing: Pacing,
    meals: Arc<AtomicU64>,
}

impl Philosopher {
    /// Seat a philosopher between `left` and `right`.
    pub fn new(
        id: AgentId,
        left: Arc<Stick>,
        right: Arc<Stick>,
        registry: Arc<StateRegistry>,
        pacing: Pacing,
    ) -> Self {
        Self {
            id,
            left,
            right,
            registry,
            pacing,
            meals: Arc::new(AtomicU64::new(0)),
        }
    }

    /// This philosopher's id.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Id of the stick taken first.
    pub fn left_id(&self) -> ResourceId {
        self.left.id()
    }

    /// Id of the stick taken second.
    pub fn right_id(&self) -> ResourceId {
        self.right.id()
    }

    /// Shared counter of completed meals, readable while the loop runs.
    pub fn meals(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.meals)
    }

    /// Run cycles until `stop` is raised or a step fails.
    ///
    /// # Errors
    ///
    /// Returns the first [`AgentError`]. When the table is cleared while the
    /// philosopher is blocked, that is [`ResourceError::Closed`].
    pub fn run(&self, stop: &StopSignal) -> Result<(), AgentError> {
        trace!(agent = %self.id, left = %self.left_id(), right = %self.right_id(), "philosopher seated");
        while !stop.is_stopped() {
            self.cycle(stop)?;
        }
        Ok(())
    }

    /// One full think-to-put-down cycle. Pauses end early once `stop` is
    /// raised.
    ///
    /// # Errors
    ///
    /// Returns the first [`AgentError`] raised by any step.
    pub fn cycle(&self, stop: &StopSignal) -> Result<(), AgentError> {
        self.think(stop)?;
        self.become_hungry()?;
        self.take_left()?;
        self.take_right()?;
        self.eat(stop)?;
        self.put_down()
    }

    /// Publish `Thinking` with nothing held, then pause for the think time
    /// or until `stop` is raised.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Registry`] if the publication fails.
    pub fn think(&self, stop: &StopSignal) -> Result<(), AgentError> {
        self.registry
            .publish(self.id, PhilosopherState::Thinking, Vec::new())?;
        stop.pause(self.think_pause());
        Ok(())
    }

    /// Publish `Hungry` with nothing held.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Registry`] if the publication fails.
    pub fn become_hungry(&self) -> Result<(), AgentError> {
        self.registry
            .publish(self.id, PhilosopherState::Hungry, Vec::new())?;
        Ok(())
    }

    /// Block on the left stick, then publish `Hungry` holding it.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Resource`] if the stick is closed, or
    /// [`AgentError::Registry`] if the publication fails.
    pub fn take_left(&self) -> Result<(), AgentError> {
        self.left.acquire(self.id)?;
        self.registry
            .publish(self.id, PhilosopherState::Hungry, vec![self.left.id()])?;
        Ok(())
    }

    /// Block on the right stick while still holding the left one.
    ///
    /// Publishes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Resource`] if the stick is closed.
    pub fn take_right(&self) -> Result<(), AgentError> {
        self.right.acquire(self.id)?;
        Ok(())
    }

    /// Publish `Eating` holding both sticks, count the meal, and pause for
    /// the eat time or until `stop` is raised.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Registry`] if the publication fails.
    pub fn eat(&self, stop: &StopSignal) -> Result<(), AgentError> {
        self.registry.publish(
            self.id,
            PhilosopherState::Eating,
            vec![self.left.id(), self.right.id()],
        )?;
        self.meals.fetch_add(1, Ordering::Relaxed);
        stop.pause(self.pacing.eat);
        Ok(())
    }

    /// Release the right stick, then the left one.
    ///
    /// Both releases happen under the registry gate together with a
    /// `Thinking`, empty-handed publication, so no snapshot can show a stick
    /// that has already been handed to a neighbour as still held here.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Resource`] if this philosopher does not hold
    /// both sticks.
    pub fn put_down(&self) -> Result<(), AgentError> {
        self.registry.publish_with(
            self.id,
            PhilosopherState::Thinking,
            Vec::new(),
            || -> Result<(), AgentError> {
                self.right.release(self.id)?;
                self.left.release(self.id)?;
                Ok(())
            },
        )
    }

    fn think_pause(&self) -> Duration {
        let Pacing {
            think_min,
            think_max,
            ..
        } = self.pacing;
        if think_max <= think_min {
            return think_min;
        }
        rand::rng().random_range(think_min..=think_max)
    }
}
