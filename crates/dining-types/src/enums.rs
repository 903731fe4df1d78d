//! Enumeration types for the dining philosophers simulation.
//!
//! These are plain tags. Human-readable labels belong to the report layer.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Philosopher state
// ---------------------------------------------------------------------------

/// The phase a philosopher is currently in.
///
/// The cycle is `Thinking -> Hungry -> Eating -> Thinking` with no terminal
/// state. A `Hungry` philosopher may already hold its left stick.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PhilosopherState {
    /// Not contending for any stick.
    #[default]
    Thinking,
    /// Contending for sticks; holds none or only the left one.
    Hungry,
    /// Holds both sticks.
    Eating,
}

impl PhilosopherState {
    /// Stable machine-readable tag (`thinking`, `hungry`, `eating`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Thinking => "thinking",
            Self::Hungry => "hungry",
            Self::Eating => "eating",
        }
    }
}

// ---------------------------------------------------------------------------
// Termination
// ---------------------------------------------------------------------------

/// Why the simulation window closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The configured duration elapsed.
    Completed,
    /// An external interrupt arrived before the duration elapsed.
    Interrupted,
}

impl TerminationReason {
    /// Stable machine-readable tag (`completed` or `interrupted`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
        }
    }
}

impl core::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
