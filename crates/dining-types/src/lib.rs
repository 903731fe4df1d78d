//! Shared type definitions for the dining philosophers simulation.
//!
//! This crate is the single source of truth for the identifiers, state tags,
//! and report records exchanged between the simulation core and its sinks.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for agent and resource ring positions
//! - [`enums`] -- Philosopher state and termination reason tags
//! - [`records`] -- Snapshot and report record structs

pub mod enums;
pub mod ids;
pub mod records;

// Re-export all public types at crate root for convenience.
pub use enums::{PhilosopherState, TerminationReason};
pub use ids::{AgentId, ResourceId};
pub use records::{AgentStatus, StartRecord, StatusRecord, TableSnapshot, TerminationRecord};
