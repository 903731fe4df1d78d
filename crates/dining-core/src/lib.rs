//! Sticks, philosophers, state registry, and simulation driver for the
//! dining philosophers simulation.
//!
//! Philosophers always take their left stick before their right one, so the
//! classic circular-wait deadlock stays reachable. This crate's job is to
//! let it happen and report it faithfully, not to prevent it.
//!
//! # Modules
//!
//! - [`agent`] -- The philosopher state machine and acquisition protocol.
//! - [`clock`] -- Simulation start time and window length.
//! - [`config`] -- Configuration loading from `dining-config.yaml` into
//!   strongly-typed structs.
//! - [`registry`] -- The shared state registry behind one gate.
//! - [`reporter`] -- Periodic snapshot reporter.
//! - [`resource`] -- Sticks with blocking, non-reentrant acquisition.
//! - [`runner`] -- The driver that owns one run from start to termination.
//! - [`shutdown`] -- Stop signal used for supervised shutdown.
//! - [`sink`] -- [`ReportSink`] trait plus in-memory and tracing sinks.
//! - [`table`] -- Ring wiring of sticks and philosophers.
//!
//! [`ReportSink`]: sink::ReportSink

pub mod agent;
pub mod clock;
pub mod config;
pub mod registry;
pub mod reporter;
pub mod resource;
pub mod runner;
pub mod shutdown;
pub mod sink;
pub mod table;
