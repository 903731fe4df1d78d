//! Text reporting for the dining philosophers simulation.
//!
//! The core hands records to a [`ReportSink`]; this crate turns them into
//! the human-readable report (title, start line, framed status blocks, end
//! line) in English or Vietnamese, and lets several sinks share one run.
//!
//! [`ReportSink`]: dining_core::sink::ReportSink

pub mod error;
pub mod fanout;
pub mod labels;
pub mod render;
pub mod text;

pub use error::ReportError;
pub use fanout::FanoutSink;
pub use labels::{Labels, Locale};
pub use text::TextReport;
