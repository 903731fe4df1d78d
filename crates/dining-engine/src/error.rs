//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure `main` can hit before or during the
//! run, so startup can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: dining_core::config::ConfigError,
    },

    /// Setting up the text report failed.
    #[error("report error: {source}")]
    Report {
        /// The underlying report error.
        #[from]
        source: dining_report::ReportError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: dining_core::runner::RunnerError,
    },
}
