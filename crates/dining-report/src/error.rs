//! Error types for the report crate.

/// Errors raised while setting up text reporting.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The log file could not be created or written.
    #[error("report I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The configured locale has no label table.
    #[error("unknown report locale {locale:?} (expected \"en\" or \"vi\")")]
    UnknownLocale {
        /// The locale string as configured.
        locale: String,
    },
}
