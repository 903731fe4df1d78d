//! Human-readable report sink.
//!
//! [`TextReport`] renders every record with a [`Labels`] table and writes
//! the text to stdout, to a log file, or both. The log file is truncated
//! when the sink is built, so each run starts with a fresh report.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use dining_core::config::ReportConfig;
use dining_core::sink::{ReportSink, SinkError};
use dining_types::{StartRecord, StatusRecord, TerminationRecord};
use tracing::info;

use crate::error::ReportError;
use crate::labels::{Labels, Locale};
use crate::render;

/// Sink that writes rendered text to the console and/or a log file.
pub struct TextReport {
    labels: &'static Labels,
    console: bool,
    log: Option<Mutex<BufWriter<File>>>,
}

impl TextReport {
    /// Console-only report in the given locale. Pass `console = false` for a
    /// sink that discards everything until a log file is attached.
    pub const fn new(locale: Locale, console: bool) -> Self {
        Self {
            labels: locale.labels(),
            console,
            log: None,
        }
    }

    /// Attach a log file, creating it or truncating an existing one.
    pub fn with_log_file(mut self, path: &Path) -> Result<Self, ReportError> {
        let file = File::create(path)?;
        info!(path = %path.display(), "Writing text report");
        self.log = Some(Mutex::new(BufWriter::new(file)));
        Ok(self)
    }

    /// Build the sink described by `config`. An empty `log_file` disables
    /// the file.
    pub fn from_config(config: &ReportConfig) -> Result<Self, ReportError> {
        let locale: Locale = config.locale.parse()?;
        let report = Self::new(locale, config.console);
        if config.log_file.trim().is_empty() {
            return Ok(report);
        }
        report.with_log_file(Path::new(&config.log_file))
    }

    /// Whether a log file is attached.
    pub const fn has_log_file(&self) -> bool {
        self.log.is_some()
    }

    fn emit(&self, text: &str) -> Result<(), SinkError> {
        if self.console {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
        if let Some(log) = &self.log {
            let mut file = lock(log);
            file.write_all(text.as_bytes())?;
            file.flush()?;
        }
        Ok(())
    }
}

fn lock(log: &Mutex<BufWriter<File>>) -> MutexGuard<'_, BufWriter<File>> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ReportSink for TextReport {
    fn on_start(&self, record: &StartRecord) -> Result<(), SinkError> {
        let mut text = render::render_header(self.labels);
        text.push_str(&render::render_start(self.labels, record));
        self.emit(&text)
    }

    fn on_status(&self, record: &StatusRecord) -> Result<(), SinkError> {
        self.emit(&render::render_status(self.labels, record))
    }

    fn on_termination(&self, record: &TerminationRecord) -> Result<(), SinkError> {
        self.emit(&render::render_termination(self.labels, record))
    }
}
