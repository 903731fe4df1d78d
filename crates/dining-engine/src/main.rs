//! Engine binary for the dining philosophers simulation.
//!
//! Seats the philosophers, runs them for the configured window (or until
//! Ctrl-C), and writes the text report to the console and the log file.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `dining-config.yaml`
//! 3. Build the report sinks
//! 4. Run the simulation
//! 5. Log the result

mod error;

use std::path::Path;
use std::sync::Arc;

use dining_core::config::SimulationConfig;
use dining_core::runner;
use dining_core::sink::{ReportSink, TracingSink};
use dining_report::{FanoutSink, TextReport};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

const CONFIG_PATH: &str = "dining-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the report cannot be
/// set up.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("dining-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        agents = config.table.agents,
        duration_secs = config.timing.duration_secs,
        report_period_ms = config.timing.report_period_ms,
        log_file = %config.report.log_file,
        "Configuration loaded"
    );

    // 3. Build the report sinks.
    let sink = build_sink(&config)?;

    // 4. Run until the window closes or Ctrl-C.
    let result = runner::run_simulation(&config, sink, interrupt())
        .await
        .map_err(EngineError::from)?;

    // 5. Log the result.
    runner::log_simulation_end(&result);
    info!("dining-engine shut down cleanly");

    Ok(())
}

/// Load configuration from `dining-config.yaml`, falling back to defaults
/// when the file is missing. Environment overrides apply either way.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(SimulationConfig::from_file(config_path)?)
    } else {
        info!("Config file not found, using defaults");
        let mut config = SimulationConfig::default();
        config.apply_env_overrides()?;
        Ok(config)
    }
}

/// Text report plus structured tracing events for every record.
fn build_sink(config: &SimulationConfig) -> Result<Arc<dyn ReportSink>, EngineError> {
    let text = TextReport::from_config(&config.report)?;
    if !text.has_log_file() {
        info!("Log file disabled, reporting to console only");
    }

    let mut fanout = FanoutSink::default();
    fanout.push(Arc::new(text));
    fanout.push(Arc::new(TracingSink));
    debug!(sinks = fanout.len(), "Report sinks ready");
    Ok(Arc::new(fanout))
}

/// Resolves on Ctrl-C. If the handler cannot be installed the run simply
/// goes the full window.
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C, running full window");
        std::future::pending::<()>().await;
    }
    info!("Interrupt received");
}
