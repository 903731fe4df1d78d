//! Configuration loading and typed config structures for the simulation.
//!
//! The configuration lives in `dining-config.yaml` next to the binary's
//! working directory. Every field has a default, so an empty (or missing)
//! file yields the classic five-philosopher table running for five seconds
//! with a 5 ms reporting period.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

/// Environment variable overriding [`TableConfig::agents`].
pub const ENV_AGENTS: &str = "DINING_AGENTS";
/// Environment variable overriding [`TimingConfig::duration_secs`].
pub const ENV_DURATION_SECS: &str = "DINING_DURATION_SECS";
/// Environment variable overriding [`TimingConfig::report_period_ms`].
pub const ENV_REPORT_PERIOD_MS: &str = "DINING_REPORT_PERIOD_MS";
/// Environment variable overriding [`ReportConfig::log_file`].
pub const ENV_LOG_FILE: &str = "DINING_LOG_FILE";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    Override {
        /// The environment variable name.
        var: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },

    /// The configuration parsed but describes an impossible table.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Table size and per-philosopher pacing.
    #[serde(default)]
    pub table: TableConfig,

    /// Simulation window and reporting cadence.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Report sink settings, consumed by the presentation layer.
    #[serde(default)]
    pub report: ReportConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `DINING_AGENTS` overrides `table.agents`
    /// - `DINING_DURATION_SECS` overrides `timing.duration_secs`
    /// - `DINING_REPORT_PERIOD_MS` overrides `timing.report_period_ms`
    /// - `DINING_LOG_FILE` overrides `report.log_file`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, and
    /// [`ConfigError::Override`] if an environment override is malformed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides are
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Override`] if a numeric variable does not parse.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply overrides looked up through `lookup` (the environment in
    /// production, a map in tests).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Override`] if a numeric variable does not parse.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(ENV_AGENTS) {
            self.table.agents = parse_override(ENV_AGENTS, val)?;
        }
        if let Some(val) = lookup(ENV_DURATION_SECS) {
            self.timing.duration_secs = parse_override(ENV_DURATION_SECS, val)?;
        }
        if let Some(val) = lookup(ENV_REPORT_PERIOD_MS) {
            self.timing.report_period_ms = parse_override(ENV_REPORT_PERIOD_MS, val)?;
        }
        if let Some(val) = lookup(ENV_LOG_FILE) {
            self.report.log_file = val;
        }
        Ok(())
    }

    /// Reject configurations the simulation cannot run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when there are no philosophers, the
    /// reporting period is zero, or the think range is inverted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table.agents == 0 {
            return Err(ConfigError::Invalid {
                reason: "table.agents must be at least 1".to_owned(),
            });
        }
        if self.timing.report_period_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "timing.report_period_ms must be at least 1".to_owned(),
            });
        }
        if self.table.think_min_ms > self.table.think_max_ms {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "table.think_min_ms ({}) exceeds table.think_max_ms ({})",
                    self.table.think_min_ms, self.table.think_max_ms
                ),
            });
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_err| ConfigError::Override { var, value })
}

/// Table size and philosopher pacing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TableConfig {
    /// Number of philosophers; the table holds the same number of sticks.
    #[serde(default = "default_agents")]
    pub agents: usize,

    /// Lower bound of the random think pause in milliseconds.
    #[serde(default)]
    pub think_min_ms: u64,

    /// Upper bound of the random think pause in milliseconds.
    #[serde(default)]
    pub think_max_ms: u64,

    /// Eating pause in milliseconds.
    #[serde(default)]
    pub eat_ms: u64,
}

impl TableConfig {
    /// Think pause bounds as durations `(min, max)`.
    pub const fn think_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.think_min_ms),
            Duration::from_millis(self.think_max_ms),
        )
    }

    /// Eating pause as a duration.
    pub const fn eat_delay(&self) -> Duration {
        Duration::from_millis(self.eat_ms)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            agents: default_agents(),
            think_min_ms: 0,
            think_max_ms: 0,
            eat_ms: 0,
        }
    }
}

/// Simulation window and reporting cadence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Length of the simulation window in seconds.
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u64,

    /// Milliseconds between status records.
    #[serde(default = "default_report_period_ms")]
    pub report_period_ms: u64,

    /// Milliseconds to wait for philosophers and the reporter to stop once
    /// the window has closed.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl TimingConfig {
    /// The simulation window.
    pub const fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    /// The reporting period.
    pub const fn report_period(&self) -> Duration {
        Duration::from_millis(self.report_period_ms)
    }

    /// The shutdown grace period.
    pub const fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            report_period_ms: default_report_period_ms(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

/// Report sink settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    /// Path of the text log file, truncated at startup. Empty disables it.
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Whether status blocks are printed to stdout.
    #[serde(default = "default_true")]
    pub console: bool,

    /// Label language for rendered records (`en` or `vi`).
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            console: true,
            locale: default_locale(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

const fn default_agents() -> usize {
    5
}

const fn default_duration_secs() -> u64 {
    5
}

const fn default_report_period_ms() -> u64 {
    5
}

const fn default_shutdown_grace_ms() -> u64 {
    1_000
}

fn default_log_file() -> String {
    "philosopher_sim.log".to_owned()
}

fn default_locale() -> String {
    "en".to_owned()
}

const fn default_true() -> bool {
    true
}
