use chrono::NaiveDate;
use core_types::{AggregationMethod, Frequency, Indicator};
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fred: FredConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    /// The series to download, in the order their columns should appear.
    pub indicators: Vec<Indicator>,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection settings for the FRED observations API.
#[derive(Debug, Clone, Deserialize)]
pub struct FredConfig {
    /// The API key. Left empty in `config.toml`, it is filled from `FRED_API_KEY`.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout for the HTTP client.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// How series are requested from the provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetchConfig {
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub aggregation: AggregationMethod,
    /// Drop rows where any indicator is missing after the join.
    #[serde(default)]
    pub drop_incomplete_rows: bool,
}

/// Parameters for the event study around anchor dates (e.g. recession starts).
#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Number of periods before and after each anchor.
    #[serde(default = "default_window_months")]
    pub window_months: u32,
    #[serde(default)]
    pub anchors: Vec<NaiveDate>,
}

/// Where and how verbosely to log.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    /// When set, logs are also written to a daily rolling file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

// --- Default Implementations ---
// This allows a user to omit whole sections from their toml
// and still have it work with sensible defaults.

fn default_base_url() -> String {
    "https://api.stlouisfed.org".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_window_months() -> u32 {
    18
}

impl Default for FredConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            window_months: default_window_months(),
            anchors: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            directory: None,
        }
    }
}
