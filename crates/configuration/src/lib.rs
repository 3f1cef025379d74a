use crate::error::ConfigError;
use std::collections::HashSet;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Config, EventsConfig, FetchConfig, FredConfig, LogLevel, LoggingConfig};

/// The environment variable consulted when `[fred] api_key` is left empty.
pub const API_KEY_ENV: &str = "FRED_API_KEY";

/// Loads the application configuration from a TOML file.
///
/// Values can be overridden with `MACROSCOPE__<SECTION>__<KEY>` environment
/// variables, e.g. `MACROSCOPE__FETCH__FREQUENCY=q`. The result is validated
/// before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("MACROSCOPE").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let mut config = builder.try_deserialize::<Config>()?;

    if config.fred.api_key.trim().is_empty() {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.fred.api_key = key;
        }
    }

    config.validate()?;
    Ok(config)
}

impl Config {
    /// Checks the invariants the rest of the application relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.indicators.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one [[indicators]] entry is required".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for indicator in &self.indicators {
            if indicator.key.trim().is_empty() || indicator.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "indicator entries need both a key and a name, got {:?}",
                    indicator
                )));
            }
            if !names.insert(indicator.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "indicator name '{}' is used more than once",
                    indicator.name
                )));
            }
        }

        if self.fred.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "no FRED API key: set [fred] api_key or the {} environment variable",
                API_KEY_ENV
            )));
        }
        if self.fred.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "[fred] timeout_secs must be positive".to_string(),
            ));
        }
        if self.events.window_months == 0 {
            return Err(ConfigError::ValidationError(
                "[events] window_months must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{AggregationMethod, Frequency};
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const FULL: &str = r#"
        [fred]
        api_key = "abc123"
        timeout_secs = 5

        [fetch]
        frequency = "q"
        aggregation = "avg"
        drop_incomplete_rows = true

        [[indicators]]
        key = "CPIAUCSL"
        name = "CPI"

        [[indicators]]
        key = "CPILFESL"
        name = "Core CPI"

        [events]
        window_months = 12
        anchors = ["1970-01-31", "2008-01-31"]

        [logging]
        level = "debug"
    "#;

    #[test]
    fn loads_every_section() {
        let file = write_config(FULL);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.fred.api_key, "abc123");
        assert_eq!(config.fred.timeout_secs, 5);
        assert_eq!(config.fred.base_url, "https://api.stlouisfed.org");
        assert_eq!(config.fetch.frequency, Frequency::Quarterly);
        assert_eq!(config.fetch.aggregation, AggregationMethod::Average);
        assert!(config.fetch.drop_incomplete_rows);
        assert_eq!(config.indicators.len(), 2);
        assert_eq!(config.indicators[1].name, "Core CPI");
        assert_eq!(config.events.window_months, 12);
        assert_eq!(
            config.events.anchors,
            vec![
                NaiveDate::from_ymd_opt(1970, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2008, 1, 31).unwrap()
            ]
        );
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let file = write_config(
            r#"
            [fred]
            api_key = "k"

            [[indicators]]
            key = "UNRATE"
            name = "Unemployment"
            "#,
        );
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.fetch.frequency, Frequency::Monthly);
        assert_eq!(config.fetch.aggregation, AggregationMethod::EndOfPeriod);
        assert_eq!(config.events.window_months, 18);
        assert!(config.events.anchors.is_empty());
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn rejects_unknown_frequency_code() {
        let file = write_config(
            r#"
            [fred]
            api_key = "k"

            [fetch]
            frequency = "fortnightly"

            [[indicators]]
            key = "UNRATE"
            name = "Unemployment"
            "#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::LoadError(_)));
    }

    #[test]
    fn rejects_duplicate_indicator_names() {
        let file = write_config(
            r#"
            [fred]
            api_key = "k"

            [[indicators]]
            key = "CPIAUCSL"
            name = "CPI"

            [[indicators]]
            key = "CPIAUCNS"
            name = "CPI"
            "#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn rejects_zero_window() {
        let file = write_config(
            r#"
            [fred]
            api_key = "k"

            [[indicators]]
            key = "CPIAUCSL"
            name = "CPI"

            [events]
            window_months = 0
            "#,
        );
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }
}
