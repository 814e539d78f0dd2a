//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including data directory resolution, configuration loading, opening the
//! restaurant service, argument parsing and output formatting.

use crate::error::CliError;
use bistro::config::{Config, ConfigBuilder, DatabaseSettings};
use bistro::{Clock, ConfirmationCode, Restaurant, SystemClock, TableNumber};
use chrono::{NaiveDateTime, Weekday};
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the store busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic store initialization.
    pub disable_autoinit: bool,
}

/// Resolve the data directory: `--data-dir` / `BISTRO_DATA_DIR`, else `~/.bistro`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    if let Some(ref data_dir) = global.data_dir {
        return Ok(data_dir.clone());
    }
    bistro::database::default_data_dir()
        .map_err(|_| CliError::Config("Could not determine home directory".to_string()))
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Global options (highest priority)
/// 2. Environment variables
/// 3. `config.yaml` in the data directory
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;

    let mut overrides = Config::default();
    if let Some(seconds) = global.busy_timeout {
        overrides.database = Some(DatabaseSettings {
            busy_timeout_ms: Some(u64::from(seconds) * 1000),
        });
    }
    if global.disable_autoinit {
        overrides.disable_autoinit = Some(true);
    }

    ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .with_config(overrides)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open the restaurant service in the resolved data directory.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the store doesn't exist and auto-init is disabled.
pub fn open_restaurant(global: &GlobalOptions, config: &Config) -> Result<Restaurant, CliError> {
    let data_dir = resolve_data_dir(global)?;
    Restaurant::open(config, &data_dir).map_err(CliError::from)
}

/// The current local time.
pub fn now() -> NaiveDateTime {
    SystemClock.now()
}

/// Parse a start time such as `2026-05-04 19:30` or `2026-05-04T19:30`.
pub fn parse_date_time(s: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s.trim(), fmt).ok())
        .ok_or_else(|| format!("invalid date and time '{s}' (expected YYYY-MM-DD HH:MM)"))
}

/// Parse a confirmation code.
pub fn parse_code(s: &str) -> Result<ConfirmationCode, String> {
    ConfirmationCode::parse(s).map_err(|e| e.message)
}

/// Parse a table number.
pub fn parse_table_number(s: &str) -> Result<TableNumber, String> {
    let n: u32 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid table number '{s}'"))?;
    TableNumber::try_from(n).map_err(|e| e.message)
}

/// Parse a weekday such as `mon` or `Friday`.
pub fn parse_weekday(s: &str) -> Result<Weekday, String> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| format!("invalid weekday '{s}'"))
}

/// Format a wall-clock time for display.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

/// Convert csv::Error to CliError.
pub fn csv_error(e: csv::Error) -> CliError {
    CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Convert serde_json::Error to CliError.
pub fn json_error(e: serde_json::Error) -> CliError {
    CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_date_time_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 5, 4)
            .unwrap()
            .and_hms_opt(19, 30, 0)
            .unwrap();
        assert_eq!(parse_date_time("2026-05-04 19:30").unwrap(), expected);
        assert_eq!(parse_date_time("2026-05-04T19:30:00").unwrap(), expected);
        assert!(parse_date_time("19:30").is_err());
    }

    #[test]
    fn test_parse_table_number() {
        assert_eq!(parse_table_number("12").unwrap().value(), 12);
        assert!(parse_table_number("0").is_err());
        assert!(parse_table_number("twelve").is_err());
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("fri").unwrap(), Weekday::Fri);
        assert_eq!(parse_weekday("Monday").unwrap(), Weekday::Mon);
        assert!(parse_weekday("someday").is_err());
    }

    #[test]
    fn test_format_timestamp() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 45)
            .unwrap();
        assert_eq!(format_timestamp(ts), "2024-01-15 10:30");
    }
}
