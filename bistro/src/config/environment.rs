//! Environment variable handling for configuration overrides.
//!
//! `BISTRO_*` variables override values from the configuration file.

use std::env;
use std::str::FromStr;

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use bistro::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to a value of the wrong type.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(val) = Self::number("BISTRO_POOL_MAX_SIZE")? {
            config.pool.get_or_insert_with(Default::default).max_size = Some(val);
        }
        if let Some(val) = Self::number("BISTRO_POOL_MAX_IDLE")? {
            config.pool.get_or_insert_with(Default::default).max_idle = Some(val);
        }
        if let Some(val) = Self::number("BISTRO_POOL_IDLE_TIMEOUT_SECS")? {
            config
                .pool
                .get_or_insert_with(Default::default)
                .idle_timeout_secs = Some(val);
        }
        if let Some(val) = Self::number("BISTRO_POOL_REAP_INTERVAL_SECS")? {
            config
                .pool
                .get_or_insert_with(Default::default)
                .reap_interval_secs = Some(val);
        }
        if let Some(val) = Self::number("BISTRO_POOL_ACQUIRE_TIMEOUT_MS")? {
            config
                .pool
                .get_or_insert_with(Default::default)
                .acquire_timeout_ms = Some(val);
        }

        if let Some(val) = Self::number("BISTRO_GRACE_PERIOD_MINUTES")? {
            config
                .check_in
                .get_or_insert_with(Default::default)
                .grace_period_minutes = Some(val);
        }
        if let Some(val) = Self::number("BISTRO_BOOKING_HORIZON_DAYS")? {
            config
                .booking
                .get_or_insert_with(Default::default)
                .horizon_days = Some(val);
        }
        if let Some(val) = Self::number("BISTRO_BUSY_TIMEOUT_MS")? {
            config
                .database
                .get_or_insert_with(Default::default)
                .busy_timeout_ms = Some(val);
        }

        if let Ok(val) = env::var("BISTRO_DISABLE_AUTOINIT") {
            config.disable_autoinit = Some(Self::parse_bool("BISTRO_DISABLE_AUTOINIT", &val)?);
        }

        Ok(())
    }

    /// Reads a numeric variable; unset yields `None`.
    fn number<T: FromStr>(name: &str) -> Result<Option<T>> {
        match env::var(name) {
            Ok(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| Error::Validation {
                    field: name.into(),
                    message: format!("Must be a non-negative integer, got '{raw}'"),
                }),
            Err(_) => Ok(None),
        }
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
