//! Configuration validation.
//!
//! Checks that every set value is usable before it reaches the pool or
//! the reservation rules.

use crate::config::schema::{BookingSettings, CheckInSettings, Config, PoolSettings};
use crate::error::{Error, Result};

/// Longest booking horizon accepted, in days.
pub const MAX_HORIZON_DAYS: u32 = 366;

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use bistro::config::{Config, ConfigValidator};
///
/// let config = Config::default();
/// ConfigValidator::validate(&config).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref pool) = config.pool {
            Self::validate_pool(pool)?;
        }

        if let Some(ref check_in) = config.check_in {
            Self::validate_check_in(check_in)?;
        }

        if let Some(ref booking) = config.booking {
            Self::validate_booking(booking)?;
        }

        if let Some(timeout) = config.database.as_ref().and_then(|d| d.busy_timeout_ms) {
            if timeout == 0 {
                return Err(invalid("database.busy_timeout_ms", "Must be greater than 0"));
            }
        }

        Ok(())
    }

    fn validate_pool(pool: &PoolSettings) -> Result<()> {
        if pool.max_size == Some(0) {
            return Err(invalid("pool.max_size", "Must be greater than 0"));
        }

        if let (Some(max_idle), Some(max_size)) = (pool.max_idle, pool.max_size) {
            if max_idle > max_size {
                return Err(invalid(
                    "pool.max_idle",
                    format!("Cannot exceed pool.max_size ({max_size})"),
                ));
            }
        }

        if pool.idle_timeout_secs == Some(0) {
            return Err(invalid("pool.idle_timeout_secs", "Must be greater than 0"));
        }

        if pool.acquire_timeout_ms == Some(0) {
            return Err(invalid("pool.acquire_timeout_ms", "Must be greater than 0"));
        }

        Ok(())
    }

    fn validate_check_in(check_in: &CheckInSettings) -> Result<()> {
        if check_in.max_claim_attempts == Some(0) {
            return Err(invalid(
                "check_in.max_claim_attempts",
                "Must be greater than 0",
            ));
        }
        Ok(())
    }

    fn validate_booking(booking: &BookingSettings) -> Result<()> {
        match booking.horizon_days {
            Some(0) => return Err(invalid("booking.horizon_days", "Must be greater than 0")),
            Some(days) if days > MAX_HORIZON_DAYS => {
                return Err(invalid(
                    "booking.horizon_days",
                    format!("Cannot exceed {MAX_HORIZON_DAYS}"),
                ));
            }
            _ => {}
        }

        if booking.slot_minutes == Some(0) {
            return Err(invalid("booking.slot_minutes", "Must be greater than 0"));
        }

        if booking.dining_minutes == Some(0) {
            return Err(invalid("booking.dining_minutes", "Must be greater than 0"));
        }

        if booking.max_party_size == Some(0) {
            return Err(invalid("booking.max_party_size", "Must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: impl Into<String>) -> Error {
    Error::Validation {
        field: field.into(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DatabaseSettings;

    fn field_of(result: Result<()>) -> String {
        match result {
            Err(Error::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_default_is_valid() {
        ConfigValidator::validate(&Config::default()).unwrap();
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let config = Config {
            pool: Some(PoolSettings {
                max_size: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(field_of(ConfigValidator::validate(&config)), "pool.max_size");
    }

    #[test]
    fn test_idle_above_size_rejected() {
        let config = Config {
            pool: Some(PoolSettings {
                max_size: Some(2),
                max_idle: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(field_of(ConfigValidator::validate(&config)), "pool.max_idle");
    }

    #[test]
    fn test_zero_reap_interval_is_allowed() {
        let config = Config {
            pool: Some(PoolSettings {
                reap_interval_secs: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        ConfigValidator::validate(&config).unwrap();
    }

    #[test]
    fn test_grace_period_zero_is_allowed() {
        let config = Config {
            check_in: Some(CheckInSettings {
                grace_period_minutes: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        ConfigValidator::validate(&config).unwrap();
    }

    #[test]
    fn test_booking_bounds() {
        let too_far = Config {
            booking: Some(BookingSettings {
                horizon_days: Some(MAX_HORIZON_DAYS + 1),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            field_of(ConfigValidator::validate(&too_far)),
            "booking.horizon_days"
        );

        let no_slots = Config {
            booking: Some(BookingSettings {
                slot_minutes: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            field_of(ConfigValidator::validate(&no_slots)),
            "booking.slot_minutes"
        );
    }

    #[test]
    fn test_zero_busy_timeout_rejected() {
        let config = Config {
            database: Some(DatabaseSettings {
                busy_timeout_ms: Some(0),
            }),
            ..Default::default()
        };
        assert_eq!(
            field_of(ConfigValidator::validate(&config)),
            "database.busy_timeout_ms"
        );
    }
}
