//! Configuration schema definitions.
//!
//! Every field is optional so that partial configurations from different
//! sources can be merged. The resolver methods on [`Config`] turn a
//! merged configuration into the settings the runtime types take.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::availability::AvailabilitySettings;
use crate::pool::{
    PoolConfig, DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_IDLE, DEFAULT_MAX_SIZE,
    DEFAULT_REAP_INTERVAL,
};
use crate::reservation::LifecycleSettings;
use crate::table::DEFAULT_MAX_CLAIM_ATTEMPTS;

/// Default check-in grace period in minutes.
pub const DEFAULT_GRACE_PERIOD_MINUTES: u32 = 15;
/// Default booking horizon in days.
pub const DEFAULT_HORIZON_DAYS: u32 = 60;
/// Default distance between bookable start times in minutes.
pub const DEFAULT_SLOT_MINUTES: u32 = 30;
/// Default length of a sitting in minutes.
pub const DEFAULT_DINING_MINUTES: u32 = 120;
/// Default largest party a single reservation may book.
pub const DEFAULT_MAX_PARTY_SIZE: u32 = 20;
/// Default `SQLite` busy timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use bistro::config::{CheckInSettings, Config};
///
/// let config = Config {
///     check_in: Some(CheckInSettings {
///         grace_period_minutes: Some(10),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
/// assert_eq!(config.lifecycle_settings().grace_period.num_minutes(), 10);
/// assert_eq!(config.pool_config().max_size, 8);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Connection pool settings.
    pub pool: Option<PoolSettings>,

    /// Check-in rules.
    pub check_in: Option<CheckInSettings>,

    /// Booking rules.
    pub booking: Option<BookingSettings>,

    /// Store settings.
    pub database: Option<DatabaseSettings>,

    /// Disable automatic creation of the data directory and store.
    pub disable_autoinit: Option<bool>,

    /// Output format for list commands.
    pub output_format: Option<OutputFormat>,
}

/// Connection pool settings.
///
/// # Examples
///
/// ```
/// use bistro::config::PoolSettings;
///
/// let settings = PoolSettings {
///     max_size: Some(4),
///     reap_interval_secs: Some(0),
///     ..Default::default()
/// };
/// let pool = settings.to_pool_config();
/// assert_eq!(pool.max_size, 4);
/// assert!(pool.reap_interval.is_none());
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PoolSettings {
    /// Most sessions open at once.
    pub max_size: Option<usize>,
    /// Most idle sessions kept for reuse.
    pub max_idle: Option<usize>,
    /// Seconds an idle session may sit unused.
    pub idle_timeout_secs: Option<u64>,
    /// Seconds between reaper passes; 0 disables the reaper.
    pub reap_interval_secs: Option<u64>,
    /// Milliseconds `acquire` waits for a release.
    pub acquire_timeout_ms: Option<u64>,
}

impl PoolSettings {
    /// Resolves these settings, filling gaps with defaults.
    #[must_use]
    pub fn to_pool_config(&self) -> PoolConfig {
        let reap_interval = match self.reap_interval_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_REAP_INTERVAL),
        };
        PoolConfig {
            max_size: self.max_size.unwrap_or(DEFAULT_MAX_SIZE),
            max_idle: self.max_idle.unwrap_or(DEFAULT_MAX_IDLE),
            idle_timeout: self
                .idle_timeout_secs
                .map_or(DEFAULT_IDLE_TIMEOUT, Duration::from_secs),
            reap_interval,
            acquire_timeout: self
                .acquire_timeout_ms
                .map_or(DEFAULT_ACQUIRE_TIMEOUT, Duration::from_millis),
        }
    }
}

/// Check-in rules.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CheckInSettings {
    /// Minutes after the start time that check-in is still accepted.
    pub grace_period_minutes: Option<u32>,
    /// Lost table claims tolerated before a check-in gives up.
    pub max_claim_attempts: Option<u32>,
}

/// Booking rules.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BookingSettings {
    /// How many days ahead bookings are accepted.
    pub horizon_days: Option<u32>,
    /// Minutes between bookable start times.
    pub slot_minutes: Option<u32>,
    /// Minutes a sitting occupies its table.
    pub dining_minutes: Option<u32>,
    /// Largest party a single reservation may book.
    pub max_party_size: Option<u32>,
}

/// Store settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSettings {
    /// Milliseconds a session waits on a locked store.
    pub busy_timeout_ms: Option<u64>,
}

impl Config {
    /// Resolves the pool configuration.
    #[must_use]
    pub fn pool_config(&self) -> PoolConfig {
        self.pool.clone().unwrap_or_default().to_pool_config()
    }

    /// Resolves the reservation lifecycle settings.
    #[must_use]
    pub fn lifecycle_settings(&self) -> LifecycleSettings {
        let check_in = self.check_in.clone().unwrap_or_default();
        let booking = self.booking.clone().unwrap_or_default();
        LifecycleSettings {
            grace_period: chrono::Duration::minutes(i64::from(
                check_in
                    .grace_period_minutes
                    .unwrap_or(DEFAULT_GRACE_PERIOD_MINUTES),
            )),
            max_party_size: booking.max_party_size.unwrap_or(DEFAULT_MAX_PARTY_SIZE),
            max_claim_attempts: check_in
                .max_claim_attempts
                .unwrap_or(DEFAULT_MAX_CLAIM_ATTEMPTS),
        }
    }

    /// Resolves the booking window settings.
    #[must_use]
    pub fn availability_settings(&self) -> AvailabilitySettings {
        let booking = self.booking.clone().unwrap_or_default();
        AvailabilitySettings {
            slot: chrono::Duration::minutes(i64::from(
                booking.slot_minutes.unwrap_or(DEFAULT_SLOT_MINUTES),
            )),
            dining: chrono::Duration::minutes(i64::from(
                booking.dining_minutes.unwrap_or(DEFAULT_DINING_MINUTES),
            )),
            horizon: chrono::Duration::days(i64::from(
                booking.horizon_days.unwrap_or(DEFAULT_HORIZON_DAYS),
            )),
        }
    }

    /// Resolves the store busy timeout.
    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(
            self.database
                .as_ref()
                .and_then(|d| d.busy_timeout_ms)
                .unwrap_or(DEFAULT_BUSY_TIMEOUT_MS),
        )
    }
}

/// Output format for list commands.
///
/// # Examples
///
/// ```
/// use bistro::config::OutputFormat;
///
/// let format = OutputFormat::Json;
/// assert_eq!(format.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
    /// TSV output format.
    Tsv,
    /// Human-readable table format.
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
            Self::Table => write!(f, "table"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve() {
        let config = Config::default();
        assert_eq!(config.pool_config(), PoolConfig::default());
        assert_eq!(config.lifecycle_settings(), LifecycleSettings::default());
        assert_eq!(config.availability_settings(), AvailabilitySettings::default());
        assert_eq!(config.busy_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r"
pool:
  max_size: 4
  max_idle: 2
  idle_timeout_secs: 60
  reap_interval_secs: 10
  acquire_timeout_ms: 250
check_in:
  grace_period_minutes: 20
booking:
  horizon_days: 30
  slot_minutes: 15
  dining_minutes: 90
  max_party_size: 12
database:
  busy_timeout_ms: 8000
output_format: json
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let pool = config.pool_config();
        assert_eq!(pool.max_size, 4);
        assert_eq!(pool.max_idle, 2);
        assert_eq!(pool.idle_timeout, Duration::from_secs(60));
        assert_eq!(pool.reap_interval, Some(Duration::from_secs(10)));
        assert_eq!(pool.acquire_timeout, Duration::from_millis(250));
        assert_eq!(config.lifecycle_settings().grace_period.num_minutes(), 20);
        assert_eq!(config.lifecycle_settings().max_party_size, 12);
        assert_eq!(config.availability_settings().slot.num_minutes(), 15);
        assert_eq!(config.availability_settings().horizon.num_days(), 30);
        assert_eq!(config.busy_timeout(), Duration::from_secs(8));
        assert_eq!(config.output_format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(serde_yaml::from_str::<Config>("ports:\n  min: 5000\n").is_err());
        assert!(serde_yaml::from_str::<Config>("pool:\n  size: 3\n").is_err());
    }

    #[test]
    fn test_zero_reap_interval_disables_reaper() {
        let settings = PoolSettings {
            reap_interval_secs: Some(0),
            ..Default::default()
        };
        assert!(settings.to_pool_config().reap_interval.is_none());
    }
}
