//! Configuration merging and precedence handling.
//!
//! Sources are layered from lowest to highest precedence. Nested sections
//! merge field by field, so a higher layer that sets only one pool knob
//! keeps the rest from the layer below.

use crate::config::loader::ConfigSource;
use crate::config::schema::{
    BookingSettings, CheckInSettings, Config, DatabaseSettings, PoolSettings,
};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use bistro::config::{Config, ConfigMerger};
///
/// let low = Config { disable_autoinit: Some(false), ..Default::default() };
/// let high = Config { disable_autoinit: Some(true), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.disable_autoinit, Some(true));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();

        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }

        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// # Merging Rules
    ///
    /// - Simple fields: source overwrites if Some
    /// - Nested sections: field-by-field merge
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if let Some(ref pool) = source.pool {
            Self::merge_pool(target.pool.get_or_insert_with(Default::default), pool);
        }

        if let Some(ref check_in) = source.check_in {
            Self::merge_check_in(
                target.check_in.get_or_insert_with(Default::default),
                check_in,
            );
        }

        if let Some(ref booking) = source.booking {
            Self::merge_booking(target.booking.get_or_insert_with(Default::default), booking);
        }

        if let Some(ref database) = source.database {
            Self::merge_database(
                target.database.get_or_insert_with(Default::default),
                database,
            );
        }
    }

    fn merge_pool(target: &mut PoolSettings, source: &PoolSettings) {
        if source.max_size.is_some() {
            target.max_size = source.max_size;
        }
        if source.max_idle.is_some() {
            target.max_idle = source.max_idle;
        }
        if source.idle_timeout_secs.is_some() {
            target.idle_timeout_secs = source.idle_timeout_secs;
        }
        if source.reap_interval_secs.is_some() {
            target.reap_interval_secs = source.reap_interval_secs;
        }
        if source.acquire_timeout_ms.is_some() {
            target.acquire_timeout_ms = source.acquire_timeout_ms;
        }
    }

    fn merge_check_in(target: &mut CheckInSettings, source: &CheckInSettings) {
        if source.grace_period_minutes.is_some() {
            target.grace_period_minutes = source.grace_period_minutes;
        }
        if source.max_claim_attempts.is_some() {
            target.max_claim_attempts = source.max_claim_attempts;
        }
    }

    fn merge_booking(target: &mut BookingSettings, source: &BookingSettings) {
        if source.horizon_days.is_some() {
            target.horizon_days = source.horizon_days;
        }
        if source.slot_minutes.is_some() {
            target.slot_minutes = source.slot_minutes;
        }
        if source.dining_minutes.is_some() {
            target.dining_minutes = source.dining_minutes;
        }
        if source.max_party_size.is_some() {
            target.max_party_size = source.max_party_size;
        }
    }

    fn merge_database(target: &mut DatabaseSettings, source: &DatabaseSettings) {
        if source.busy_timeout_ms.is_some() {
            target.busy_timeout_ms = source.busy_timeout_ms;
        }
    }
}
