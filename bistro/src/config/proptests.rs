//! Property-based tests for configuration merging and validation.

use super::merger::ConfigMerger;
use super::schema::{BookingSettings, CheckInSettings, Config, PoolSettings};
use super::validator::ConfigValidator;
use proptest::prelude::*;

fn pool_strategy() -> impl Strategy<Value = PoolSettings> {
    (
        prop::option::of(1usize..64),
        prop::option::of(0usize..64),
        prop::option::of(1u64..3600),
        prop::option::of(0u64..600),
        prop::option::of(1u64..60_000),
    )
        .prop_map(|(max_size, max_idle, idle, reap, acquire)| PoolSettings {
            max_size,
            max_idle,
            idle_timeout_secs: idle,
            reap_interval_secs: reap,
            acquire_timeout_ms: acquire,
        })
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(pool_strategy()),
        prop::option::of(0u32..120),
        prop::option::of(1u32..=366),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(pool, grace, horizon, autoinit)| Config {
            pool,
            check_in: grace.map(|g| CheckInSettings {
                grace_period_minutes: Some(g),
                ..Default::default()
            }),
            booking: horizon.map(|h| BookingSettings {
                horizon_days: Some(h),
                ..Default::default()
            }),
            disable_autoinit: autoinit,
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    /// Merging a config into itself changes nothing.
    #[test]
    fn merge_is_idempotent(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &config);
        prop_assert_eq!(merged, config);
    }

    /// Merging into an empty config reproduces the source.
    #[test]
    fn merge_into_default_copies(config in config_strategy()) {
        let mut merged = Config::default();
        ConfigMerger::merge_into(&mut merged, &config);
        prop_assert_eq!(merged, config);
    }

    /// Every value the higher layer sets wins.
    #[test]
    fn higher_layer_wins(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);

        if high.disable_autoinit.is_some() {
            prop_assert_eq!(merged.disable_autoinit, high.disable_autoinit);
        } else {
            prop_assert_eq!(merged.disable_autoinit, low.disable_autoinit);
        }

        let high_size = high.pool.as_ref().and_then(|p| p.max_size);
        let low_size = low.pool.as_ref().and_then(|p| p.max_size);
        let merged_size = merged.pool.as_ref().and_then(|p| p.max_size);
        prop_assert_eq!(merged_size, high_size.or(low_size));
    }

    /// The resolved pool ceiling is never zero for a valid config.
    #[test]
    fn valid_configs_resolve_to_usable_pools(config in config_strategy()) {
        if ConfigValidator::validate(&config).is_ok() {
            let pool = config.pool_config();
            prop_assert!(pool.max_size > 0);
            prop_assert!(pool.validate().is_ok());
        }
    }
}
