//! Common test utilities for integration tests.
//!
//! Fixtures open a real store in a temporary directory with the reaper
//! disabled, so tests control eviction explicitly.

use std::path::Path;

use bistro::config::{Config, PoolSettings};
use bistro::{OpeningHours, Restaurant, RestaurantTable, TableNumber};
use chrono::{NaiveDate, NaiveDateTime, Weekday};

/// Monday 2026-05-04 at `hour:minute`.
#[allow(dead_code)]
pub fn monday(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 5, 4)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// The morning before the test evening, used as "now" when booking.
#[allow(dead_code)]
pub fn booking_time() -> NaiveDateTime {
    monday(9, 0)
}

/// Configuration with a pool of `max_size` and no background reaper.
#[allow(dead_code)]
pub fn test_config(max_size: usize) -> Config {
    Config {
        pool: Some(PoolSettings {
            max_size: Some(max_size),
            max_idle: Some(max_size),
            reap_interval_secs: Some(0),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Opens a restaurant in `dir`, open Mondays 17:00-23:00, with the given
/// `(number, capacity)` tables.
#[allow(dead_code)]
pub fn open_restaurant(dir: &Path, max_size: usize, tables: &[(u32, u32)]) -> Restaurant {
    let restaurant = Restaurant::open(&test_config(max_size), dir).unwrap();
    restaurant
        .set_opening_hours(&OpeningHours::parse(Weekday::Mon, "17:00-23:00").unwrap())
        .unwrap();
    for &(number, capacity) in tables {
        restaurant
            .add_table(&RestaurantTable::new(table(number), capacity).unwrap())
            .unwrap();
    }
    restaurant
}

/// Shorthand for a valid table number.
#[allow(dead_code)]
pub fn table(number: u32) -> TableNumber {
    TableNumber::try_from(number).unwrap()
}
