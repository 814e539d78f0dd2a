//! Sources of the current wall-clock time.

use chrono::{Duration, NaiveDateTime};
use parking_lot::Mutex;

/// Supplies "now" to time-dependent operations.
pub trait Clock: Send + Sync {
    /// Current restaurant-local time.
    fn now(&self) -> NaiveDateTime;
}

/// The machine's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use bistro::{Clock, FixedClock};
/// use chrono::{Duration, NaiveDate};
///
/// let start = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap().and_hms_opt(19, 0, 0).unwrap();
/// let clock = FixedClock::new(start);
/// clock.advance(Duration::minutes(16));
/// assert_eq!(clock.now(), start + Duration::minutes(16));
/// ```
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<NaiveDateTime>,
}

impl FixedClock {
    /// Creates a clock stopped at `now`.
    #[must_use]
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now;
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}
