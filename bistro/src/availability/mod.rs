//! Booking windows and seating capacity.
//!
//! The reservation lifecycle delegates two questions to an
//! [`AvailabilityChecker`]: is this start time bookable at all, and is there
//! still room for one more party at it. [`OpeningHoursAvailability`] answers
//! both from the weekly opening hours and the tables in the store.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::ValidationError;
use crate::table::TableStatus;

/// Decides whether a reservation may be created for a given start time.
#[cfg_attr(test, mockall::automock)]
pub trait AvailabilityChecker: Send + Sync {
    /// Checks that `start` is a bookable time as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the time is outside the business
    /// window, or a database error.
    fn check_window(&self, conn: &Connection, start: NaiveDateTime, now: NaiveDateTime)
        -> Result<()>;

    /// Returns `true` if a party of `party_size` still fits at `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn has_capacity(&self, conn: &Connection, start: NaiveDateTime, party_size: u32)
        -> Result<bool>;
}

/// Opening hours for one weekday, at minute precision.
///
/// # Examples
///
/// ```
/// use bistro::OpeningHours;
/// use chrono::Weekday;
///
/// let hours = OpeningHours::parse(Weekday::Fri, "17:30-23:00").unwrap();
/// assert_eq!(hours.to_string(), "Fri 17:30-23:00");
/// assert!(OpeningHours::parse(Weekday::Fri, "23:00-17:30").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningHours {
    weekday: Weekday,
    opens_at: NaiveTime,
    closes_at: NaiveTime,
}

impl OpeningHours {
    /// Creates opening hours, truncating both times to whole minutes.
    ///
    /// # Errors
    ///
    /// Returns an error unless `opens_at` is before `closes_at`.
    pub fn new(
        weekday: Weekday,
        opens_at: NaiveTime,
        closes_at: NaiveTime,
    ) -> std::result::Result<Self, ValidationError> {
        let opens_at = truncate_to_minute(opens_at);
        let closes_at = truncate_to_minute(closes_at);
        if opens_at >= closes_at {
            return Err(ValidationError {
                field: "opening_hours".into(),
                message: format!(
                    "opening time {} must be before closing time {}",
                    opens_at.format("%H:%M"),
                    closes_at.format("%H:%M")
                ),
            });
        }
        Ok(Self {
            weekday,
            opens_at,
            closes_at,
        })
    }

    /// Parses an `HH:MM-HH:MM` range.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is malformed or the range is empty.
    pub fn parse(weekday: Weekday, range: &str) -> std::result::Result<Self, ValidationError> {
        let malformed = || ValidationError {
            field: "opening_hours".into(),
            message: format!("expected HH:MM-HH:MM, got '{range}'"),
        };
        let (opens, closes) = range.trim().split_once('-').ok_or_else(malformed)?;
        let opens = NaiveTime::parse_from_str(opens.trim(), "%H:%M").map_err(|_| malformed())?;
        let closes = NaiveTime::parse_from_str(closes.trim(), "%H:%M").map_err(|_| malformed())?;
        Self::new(weekday, opens, closes)
    }

    /// Returns the weekday.
    #[must_use]
    pub const fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Returns the opening time.
    #[must_use]
    pub const fn opens_at(&self) -> NaiveTime {
        self.opens_at
    }

    /// Returns the closing time.
    #[must_use]
    pub const fn closes_at(&self) -> NaiveTime {
        self.closes_at
    }

    /// Returns `true` if a sitting from `start` lasting `dining` ends by closing time.
    #[must_use]
    pub fn admits(&self, start: NaiveTime, dining: Duration) -> bool {
        start >= self.opens_at
            && minutes_of_day(start) + dining.num_minutes() <= minutes_of_day(self.closes_at)
    }
}

impl fmt::Display for OpeningHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.weekday,
            self.opens_at.format("%H:%M"),
            self.closes_at.format("%H:%M")
        )
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

pub(crate) fn minutes_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

/// Booking rules used by [`OpeningHoursAvailability`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilitySettings {
    /// Distance between bookable start times.
    pub slot: Duration,
    /// How long a sitting occupies its table.
    pub dining: Duration,
    /// How far ahead bookings are accepted.
    pub horizon: Duration,
}

impl Default for AvailabilitySettings {
    fn default() -> Self {
        Self {
            slot: Duration::minutes(30),
            dining: Duration::minutes(120),
            horizon: Duration::days(60),
        }
    }
}

/// Availability derived from weekly opening hours and the table plan.
///
/// A start time is bookable when it is in the future, within the booking
/// horizon, on a slot boundary, and leaves a full sitting before closing.
/// Capacity is checked by seating every live reservation that overlaps the
/// requested sitting, plus the new party, largest party first at the
/// smallest table that fits. Tables held back by staff are not counted.
#[derive(Debug, Clone, Default)]
pub struct OpeningHoursAvailability {
    settings: AvailabilitySettings,
}

impl OpeningHoursAvailability {
    /// Creates a checker with the given rules.
    #[must_use]
    pub const fn new(settings: AvailabilitySettings) -> Self {
        Self { settings }
    }

    /// Returns the booking rules.
    #[must_use]
    pub const fn settings(&self) -> &AvailabilitySettings {
        &self.settings
    }

    /// Lists the start times on `date` that a party of `party_size` can book.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero party size, or a database error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bistro::database::{Database, DatabaseConfig};
    /// use bistro::OpeningHoursAvailability;
    /// use chrono::NaiveDate;
    ///
    /// let db = Database::open(DatabaseConfig::new("/tmp/bistro.db")).unwrap();
    /// let availability = OpeningHoursAvailability::default();
    /// let date = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
    /// let now = date.and_hms_opt(9, 0, 0).unwrap();
    /// for slot in availability.available_slots(db.connection(), date, 4, now).unwrap() {
    ///     println!("{}", slot.format("%H:%M"));
    /// }
    /// ```
    pub fn available_slots(
        &self,
        conn: &Connection,
        date: NaiveDate,
        party_size: u32,
        now: NaiveDateTime,
    ) -> Result<Vec<NaiveTime>> {
        if party_size == 0 {
            return Err(Error::Validation {
                field: "party_size".into(),
                message: "party size must be at least 1".into(),
            });
        }
        let Some(hours) = Database::get_opening_hours(conn, date.weekday())? else {
            return Ok(Vec::new());
        };

        let slot = self.settings.slot.num_minutes().max(1);
        let opens = minutes_of_day(hours.opens_at());
        let first = (opens + slot - 1) / slot * slot;

        let mut slots = Vec::new();
        let mut minute = first;
        while minute + self.settings.dining.num_minutes() <= minutes_of_day(hours.closes_at()) {
            let Some(time) = u32::try_from(minute * 60)
                .ok()
                .and_then(|secs| NaiveTime::from_num_seconds_from_midnight_opt(secs, 0))
            else {
                break;
            };
            let start = date.and_time(time);
            if self.window_error(&hours, start, now).is_none()
                && self.has_capacity(conn, start, party_size)?
            {
                slots.push(start.time());
            }
            minute += slot;
        }
        Ok(slots)
    }

    fn window_error(
        &self,
        hours: &OpeningHours,
        start: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Option<String> {
        if start < now {
            return Some("start time is in the past".into());
        }
        if start > now + self.settings.horizon {
            return Some(format!(
                "start time is more than {} days ahead",
                self.settings.horizon.num_days()
            ));
        }
        let slot = self.settings.slot.num_minutes().max(1);
        if start.second() != 0 || start.nanosecond() != 0 || minutes_of_day(start.time()) % slot != 0
        {
            return Some(format!("start time is not on a {slot}-minute slot"));
        }
        if !hours.admits(start.time(), self.settings.dining) {
            return Some(format!("a sitting at {} does not fit in {hours}", start.format("%H:%M")));
        }
        None
    }
}

impl AvailabilityChecker for OpeningHoursAvailability {
    fn check_window(
        &self,
        conn: &Connection,
        start: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<()> {
        let Some(hours) = Database::get_opening_hours(conn, start.weekday())? else {
            return Err(Error::Validation {
                field: "start_time".into(),
                message: format!("the restaurant is closed on {}", start.weekday()),
            });
        };
        match self.window_error(&hours, start, now) {
            Some(message) => Err(Error::Validation {
                field: "start_time".into(),
                message,
            }),
            None => Ok(()),
        }
    }

    fn has_capacity(
        &self,
        conn: &Connection,
        start: NaiveDateTime,
        party_size: u32,
    ) -> Result<bool> {
        let capacities: Vec<u32> = Database::list_tables(conn)?
            .into_iter()
            .filter(|t| t.status() != TableStatus::Reserved)
            .map(|t| t.capacity())
            .collect();

        let dining = self.settings.dining;
        let mut parties: Vec<u32> =
            Database::find_live_reservations_between(conn, start - dining, start + dining)?
                .iter()
                .map(crate::Reservation::party_size)
                .collect();
        parties.push(party_size);

        Ok(seating_fits(capacities, parties))
    }
}

/// Returns `true` if every party can be given its own table.
///
/// Parties are seated largest first, each at the smallest free table that
/// fits it. For this one-party-per-table problem that order never fails
/// when some assignment exists.
#[must_use]
pub fn seating_fits(mut capacities: Vec<u32>, mut parties: Vec<u32>) -> bool {
    capacities.sort_unstable();
    parties.sort_unstable_by(|a, b| b.cmp(a));
    for party in parties {
        match capacities.iter().position(|&c| c >= party) {
            Some(index) => {
                capacities.remove(index);
            }
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod proptests;
