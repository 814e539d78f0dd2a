//! Weekly opening hours persistence.

use chrono::{NaiveTime, Weekday};
use rusqlite::{params, Connection, OptionalExtension};

use crate::availability::{minutes_of_day, OpeningHours};
use crate::error::Result;

use super::connection::Database;

const UPSERT_HOURS: &str = r"
    INSERT INTO opening_hours (weekday, opens_at, closes_at)
    VALUES (?1, ?2, ?3)
    ON CONFLICT(weekday) DO UPDATE SET opens_at = ?2, closes_at = ?3
";

fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

fn time_from_minutes(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

fn row_to_hours(row: &rusqlite::Row<'_>) -> rusqlite::Result<OpeningHours> {
    let weekday: u8 = row.get(0)?;
    let opens: u32 = row.get(1)?;
    let closes: u32 = row.get(2)?;

    let out_of_range = |column: usize, value: u32| {
        rusqlite::Error::IntegralValueOutOfRange(column, i64::from(value))
    };
    let weekday = weekday_from_index(weekday).ok_or_else(|| out_of_range(0, u32::from(weekday)))?;
    let opens_at = time_from_minutes(opens).ok_or_else(|| out_of_range(1, opens))?;
    let closes_at = time_from_minutes(closes).ok_or_else(|| out_of_range(2, closes))?;

    OpeningHours::new(weekday, opens_at, closes_at).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Integer,
            Box::new(e),
        )
    })
}

impl Database {
    /// Sets the opening hours for one weekday, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_opening_hours(conn: &Connection, hours: &OpeningHours) -> Result<()> {
        conn.execute(
            UPSERT_HOURS,
            params![
                hours.weekday().num_days_from_monday(),
                minutes_of_day(hours.opens_at()),
                minutes_of_day(hours.closes_at()),
            ],
        )?;
        Ok(())
    }

    /// Marks a weekday as closed. Returns `false` if it already was.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn clear_opening_hours(conn: &Connection, weekday: Weekday) -> Result<bool> {
        let changed = conn.execute(
            "DELETE FROM opening_hours WHERE weekday = ?",
            [weekday.num_days_from_monday()],
        )?;
        Ok(changed == 1)
    }

    /// Returns the opening hours for a weekday, or `None` when closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_opening_hours(conn: &Connection, weekday: Weekday) -> Result<Option<OpeningHours>> {
        Ok(conn
            .query_row(
                "SELECT weekday, opens_at, closes_at FROM opening_hours WHERE weekday = ?",
                [weekday.num_days_from_monday()],
                row_to_hours,
            )
            .optional()?)
    }

    /// Lists the opening hours of every open weekday, Monday first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_opening_hours(conn: &Connection) -> Result<Vec<OpeningHours>> {
        let mut stmt =
            conn.prepare("SELECT weekday, opens_at, closes_at FROM opening_hours ORDER BY weekday")?;
        let rows = stmt.query_map([], row_to_hours)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}
