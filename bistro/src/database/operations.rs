//! Reservation persistence.
//!
//! Every status change here is a single conditional UPDATE that names the
//! state it expects to leave. The returned `bool` says whether this call
//! performed the transition; a `false` means another session got there
//! first and the caller must not assume the new state is its own doing.

use chrono::{DateTime, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::Result;
use crate::reservation::{ConfirmationCode, Reservation, ReservationFilter, ReservationStatus};
use crate::table::TableNumber;

use super::connection::Database;
use super::schema::RESERVATION_COLUMNS;

/// Converts a wall-clock time to integer seconds for storage.
///
/// Restaurant-local times are stored as if they were UTC so that ordering
/// and arithmetic in SQL match the wall clock.
pub(crate) fn datetime_to_secs(time: NaiveDateTime) -> i64 {
    time.and_utc().timestamp()
}

/// Converts stored seconds back to a wall-clock time.
pub(crate) fn secs_to_datetime(secs: i64) -> rusqlite::Result<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.naive_utc())
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(0, secs))
}

fn optional_secs_to_datetime(secs: Option<i64>) -> rusqlite::Result<Option<NaiveDateTime>> {
    secs.map(secs_to_datetime).transpose()
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

/// Helper function to deserialize a reservation from a database row.
///
/// Expects row fields in [`RESERVATION_COLUMNS`] order.
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: i64 = row.get(0)?;
    let code: String = row.get(1)?;
    let start_secs: i64 = row.get(2)?;
    let party_size: u32 = row.get(3)?;
    let customer_ref: String = row.get(4)?;
    let phone: Option<String> = row.get(5)?;
    let email: Option<String> = row.get(6)?;
    let table_number: Option<u32> = row.get(7)?;
    let status: String = row.get(8)?;
    let checked_in_secs: Option<i64> = row.get(9)?;
    let finished_secs: Option<i64> = row.get(10)?;
    let created_secs: i64 = row.get(11)?;

    let code = ConfirmationCode::parse(&code).map_err(|e| conversion_error(1, e))?;
    let table_number = table_number
        .map(TableNumber::try_from)
        .transpose()
        .map_err(|e| conversion_error(7, e))?;
    let status = status
        .parse::<ReservationStatus>()
        .map_err(|e| conversion_error(8, e))?;

    Reservation::builder(code, secs_to_datetime(start_secs)?, party_size, customer_ref)
        .id(id)
        .phone(phone)
        .email(email)
        .table_number(table_number)
        .status(status)
        .checked_in_at(optional_secs_to_datetime(checked_in_secs)?)
        .finished_at(optional_secs_to_datetime(finished_secs)?)
        .created_at(secs_to_datetime(created_secs)?)
        .build()
        .map_err(|e| conversion_error(0, e))
}

const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (confirmation_code, start_time, party_size, customer_ref, phone, email,
     table_number, status, checked_in_at, finished_at, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const MARK_CHECKED_IN: &str = r"
    UPDATE reservations
    SET status = 'CHECKED_IN', table_number = ?, checked_in_at = ?
    WHERE id = ? AND status = 'ACTIVE'
";

const ASSIGN_TABLE: &str = r"
    UPDATE reservations
    SET table_number = ?
    WHERE id = ? AND status = 'ACTIVE' AND table_number IS NULL
";

const MARK_CANCELED: &str = r"
    UPDATE reservations
    SET status = 'CANCELED'
    WHERE id = ? AND status = 'ACTIVE'
";

const MARK_EXPIRED: &str = r"
    UPDATE reservations
    SET status = 'EXPIRED'
    WHERE id = ? AND status = 'ACTIVE'
";

const MARK_FINISHED: &str = r"
    UPDATE reservations
    SET finished_at = ?
    WHERE id = ? AND status = 'CHECKED_IN' AND finished_at IS NULL
";

const SELECT_TABLE_HOLDER: &str = r"
    SELECT confirmation_code FROM reservations
    WHERE table_number = ?1
      AND (?2 IS NULL OR id != ?2)
      AND (status = 'ACTIVE' OR (status = 'CHECKED_IN' AND finished_at IS NULL))
    ORDER BY id
    LIMIT 1
";

impl Database {
    /// Inserts a new reservation and returns its row id.
    ///
    /// The reservation's own `id` is ignored. A duplicate confirmation code
    /// surfaces as a UNIQUE constraint violation.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_reservation(conn: &Connection, reservation: &Reservation) -> Result<i64> {
        conn.execute(
            INSERT_RESERVATION,
            params![
                reservation.code().as_str(),
                datetime_to_secs(reservation.start_time()),
                reservation.party_size(),
                reservation.customer_ref(),
                reservation.phone(),
                reservation.email(),
                reservation.table_number().map(TableNumber::value),
                reservation.status().as_str(),
                reservation.checked_in_at().map(datetime_to_secs),
                reservation.finished_at().map(datetime_to_secs),
                datetime_to_secs(reservation.created_at()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Looks up a reservation by confirmation code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn get_reservation_by_code(
        conn: &Connection,
        code: &ConfirmationCode,
    ) -> Result<Option<Reservation>> {
        let sql =
            format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE confirmation_code = ?");
        Ok(conn
            .query_row(&sql, [code.as_str()], row_to_reservation)
            .optional()?)
    }

    /// Lists reservations matching `filter`, ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn list_reservations(
        conn: &Connection,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>> {
        let (from, until) = match filter.date {
            Some(date) => {
                let start = date.and_time(chrono::NaiveTime::MIN);
                (
                    Some(datetime_to_secs(start)),
                    Some(datetime_to_secs(start + chrono::Duration::days(1))),
                )
            }
            None => (None, None),
        };
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations
             WHERE (?1 IS NULL OR status = ?1)
               AND (?2 IS NULL OR start_time >= ?2)
               AND (?3 IS NULL OR start_time < ?3)
             ORDER BY start_time, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![filter.status.map(ReservationStatus::as_str), from, until],
            row_to_reservation,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Finds ACTIVE reservations whose start time lies before `cutoff`.
    ///
    /// With `cutoff = now - grace` these are exactly the reservations whose
    /// check-in window has closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn find_overdue_reservations(
        conn: &Connection,
        cutoff: NaiveDateTime,
    ) -> Result<Vec<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations
             WHERE status = 'ACTIVE' AND start_time < ?
             ORDER BY start_time, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([datetime_to_secs(cutoff)], row_to_reservation)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Finds live reservations starting strictly between `after` and `before`.
    ///
    /// Live means ACTIVE, or CHECKED_IN and not yet finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn find_live_reservations_between(
        conn: &Connection,
        after: NaiveDateTime,
        before: NaiveDateTime,
    ) -> Result<Vec<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations
             WHERE (status = 'ACTIVE' OR (status = 'CHECKED_IN' AND finished_at IS NULL))
               AND start_time > ? AND start_time < ?
             ORDER BY start_time, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            [datetime_to_secs(after), datetime_to_secs(before)],
            row_to_reservation,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// ACTIVE to CHECKED_IN, recording the table and the check-in time.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_checked_in(
        conn: &Connection,
        id: i64,
        table: TableNumber,
        at: NaiveDateTime,
    ) -> Result<bool> {
        let changed = conn.execute(
            MARK_CHECKED_IN,
            params![table.value(), datetime_to_secs(at), id],
        )?;
        Ok(changed == 1)
    }

    /// Records a table for an ACTIVE reservation that holds none yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn assign_table(conn: &Connection, id: i64, table: TableNumber) -> Result<bool> {
        let changed = conn.execute(ASSIGN_TABLE, params![table.value(), id])?;
        Ok(changed == 1)
    }

    /// ACTIVE to CANCELED.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_canceled(conn: &Connection, id: i64) -> Result<bool> {
        Ok(conn.execute(MARK_CANCELED, [id])? == 1)
    }

    /// ACTIVE to EXPIRED.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_expired(conn: &Connection, id: i64) -> Result<bool> {
        Ok(conn.execute(MARK_EXPIRED, [id])? == 1)
    }

    /// Code of the live reservation linked to `table`, if any.
    ///
    /// Live means ACTIVE with the table set aside, or seated and not finished.
    /// The reservation with row id `excluding` is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn table_holder(
        conn: &Connection,
        table: TableNumber,
        excluding: Option<i64>,
    ) -> Result<Option<String>> {
        Ok(conn
            .query_row(SELECT_TABLE_HOLDER, params![table.value(), excluding], |row| {
                row.get(0)
            })
            .optional()?)
    }

    /// Stamps `finished_at` on a CHECKED_IN reservation that has not finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_finished(conn: &Connection, id: i64, at: NaiveDateTime) -> Result<bool> {
        Ok(conn.execute(MARK_FINISHED, params![datetime_to_secs(at), id])? == 1)
    }
}
