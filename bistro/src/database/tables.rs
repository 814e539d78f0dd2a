//! Physical table persistence.

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{is_unique_violation, Error, Result};
use crate::table::{RestaurantTable, TableNumber, TableStatus};

use super::connection::Database;
use super::schema::TABLE_COLUMNS;

fn row_to_table(row: &rusqlite::Row<'_>) -> rusqlite::Result<RestaurantTable> {
    let number: u32 = row.get(0)?;
    let capacity: u32 = row.get(1)?;
    let location: Option<String> = row.get(2)?;
    let status: String = row.get(3)?;

    let to_sql_err = |column: usize, e: crate::reservation::ValidationError| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Integer,
            Box::new(e),
        )
    };

    let number = TableNumber::try_from(number).map_err(|e| to_sql_err(0, e))?;
    let status = status
        .parse::<TableStatus>()
        .map_err(|e| to_sql_err(3, e))?;

    Ok(RestaurantTable::new(number, capacity)
        .map_err(|e| to_sql_err(1, e))?
        .with_location(location)
        .with_status(status))
}

const INSERT_TABLE: &str = r"
    INSERT INTO restaurant_tables (table_number, capacity, location, status)
    VALUES (?, ?, ?, ?)
";

const SELECT_SMALLEST_EMPTY: &str = r"
    SELECT table_number, capacity, location, status
    FROM restaurant_tables
    WHERE status = 'EMPTY' AND capacity >= ?
    ORDER BY capacity, table_number
    LIMIT 1
";

const UPDATE_STATUS_IF: &str = r"
    UPDATE restaurant_tables
    SET status = ?
    WHERE table_number = ? AND status = ?
";

const UPDATE_STATUS: &str = r"
    UPDATE restaurant_tables
    SET status = ?
    WHERE table_number = ?
";

impl Database {
    /// Adds a physical table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if the table number is taken, or a
    /// database error if the insert fails.
    pub fn insert_table(conn: &Connection, table: &RestaurantTable) -> Result<()> {
        conn.execute(
            INSERT_TABLE,
            params![
                table.number().value(),
                table.capacity(),
                table.location(),
                table.status().as_str(),
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Conflict {
                    reason: format!("table {} already exists", table.number()),
                }
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    /// Looks up a table by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_table(conn: &Connection, number: TableNumber) -> Result<Option<RestaurantTable>> {
        let sql = format!("SELECT {TABLE_COLUMNS} FROM restaurant_tables WHERE table_number = ?");
        Ok(conn
            .query_row(&sql, [number.value()], row_to_table)
            .optional()?)
    }

    /// Lists every table ordered by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tables(conn: &Connection) -> Result<Vec<RestaurantTable>> {
        let sql = format!("SELECT {TABLE_COLUMNS} FROM restaurant_tables ORDER BY table_number");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_table)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// The smallest EMPTY table seating `party_size`, lowest number first on ties.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn smallest_empty_table(
        conn: &Connection,
        party_size: u32,
    ) -> Result<Option<RestaurantTable>> {
        Ok(conn
            .query_row(SELECT_SMALLEST_EMPTY, [party_size], row_to_table)
            .optional()?)
    }

    /// Moves a table from `from` to `to` only if it is currently `from`.
    ///
    /// Returns `true` iff exactly one row changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn transition_table(
        conn: &Connection,
        number: TableNumber,
        from: TableStatus,
        to: TableStatus,
    ) -> Result<bool> {
        let changed = conn.execute(
            UPDATE_STATUS_IF,
            params![to.as_str(), number.value(), from.as_str()],
        )?;
        Ok(changed == 1)
    }

    /// Sets a table's status regardless of its current one.
    ///
    /// Returns `false` if no such table exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_table_status(
        conn: &Connection,
        number: TableNumber,
        status: TableStatus,
    ) -> Result<bool> {
        let changed = conn.execute(UPDATE_STATUS, params![status.as_str(), number.value()])?;
        Ok(changed == 1)
    }
}
