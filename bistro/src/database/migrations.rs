//! Database schema management.
//!
//! This module handles schema initialization and version checking for
//! every session the pool opens.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_METADATA_TABLE, CREATE_OPENING_HOURS_TABLE, CREATE_RESERVATIONS_TABLE,
    CREATE_START_TIME_INDEX, CREATE_STATUS_INDEX, CREATE_TABLES_TABLE,
    CREATE_TABLE_STATUS_INDEX, CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION,
    SELECT_SCHEMA_VERSION,
};

/// Initializes the database schema.
///
/// Every statement is idempotent, so two sessions racing to initialize a
/// fresh file both succeed.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use bistro::database::migrations::initialize_schema;
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(&format!(
        "BEGIN IMMEDIATE;
         {CREATE_METADATA_TABLE};
         {CREATE_TABLES_TABLE};
         {CREATE_RESERVATIONS_TABLE};
         {CREATE_OPENING_HOURS_TABLE};
         {CREATE_START_TIME_INDEX};
         {CREATE_STATUS_INDEX};
         {CREATE_TABLE_STATUS_INDEX};
         COMMIT;"
    ))?;
    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;
    Ok(())
}

/// Gets the current schema version from the database.
///
/// # Errors
///
/// Returns an error if the query fails for reasons other than a missing
/// metadata table or row (both of which mean version 0).
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value.parse::<i32>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(rusqlite::Error::SqliteFailure(_, Some(ref message)))
            if message.contains("no such table") =>
        {
            Ok(0)
        }
        Err(rusqlite::Error::FromSqlConversionFailure(_, _, e)) => {
            Err(Error::DatabaseCorruption {
                details: format!("unreadable schema version: {e}"),
            })
        }
        Err(e) => Err(e.into()),
    }
}

/// Checks schema compatibility and initializes if needed.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] when the stored version
/// differs from [`CURRENT_SCHEMA_VERSION`], or a database error if
/// initialization fails.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        initialize_schema(conn)?;
    } else if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION.unsigned_abs(),
            found: version.unsigned_abs(),
        });
    }

    Ok(())
}
