//! Shared test utilities for database unit tests.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::reservation::{ConfirmationCode, Reservation};
use crate::table::{RestaurantTable, TableNumber};

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Keep the directory alive for the rest of the test process
    std::mem::forget(dir);

    db
}

/// Inserts an EMPTY table and returns its number.
///
/// # Panics
///
/// Panics if the table is invalid or already exists.
pub fn insert_table(conn: &Connection, number: u32, capacity: u32) -> TableNumber {
    let number = TableNumber::try_from(number).unwrap();
    let table = RestaurantTable::new(number, capacity).unwrap();
    Database::insert_table(conn, &table).unwrap();
    number
}

/// Builds an ACTIVE reservation that has not been persisted yet.
///
/// # Panics
///
/// Panics if the code is not a valid confirmation code.
#[must_use]
pub fn reservation_at(code: &str, start: NaiveDateTime, party_size: u32) -> Reservation {
    let code = ConfirmationCode::parse(code).unwrap();
    Reservation::builder(code, start, party_size, "guest")
        .created_at(start)
        .build()
        .unwrap()
}
