//! Database schema definitions and SQL constants.
//!
//! This module contains the table definitions, indices, and shared SQL
//! statements for the restaurant store.

/// Current schema version for the database.
///
/// Stored in the metadata table and checked each time a session opens.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the physical tables relation.
///
/// `status` moves to OCCUPIED only through a conditional update that
/// requires the row to be EMPTY, so two sessions can never both win it.
pub const CREATE_TABLES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS restaurant_tables (
        table_number INTEGER PRIMARY KEY NOT NULL CHECK (table_number > 0),
        capacity INTEGER NOT NULL CHECK (capacity > 0),
        location TEXT,
        status TEXT NOT NULL DEFAULT 'EMPTY'
            CHECK (status IN ('EMPTY', 'OCCUPIED', 'RESERVED'))
    )";

/// SQL statement to create the reservations table.
///
/// Reservations are never deleted; terminal states stay for history.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        confirmation_code TEXT NOT NULL UNIQUE,
        start_time INTEGER NOT NULL,
        party_size INTEGER NOT NULL CHECK (party_size > 0),
        customer_ref TEXT NOT NULL,
        phone TEXT,
        email TEXT,
        table_number INTEGER REFERENCES restaurant_tables(table_number),
        status TEXT NOT NULL DEFAULT 'ACTIVE'
            CHECK (status IN ('ACTIVE', 'CHECKED_IN', 'CANCELED', 'EXPIRED')),
        checked_in_at INTEGER,
        finished_at INTEGER,
        created_at INTEGER NOT NULL
    )";

/// SQL statement to create the opening hours table.
///
/// Times are minutes after midnight; a missing weekday means closed.
pub const CREATE_OPENING_HOURS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS opening_hours (
        weekday INTEGER PRIMARY KEY NOT NULL CHECK (weekday BETWEEN 0 AND 6),
        opens_at INTEGER NOT NULL CHECK (opens_at BETWEEN 0 AND 1439),
        closes_at INTEGER NOT NULL CHECK (closes_at BETWEEN 1 AND 1439),
        CHECK (opens_at < closes_at)
    )";

/// Index used by the availability window query.
pub const CREATE_START_TIME_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_start_time ON reservations(start_time)";

/// Index used by the overdue sweep and status listings.
pub const CREATE_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_status ON reservations(status, start_time)";

/// Index used by the candidate search.
pub const CREATE_TABLE_STATUS_INDEX: &str = "CREATE INDEX IF NOT EXISTS \
     idx_restaurant_tables_status ON restaurant_tables(status, capacity, table_number)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Column list shared by every reservation query, in `row_to_reservation` order.
pub const RESERVATION_COLUMNS: &str = "id, confirmation_code, start_time, party_size, \
     customer_ref, phone, email, table_number, status, checked_in_at, finished_at, created_at";

/// Column list shared by every table query, in `row_to_table` order.
pub const TABLE_COLUMNS: &str = "table_number, capacity, location, status";
