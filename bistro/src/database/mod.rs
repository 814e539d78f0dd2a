//! Database layer for the restaurant store.
//!
//! A [`Database`] is one SQLite session against the shared store file. It
//! owns schema setup and versioning; all reads and writes are static
//! functions on [`Database`] that take a borrowed [`rusqlite::Connection`],
//! so they run the same way inside or outside a transaction.
//!
//! # Examples
//!
//! ```no_run
//! use bistro::database::{Database, DatabaseConfig};
//! use bistro::{RestaurantTable, TableNumber};
//!
//! let db = Database::open(DatabaseConfig::new("/tmp/bistro.db")).unwrap();
//! let table = RestaurantTable::new(TableNumber::try_from(1).unwrap(), 4).unwrap();
//! Database::insert_table(db.connection(), &table).unwrap();
//!
//! for table in Database::list_tables(db.connection()).unwrap() {
//!     println!("{} seats {}", table.number(), table.capacity());
//! }
//! ```

mod config;
mod connection;
mod hours;
pub mod migrations;
mod operations;
mod schema;
mod tables;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig,
    DATABASE_FILE_NAME,
};
pub use connection::Database;

pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
