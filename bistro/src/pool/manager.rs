//! Opening and checking physical connections.

use crate::database::{Database, DatabaseConfig};
use crate::error::{Error, Result};

/// Creates and checks the sessions a [`ConnectionPool`](super::ConnectionPool) hands out.
pub trait ConnectionManager: Send + Sync + 'static {
    /// The physical session type.
    type Connection: Send + 'static;

    /// Opens a new session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the store cannot be reached.
    fn connect(&self) -> Result<Self::Connection>;

    /// Returns `true` if an idle session can still be used.
    fn is_valid(&self, conn: &mut Self::Connection) -> bool;

    /// Closes a session for good.
    fn disconnect(&self, conn: Self::Connection) {
        drop(conn);
    }
}

/// Opens [`Database`] sessions against one store file.
///
/// # Examples
///
/// ```no_run
/// use bistro::database::DatabaseConfig;
/// use bistro::pool::{ConnectionManager, SqliteConnectionManager};
///
/// let manager = SqliteConnectionManager::new(DatabaseConfig::new("/tmp/bistro.db"));
/// let mut db = manager.connect().unwrap();
/// assert!(manager.is_valid(&mut db));
/// ```
#[derive(Debug, Clone)]
pub struct SqliteConnectionManager {
    config: DatabaseConfig,
}

impl SqliteConnectionManager {
    /// Creates a manager for the store described by `config`.
    #[must_use]
    pub const fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }
}

impl ConnectionManager for SqliteConnectionManager {
    type Connection = Database;

    fn connect(&self) -> Result<Database> {
        Database::open(self.config.clone()).map_err(|e| match e {
            Error::Database(_) | Error::Io(_) => Error::Connection {
                details: format!("{}: {e}", self.config.path.display()),
            },
            other => other,
        })
    }

    fn is_valid(&self, conn: &mut Database) -> bool {
        conn.is_healthy()
    }
}
