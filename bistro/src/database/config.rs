//! Database configuration and connection parameters.
//!
//! This module provides configuration types for database connections,
//! including path resolution and connection parameters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// File name of the reservation store inside the data directory.
pub const DATABASE_FILE_NAME: &str = "bistro.db";

/// Configuration for database connections.
///
/// Every physical connection the pool opens is created from one of these,
/// so all pooled sessions share the same path, timeout, and access mode.
///
/// # Examples
///
/// ```
/// use bistro::database::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("/tmp/bistro.db")
///     .with_busy_timeout(Duration::from_millis(10000));
/// assert_eq!(config.busy_timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// Busy timeout for database lock contention.
    pub busy_timeout: Duration,
    /// Whether to automatically create the database if it doesn't exist.
    pub auto_create: bool,
    /// Whether to open the database in read-only mode.
    pub read_only: bool,
}

impl DatabaseConfig {
    /// Creates a new database configuration with default settings.
    ///
    /// Default settings:
    /// - `busy_timeout`: 5000ms
    /// - `auto_create`: true
    /// - `read_only`: false
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
            read_only: false,
        }
    }

    /// Sets the busy timeout duration.
    ///
    /// The busy timeout determines how long a connection waits on a locked
    /// database before returning an error. Concurrent check-ins serialize on
    /// this lock, so it should comfortably exceed one check-in transaction.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Configures the database to be opened in read-only mode.
    ///
    /// When read-only is enabled, `auto_create` is automatically disabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use bistro::database::DatabaseConfig;
    ///
    /// let config = DatabaseConfig::new("/tmp/bistro.db").read_only();
    /// assert!(config.read_only);
    /// assert!(!config.auto_create);
    /// ```
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self.auto_create = false;
        self
    }

    /// Disables creating the database file when it does not exist.
    #[must_use]
    pub fn without_auto_create(mut self) -> Self {
        self.auto_create = false;
        self
    }
}

/// Returns the default data directory for bistro (`~/.bistro`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    let home = home::home_dir().ok_or_else(|| Error::Validation {
        field: "home_directory".into(),
        message: "Cannot determine home directory".into(),
    })?;
    Ok(home.join(".bistro"))
}

/// Resolves the data directory using the environment or defaults.
///
/// The resolution order is:
/// 1. `$BISTRO_DATA_DIR` if set
/// 2. `~/.bistro` otherwise
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined and
/// `BISTRO_DATA_DIR` is not set.
pub fn resolve_data_dir() -> Result<PathBuf> {
    match std::env::var_os("BISTRO_DATA_DIR") {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => default_data_dir(),
    }
}

/// Resolves the database path inside the resolved data directory.
///
/// # Errors
///
/// Returns an error if the data directory cannot be resolved.
///
/// # Examples
///
/// ```no_run
/// use bistro::database::resolve_database_path;
///
/// let db_path = resolve_database_path().unwrap();
/// println!("Database path: {}", db_path.display());
/// ```
pub fn resolve_database_path() -> Result<PathBuf> {
    Ok(resolve_data_dir()?.join(DATABASE_FILE_NAME))
}
