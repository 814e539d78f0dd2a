//! Error types for the bistro library.
//!
//! This module provides the error hierarchy shared by the connection pool,
//! the table allocator and the reservation lifecycle, using `thiserror` for
//! ergonomic error handling. Every error maps onto a stable [`Outcome`] code
//! so callers can report failures without inspecting message text.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for operations that may fail with a bistro error.
///
/// # Examples
///
/// ```
/// use bistro::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(4)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the bistro library.
#[derive(Debug, Error)]
pub enum Error {
    /// A database error occurred while running a statement.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A physical connection to the store could not be established.
    #[error("connection error: {details}")]
    Connection {
        /// Details about the connection failure.
        details: String,
    },

    /// Every pooled connection stayed on loan past the acquire timeout.
    #[error("connection pool exhausted: all {max_size} connections busy after {waited_ms}ms")]
    PoolExhausted {
        /// The pool ceiling.
        max_size: usize,
        /// How long the caller waited before giving up.
        waited_ms: u64,
    },

    /// The pool has been shut down.
    #[error("connection pool is shut down")]
    PoolClosed,

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// The reservation was already canceled.
    #[error("reservation {code} is already canceled")]
    AlreadyCanceled {
        /// Confirmation code of the reservation.
        code: String,
    },

    /// Check-in was attempted before the reservation start time.
    #[error("reservation {code} starts at {start}; check-in is not open yet")]
    TooEarly {
        /// Confirmation code of the reservation.
        code: String,
        /// Start time of the reservation.
        start: NaiveDateTime,
    },

    /// Check-in was attempted after the grace period; the reservation expired.
    #[error("reservation {code} expired")]
    Expired {
        /// Confirmation code of the reservation.
        code: String,
    },

    /// No capacity or no table was available.
    #[error("conflict: {reason}")]
    Conflict {
        /// Why the request could not be satisfied.
        reason: String,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },
}

/// Stable, machine-parseable outcome code for a failed operation.
///
/// # Examples
///
/// ```
/// use bistro::{Error, Outcome};
///
/// let err = Error::Expired { code: "K7QW2M4X".into() };
/// assert_eq!(err.outcome(), Outcome::Expired);
/// assert_eq!(err.outcome().as_str(), "EXPIRED");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// The store was unreachable or failed mid-operation.
    ConnectionError,
    /// No pooled connection became available in time.
    PoolExhausted,
    /// The request was malformed or out of range.
    ValidationError,
    /// The reservation or table does not exist in the required state.
    NotFound,
    /// The reservation was canceled earlier.
    AlreadyCanceled,
    /// Check-in before start time.
    TooEarly,
    /// Check-in after the grace period.
    Expired,
    /// No capacity or no free table.
    Conflict,
    /// Anything else, such as local I/O or configuration trouble.
    Internal,
}

impl Outcome {
    /// Returns the wire code for this outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConnectionError => "CONNECTION_ERROR",
            Self::PoolExhausted => "POOL_EXHAUSTED",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyCanceled => "ALREADY_CANCELED",
            Self::TooEarly => "TOO_EARLY",
            Self::Expired => "EXPIRED",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Maps this error onto its stable outcome code.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        match self {
            Self::Database(_)
            | Self::Connection { .. }
            | Self::PoolClosed
            | Self::DatabaseCorruption { .. }
            | Self::UnsupportedSchemaVersion { .. } => Outcome::ConnectionError,
            Self::PoolExhausted { .. } => Outcome::PoolExhausted,
            Self::Validation { .. } => Outcome::ValidationError,
            Self::NotFound { .. } => Outcome::NotFound,
            Self::AlreadyCanceled { .. } => Outcome::AlreadyCanceled,
            Self::TooEarly { .. } => Outcome::TooEarly,
            Self::Expired { .. } => Outcome::Expired,
            Self::Conflict { .. } => Outcome::Conflict,
            Self::Configuration(_)
            | Self::Io(_)
            | Self::InvalidPath { .. }
            | Self::DataDirectoryNotFound { .. } => Outcome::Internal,
        }
    }

    /// Returns `true` if retrying the same request later may succeed.
    ///
    /// # Examples
    ///
    /// ```
    /// use bistro::Error;
    ///
    /// let err = Error::PoolExhausted { max_size: 4, waited_ms: 100 };
    /// assert!(err.is_retryable());
    /// assert!(!Error::PoolClosed.is_retryable());
    /// ```
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::PoolExhausted { .. })
    }

    /// Returns `true` if the error means the pooled session itself is broken
    /// and should not be handed out again.
    #[must_use]
    pub fn is_connection_failure(&self) -> bool {
        match self {
            Self::Connection { .. } => true,
            Self::Database(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::CannotOpen
                    | rusqlite::ErrorCode::NotADatabase
                    | rusqlite::ErrorCode::DatabaseCorrupt
                    | rusqlite::ErrorCode::SystemIoFailure
            ),
            _ => false,
        }
    }

    /// Returns `true` if the store or the pool was too busy to serve the
    /// request in time.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        match self {
            Self::PoolExhausted { .. } => true,
            Self::Database(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }

    /// Check if error indicates a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Returns `true` when a rusqlite error is a UNIQUE or PRIMARY KEY violation.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}
