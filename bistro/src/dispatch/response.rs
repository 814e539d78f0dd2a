//! Typed replies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Outcome};
use crate::reservation::ConfirmationCode;
use crate::table::TableNumber;

/// One reply per request, tagged by `status`.
///
/// # Examples
///
/// ```
/// use bistro::dispatch::Response;
/// use bistro::TableNumber;
///
/// let reply = Response::CheckedIn { table_number: TableNumber::try_from(7).unwrap() };
/// assert_eq!(reply.reply_line(), "OK CHECKED_IN 7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response {
    /// Bookable start times as `HH:MM`.
    Slots {
        /// Start times, earliest first.
        slots: Vec<String>,
    },
    /// A reservation was booked.
    Created {
        /// Its confirmation code.
        code: ConfirmationCode,
    },
    /// A reservation was canceled.
    Canceled {
        /// Its confirmation code.
        code: ConfirmationCode,
    },
    /// A party was seated.
    CheckedIn {
        /// The table they were given.
        table_number: TableNumber,
    },
    /// The overdue sweep ran.
    Expired {
        /// Codes expired by this sweep.
        codes: Vec<ConfirmationCode>,
    },
    /// The request failed.
    Failure {
        /// Stable outcome code.
        outcome: Outcome,
        /// Human-readable detail.
        message: String,
    },
}

impl Response {
    /// Builds the failure reply for `err`.
    #[must_use]
    pub fn failure(err: &Error) -> Self {
        Self::Failure {
            outcome: err.outcome(),
            message: err.to_string(),
        }
    }

    /// Returns `true` unless this is a [`Response::Failure`].
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        !matches!(self, Self::Failure { .. })
    }

    /// The outcome code of a failure.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Failure { outcome, .. } => Some(*outcome),
            _ => None,
        }
    }

    /// Renders the reply as one deterministic line.
    ///
    /// Successes start with `OK <KIND>`, failures with `ERR <OUTCOME>`.
    #[must_use]
    pub fn reply_line(&self) -> String {
        self.to_string()
    }
}

fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for item in items {
        write!(f, " {item}")?;
    }
    Ok(())
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slots { slots } => {
                write!(f, "OK SLOTS")?;
                join(f, slots)
            }
            Self::Created { code } => write!(f, "OK CREATED {code}"),
            Self::Canceled { code } => write!(f, "OK CANCELED {code}"),
            Self::CheckedIn { table_number } => write!(f, "OK CHECKED_IN {table_number}"),
            Self::Expired { codes } => {
                write!(f, "OK EXPIRED {}", codes.len())?;
                join(f, codes)
            }
            Self::Failure { outcome, message } => write!(f, "ERR {outcome} {message}"),
        }
    }
}
