//! Physical restaurant tables and their allocation.
//!
//! A table is identified by its number, seats up to `capacity` guests, and
//! carries one of three statuses. The [`TableAllocator`] is the only code
//! that moves a table between statuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::reservation::ValidationError;

pub mod allocator;

#[cfg(test)]
mod proptests;

pub use allocator::{TableAllocator, DEFAULT_MAX_CLAIM_ATTEMPTS};

/// A valid table number (1 or greater).
///
/// # Examples
///
/// ```
/// use bistro::TableNumber;
///
/// let table = TableNumber::try_from(7).unwrap();
/// assert_eq!(table.value(), 7);
/// assert!(TableNumber::try_from(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TableNumber(u32);

impl TableNumber {
    /// Returns the underlying table number.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for TableNumber {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if value == 0 {
            Err(ValidationError {
                field: "table_number".into(),
                message: "table number must be at least 1".into(),
            })
        } else {
            Ok(Self(value))
        }
    }
}

impl From<TableNumber> for u32 {
    fn from(table: TableNumber) -> Self {
        table.0
    }
}

impl fmt::Display for TableNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Occupancy status of a physical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    /// Free and eligible as an allocation candidate.
    Empty,
    /// Claimed by a reservation.
    Occupied,
    /// Held back by staff; never a candidate.
    Reserved,
}

impl TableStatus {
    /// The value stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::Occupied => "OCCUPIED",
            Self::Reserved => "RESERVED",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EMPTY" => Ok(Self::Empty),
            "OCCUPIED" => Ok(Self::Occupied),
            "RESERVED" => Ok(Self::Reserved),
            _ => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown table status: {s}"),
            }),
        }
    }
}

/// A physical table in the dining room.
///
/// # Examples
///
/// ```
/// use bistro::{RestaurantTable, TableNumber, TableStatus};
///
/// let table = RestaurantTable::new(TableNumber::try_from(3).unwrap(), 4)
///     .unwrap()
///     .with_location(Some("window".into()));
/// assert_eq!(table.capacity(), 4);
/// assert_eq!(table.status(), TableStatus::Empty);
/// assert!(table.seats(4));
/// assert!(!table.seats(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantTable {
    number: TableNumber,
    capacity: u32,
    location: Option<String>,
    status: TableStatus,
}

impl RestaurantTable {
    /// Creates an EMPTY table.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero.
    pub fn new(number: TableNumber, capacity: u32) -> Result<Self, ValidationError> {
        if capacity == 0 {
            return Err(ValidationError {
                field: "capacity".into(),
                message: "a table must seat at least one guest".into(),
            });
        }
        Ok(Self {
            number,
            capacity,
            location: None,
            status: TableStatus::Empty,
        })
    }

    /// Sets the free-form location tag, trimming whitespace.
    #[must_use]
    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        self
    }

    /// Sets the status (used when loading rows).
    #[must_use]
    pub const fn with_status(mut self, status: TableStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the table number.
    #[must_use]
    pub const fn number(&self) -> TableNumber {
        self.number
    }

    /// Returns the seating capacity.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the location tag.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TableStatus {
        self.status
    }

    /// Returns `true` if a party of `party_size` fits at this table.
    #[must_use]
    pub const fn seats(&self, party_size: u32) -> bool {
        party_size <= self.capacity
    }
}
