//! Table claims against the shared store.
//!
//! Every status change is a single conditional UPDATE, so concurrent
//! sessions racing for the same table are serialized by the store itself.
//! A lost race is an ordinary outcome: the loser moves on to the next
//! candidate.

use rusqlite::Connection;

use crate::database::Database;
use crate::error::{Error, Result};

use super::{RestaurantTable, TableNumber, TableStatus};

/// Default bound on candidate/claim rounds in [`TableAllocator::allocate`].
pub const DEFAULT_MAX_CLAIM_ATTEMPTS: u32 = 8;

/// Stateless table allocator.
///
/// All state lives in the store; the allocator only carries the retry bound.
///
/// # Examples
///
/// ```no_run
/// use bistro::database::{Database, DatabaseConfig};
/// use bistro::TableAllocator;
///
/// let db = Database::open(DatabaseConfig::new("/tmp/bistro.db")).unwrap();
/// let allocator = TableAllocator::default();
/// match allocator.allocate(db.connection(), 4).unwrap() {
///     Some(table) => println!("seated at table {table}"),
///     None => println!("no table free"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableAllocator {
    max_claim_attempts: u32,
}

impl Default for TableAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CLAIM_ATTEMPTS)
    }
}

impl TableAllocator {
    /// Creates an allocator that gives up after `max_claim_attempts` lost claims.
    #[must_use]
    pub const fn new(max_claim_attempts: u32) -> Self {
        Self { max_claim_attempts }
    }

    /// Returns the retry bound.
    #[must_use]
    pub const fn max_claim_attempts(&self) -> u32 {
        self.max_claim_attempts
    }

    /// Finds the smallest EMPTY table that seats `party_size`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    pub fn find_candidate(
        &self,
        conn: &Connection,
        party_size: u32,
    ) -> Result<Option<RestaurantTable>> {
        Database::smallest_empty_table(conn, party_size)
    }

    /// Claims `number` if it is still EMPTY.
    ///
    /// Returns `true` iff this call moved the table to OCCUPIED.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn claim(&self, conn: &Connection, number: TableNumber) -> Result<bool> {
        let won = Database::transition_table(conn, number, TableStatus::Empty, TableStatus::Occupied)?;
        if won {
            log::debug!("Claimed table {number}");
        } else {
            log::debug!("Lost claim on table {number}");
        }
        Ok(won)
    }

    /// Sets `number` back to EMPTY. Releasing an EMPTY table is a no-op.
    ///
    /// The update is unconditional on status, but an unknown number is an
    /// error rather than a no-op: it is a stale or mistyped table number.
    /// Staff releases go through
    /// [`ReservationLifecycle::release_table`](crate::ReservationLifecycle::release_table),
    /// which first checks that no live reservation holds the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown table, or a database error.
    pub fn release(&self, conn: &Connection, number: TableNumber) -> Result<()> {
        if !Database::set_table_status(conn, number, TableStatus::Empty)? {
            return Err(Error::NotFound {
                resource: format!("table {number}"),
            });
        }
        log::debug!("Released table {number}");
        Ok(())
    }

    /// Holds an EMPTY table back from allocation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown table, [`Error::Conflict`]
    /// if the table is not EMPTY, or a database error.
    pub fn hold(&self, conn: &Connection, number: TableNumber) -> Result<()> {
        if Database::transition_table(conn, number, TableStatus::Empty, TableStatus::Reserved)? {
            log::debug!("Holding table {number}");
            return Ok(());
        }
        match Database::get_table(conn, number)? {
            Some(table) => Err(Error::Conflict {
                reason: format!("table {number} is {}", table.status()),
            }),
            None => Err(Error::NotFound {
                resource: format!("table {number}"),
            }),
        }
    }

    /// Adds a table to the floor plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if the number is taken, or a database error.
    pub fn add_table(&self, conn: &Connection, table: &RestaurantTable) -> Result<()> {
        Database::insert_table(conn, table)?;
        log::info!("Added table {} seating {}", table.number(), table.capacity());
        Ok(())
    }

    /// Looks up one table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown table, or a database error.
    pub fn get_table(&self, conn: &Connection, number: TableNumber) -> Result<RestaurantTable> {
        Database::get_table(conn, number)?.ok_or_else(|| Error::NotFound {
            resource: format!("table {number}"),
        })
    }

    /// Lists every table by number.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    pub fn list_tables(&self, conn: &Connection) -> Result<Vec<RestaurantTable>> {
        Database::list_tables(conn)
    }

    /// Finds and claims a table for `party_size`.
    ///
    /// Each lost claim is followed by a fresh candidate search, up to the
    /// retry bound. `None` means no table could be had.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried or updated.
    pub fn allocate(&self, conn: &Connection, party_size: u32) -> Result<Option<TableNumber>> {
        for _ in 0..self.max_claim_attempts {
            let Some(candidate) = self.find_candidate(conn, party_size)? else {
                return Ok(None);
            };
            if self.claim(conn, candidate.number())? {
                return Ok(Some(candidate.number()));
            }
        }
        log::warn!(
            "Gave up allocating a table for {party_size} after {} lost claims",
            self.max_claim_attempts
        );
        Ok(None)
    }
}
