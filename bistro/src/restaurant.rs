//! The restaurant service: one pool plus the rules that run on it.
//!
//! Every operation borrows one pooled session for its whole duration and
//! hands it back on every exit path. A store failure that means the session
//! itself is broken invalidates the loan so the pool closes it.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use rusqlite::Connection;

use crate::availability::{OpeningHours, OpeningHoursAvailability};
use crate::config::Config;
use crate::database::{Database, DatabaseConfig, DATABASE_FILE_NAME};
use crate::error::{Error, Result};
use crate::pool::{ConnectionPool, PoolState};
use crate::reservation::{
    ConfirmationCode, NewReservation, Reservation, ReservationFilter, ReservationLifecycle,
};
use crate::table::{RestaurantTable, TableNumber};

/// Shared handle to the pool, the allocator and the reservation rules.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
///
/// # Examples
///
/// ```no_run
/// use bistro::config::ConfigBuilder;
/// use bistro::{NewReservation, Restaurant, SystemClock, Clock};
/// use std::path::Path;
///
/// let data_dir = Path::new("/srv/bistro");
/// let config = ConfigBuilder::new().with_data_dir(data_dir).build().unwrap();
/// let restaurant = Restaurant::open(&config, data_dir).unwrap();
///
/// let now = SystemClock.now();
/// let start = now + chrono::Duration::days(1);
/// let booked = restaurant
///     .create_reservation(&NewReservation::new(start, 2, "guest-4"), now)
///     .unwrap();
/// println!("confirmation code {}", booked.code());
/// ```
#[derive(Debug)]
pub struct Restaurant {
    pool: ConnectionPool,
    lifecycle: ReservationLifecycle,
}

impl Restaurant {
    /// Assembles a restaurant from an existing pool and lifecycle.
    #[must_use]
    pub fn new(pool: ConnectionPool, lifecycle: ReservationLifecycle) -> Self {
        Self { pool, lifecycle }
    }

    /// Opens the store in `data_dir` with the resolved configuration.
    ///
    /// One session is borrowed up front so a missing or incompatible store
    /// is reported here rather than on the first request.
    ///
    /// # Errors
    ///
    /// - [`Error::DataDirectoryNotFound`] if the store is missing and
    ///   auto-initialization is disabled
    /// - [`Error::Connection`] if the store cannot be opened
    /// - [`Error::Validation`] if the pool settings are unusable
    pub fn open(config: &Config, data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(DATABASE_FILE_NAME);
        let autoinit = !config.disable_autoinit.unwrap_or(false);
        if !autoinit && !path.exists() {
            return Err(Error::DataDirectoryNotFound {
                path: data_dir.to_path_buf(),
            });
        }

        let mut database = DatabaseConfig::new(path).with_busy_timeout(config.busy_timeout());
        if !autoinit {
            database = database.without_auto_create();
        }

        let pool = ConnectionPool::open(database, config.pool_config())?;
        let first = pool.acquire()?;
        drop(first);

        let lifecycle = ReservationLifecycle::new(
            OpeningHoursAvailability::new(config.availability_settings()),
            config.lifecycle_settings(),
        );
        log::debug!("Restaurant opened at {}", data_dir.display());
        Ok(Self::new(pool, lifecycle))
    }

    /// Returns the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Returns the reservation rules.
    #[must_use]
    pub const fn lifecycle(&self) -> &ReservationLifecycle {
        &self.lifecycle
    }

    /// Runs `op` on a borrowed session.
    ///
    /// # Errors
    ///
    /// Returns pool errors from acquiring, or whatever `op` returns.
    pub fn with_connection<T>(&self, op: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut session = self.pool.acquire()?;
        let result = op(session.connection_mut());
        if let Err(ref err) = result {
            if err.is_connection_failure() {
                log::warn!("Discarding session {} after: {err}", session.id());
                session.invalidate();
            }
        }
        result
    }

    // Tables

    /// Adds a table to the floor plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if the number is taken.
    pub fn add_table(&self, table: &RestaurantTable) -> Result<()> {
        self.with_connection(|conn| self.lifecycle.allocator().add_table(conn, table))
    }

    /// Lists the floor plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_tables(&self) -> Result<Vec<RestaurantTable>> {
        self.with_connection(|conn| self.lifecycle.allocator().list_tables(conn))
    }

    /// Holds an EMPTY table back from allocation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if the table is not EMPTY or
    /// [`Error::NotFound`] if it does not exist.
    pub fn hold_table(&self, number: TableNumber) -> Result<()> {
        self.with_connection(|conn| self.lifecycle.allocator().hold(conn, number))
    }

    /// Sets a table back to EMPTY unless a live reservation holds it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] while a pre-assigned or seated party
    /// holds the table, or [`Error::NotFound`] if it does not exist.
    pub fn release_table(&self, number: TableNumber) -> Result<()> {
        self.with_connection(|conn| self.lifecycle.release_table(conn, number))
    }

    // Opening hours

    /// Sets the opening hours for one weekday.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn set_opening_hours(&self, hours: &OpeningHours) -> Result<()> {
        self.with_connection(|conn| Database::set_opening_hours(conn, hours))
    }

    /// Marks a weekday closed. Returns `false` if it already was.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear_opening_hours(&self, weekday: Weekday) -> Result<bool> {
        self.with_connection(|conn| Database::clear_opening_hours(conn, weekday))
    }

    /// Lists the weekly opening hours, Monday first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn opening_hours(&self) -> Result<Vec<OpeningHours>> {
        self.with_connection(|conn| Database::list_opening_hours(conn))
    }

    /// Start times on `date` that can still take a party of `party_size`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a zero party size.
    pub fn available_slots(
        &self,
        date: NaiveDate,
        party_size: u32,
        now: NaiveDateTime,
    ) -> Result<Vec<NaiveTime>> {
        self.with_connection(|conn| {
            self.lifecycle
                .availability()
                .available_slots(conn, date, party_size, now)
        })
    }

    // Reservations

    /// Books a reservation. See [`ReservationLifecycle::create`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] or [`Error::Conflict`].
    pub fn create_reservation(
        &self,
        request: &NewReservation,
        now: NaiveDateTime,
    ) -> Result<Reservation> {
        self.with_connection(|conn| self.lifecycle.create(conn, request, now))
    }

    /// Cancels a reservation. See [`ReservationLifecycle::cancel`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or [`Error::AlreadyCanceled`].
    pub fn cancel(&self, code: &ConfirmationCode) -> Result<()> {
        self.with_connection(|conn| self.lifecycle.cancel(conn, code))
    }

    /// Checks a party in. See [`ReservationLifecycle::check_in`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`], [`Error::TooEarly`], [`Error::Expired`]
    /// or [`Error::Conflict`].
    pub fn check_in(&self, code: &ConfirmationCode, now: NaiveDateTime) -> Result<TableNumber> {
        self.with_connection(|conn| self.lifecycle.check_in(conn, code, now))
    }

    /// Frees the table of a party that left. See [`ReservationLifecycle::finish`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] unless the party is seated.
    pub fn finish(&self, code: &ConfirmationCode, now: NaiveDateTime) -> Result<TableNumber> {
        self.with_connection(|conn| self.lifecycle.finish(conn, code, now))
    }

    /// Claims a table ahead of arrival. See [`ReservationLifecycle::pre_assign`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] or [`Error::Conflict`].
    pub fn pre_assign(&self, code: &ConfirmationCode) -> Result<TableNumber> {
        self.with_connection(|conn| self.lifecycle.pre_assign(conn, code))
    }

    /// Expires every overdue reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be updated.
    pub fn expire_overdue(&self, now: NaiveDateTime) -> Result<Vec<ConfirmationCode>> {
        self.with_connection(|conn| self.lifecycle.expire_overdue(conn, now))
    }

    /// Looks up a reservation by code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown code.
    pub fn find(&self, code: &ConfirmationCode) -> Result<Reservation> {
        self.with_connection(|conn| self.lifecycle.find(conn, code))
    }

    /// Lists reservations matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>> {
        self.with_connection(|conn| self.lifecycle.list(conn, filter))
    }

    /// Snapshot of pool occupancy.
    #[must_use]
    pub fn pool_state(&self) -> PoolState {
        self.pool.state()
    }

    /// Closes the pool. Later operations fail with [`Error::PoolClosed`].
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }
}
