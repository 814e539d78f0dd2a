//! Reservation state transitions.
//!
//! Each operation runs in one `IMMEDIATE` transaction on the borrowed
//! connection. Taking the store's write lock up front means the reads that
//! decide a transition and the writes that perform it cannot interleave
//! with another session's.

use chrono::{Duration, NaiveDateTime};
use rusqlite::{Connection, TransactionBehavior};

use crate::availability::{AvailabilityChecker, OpeningHoursAvailability};
use crate::database::Database;
use crate::error::{is_unique_violation, Error, Result};
use crate::table::{TableAllocator, TableNumber, TableStatus, DEFAULT_MAX_CLAIM_ATTEMPTS};

use super::{ConfirmationCode, NewReservation, Reservation, ReservationFilter, ReservationStatus};

/// Number of fresh confirmation codes tried before `create` gives up.
const MAX_CODE_ATTEMPTS: usize = 5;

/// Tunables for [`ReservationLifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleSettings {
    /// How long after the start time check-in is still accepted.
    pub grace_period: Duration,
    /// Largest party a single reservation may book.
    pub max_party_size: u32,
    /// Bound on lost table claims during one allocation.
    pub max_claim_attempts: u32,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            grace_period: Duration::minutes(15),
            max_party_size: 20,
            max_claim_attempts: DEFAULT_MAX_CLAIM_ATTEMPTS,
        }
    }
}

/// Drives reservations through ACTIVE, CHECKED_IN, CANCELED and EXPIRED.
///
/// # Type Parameters
///
/// * `A` - Decides booking windows and capacity (defaults to [`OpeningHoursAvailability`])
///
/// # Examples
///
/// ```no_run
/// use bistro::database::{Database, DatabaseConfig};
/// use bistro::{NewReservation, ReservationLifecycle};
/// use chrono::NaiveDate;
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/bistro.db")).unwrap();
/// let lifecycle = ReservationLifecycle::default();
///
/// let start = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap().and_hms_opt(19, 0, 0).unwrap();
/// let now = start - chrono::Duration::days(2);
/// let request = NewReservation::new(start, 4, "guest-17");
/// let reservation = lifecycle.create(db.connection_mut(), &request, now).unwrap();
///
/// let table = lifecycle
///     .check_in(db.connection_mut(), reservation.code(), start)
///     .unwrap();
/// println!("seated at table {table}");
/// ```
#[derive(Debug, Clone)]
pub struct ReservationLifecycle<A: AvailabilityChecker = OpeningHoursAvailability> {
    availability: A,
    allocator: TableAllocator,
    settings: LifecycleSettings,
}

impl Default for ReservationLifecycle {
    fn default() -> Self {
        Self::new(OpeningHoursAvailability::default(), LifecycleSettings::default())
    }
}

impl<A: AvailabilityChecker> ReservationLifecycle<A> {
    /// Creates a lifecycle around an availability checker.
    #[must_use]
    pub fn new(availability: A, settings: LifecycleSettings) -> Self {
        Self {
            availability,
            allocator: TableAllocator::new(settings.max_claim_attempts),
            settings,
        }
    }

    /// Returns the availability checker.
    #[must_use]
    pub const fn availability(&self) -> &A {
        &self.availability
    }

    /// Returns the table allocator.
    #[must_use]
    pub const fn allocator(&self) -> &TableAllocator {
        &self.allocator
    }

    /// Returns the settings.
    #[must_use]
    pub const fn settings(&self) -> &LifecycleSettings {
        &self.settings
    }

    /// Books a new ACTIVE reservation without a table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for bad input or a start time outside
    /// the booking window, [`Error::Conflict`] when the slot is full, or a
    /// database error.
    pub fn create(
        &self,
        conn: &mut Connection,
        request: &NewReservation,
        now: NaiveDateTime,
    ) -> Result<Reservation> {
        if request.party_size > self.settings.max_party_size {
            return Err(Error::Validation {
                field: "party_size".into(),
                message: format!(
                    "party size {} exceeds the maximum of {}",
                    request.party_size, self.settings.max_party_size
                ),
            });
        }

        let mut rng = rand::thread_rng();
        let mut reservation = Reservation::builder(
            ConfirmationCode::generate(&mut rng),
            request.start_time,
            request.party_size,
            request.customer_ref.clone(),
        )
        .phone(request.phone.clone())
        .email(request.email.clone())
        .created_at(now)
        .build()?;

        self.availability
            .check_window(conn, request.start_time, now)?;

        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !self
            .availability
            .has_capacity(&tx, request.start_time, request.party_size)?
        {
            return Err(Error::Conflict {
                reason: format!(
                    "no capacity for a party of {} at {}",
                    request.party_size,
                    request.start_time.format("%Y-%m-%d %H:%M")
                ),
            });
        }

        for _ in 0..MAX_CODE_ATTEMPTS {
            match Database::insert_reservation(&tx, &reservation) {
                Ok(id) => {
                    tx.commit()?;
                    log::info!(
                        "Created reservation {} for {} at {}",
                        reservation.code(),
                        reservation.party_size(),
                        reservation.start_time()
                    );
                    return Ok(reservation.with_id(id));
                }
                Err(Error::Database(ref e)) if is_unique_violation(e) => {
                    log::debug!("Confirmation code {} taken, drawing another", reservation.code());
                    reservation = reservation.with_code(ConfirmationCode::generate(&mut rng));
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::Conflict {
            reason: "could not generate a unique confirmation code".into(),
        })
    }

    /// Seats the party of an ACTIVE reservation and returns its table.
    ///
    /// Check-in opens at the start time and closes when the grace period
    /// runs out. A late arrival expires the reservation and releases any
    /// table it held.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the code is unknown or not ACTIVE
    /// - [`Error::TooEarly`] before the start time (nothing changes)
    /// - [`Error::Expired`] after the grace period (the expiry is committed)
    /// - [`Error::Conflict`] if no table is free (nothing changes)
    pub fn check_in(
        &self,
        conn: &mut Connection,
        code: &ConfirmationCode,
        now: NaiveDateTime,
    ) -> Result<TableNumber> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let reservation = find_active(&tx, code)?;

        if now < reservation.start_time() {
            return Err(Error::TooEarly {
                code: code.to_string(),
                start: reservation.start_time(),
            });
        }

        if reservation.is_overdue(now, self.settings.grace_period) {
            self.expire(&tx, &reservation)?;
            tx.commit()?;
            return Err(Error::Expired {
                code: code.to_string(),
            });
        }

        let table = match reservation.table_number() {
            Some(table) if self.still_held(&tx, &reservation, table)? => table,
            _ => self
                .allocator
                .allocate(&tx, reservation.party_size())?
                .ok_or_else(|| Error::Conflict {
                    reason: format!("no free table seats a party of {}", reservation.party_size()),
                })?,
        };

        if !Database::mark_checked_in(&tx, reservation.id(), table, now)? {
            return Err(not_active(code));
        }
        tx.commit()?;

        log::info!("Checked in {code} at table {table}");
        Ok(table)
    }

    /// Whether the table pre-assigned to `reservation` is still its own.
    ///
    /// A table released in the meantime is reclaimed if it is free again;
    /// one linked to another live reservation is given up.
    fn still_held(
        &self,
        conn: &Connection,
        reservation: &Reservation,
        table: TableNumber,
    ) -> Result<bool> {
        if Database::table_holder(conn, table, Some(reservation.id()))?.is_some() {
            log::warn!("Pre-assigned table {table} is linked to another reservation");
            return Ok(false);
        }
        match Database::get_table(conn, table)? {
            Some(row) if row.status() == TableStatus::Occupied => Ok(true),
            Some(_) => {
                log::warn!("Pre-assigned table {table} was released; claiming again");
                self.allocator.claim(conn, table)
            }
            None => Ok(false),
        }
    }

    /// Sets a table back to EMPTY on staff request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] while a live reservation holds the table,
    /// [`Error::NotFound`] for an unknown table, or a database error.
    pub fn release_table(&self, conn: &mut Connection, table: TableNumber) -> Result<()> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if let Some(code) = Database::table_holder(&tx, table, None)? {
            return Err(Error::Conflict {
                reason: format!("table {table} is held by reservation {code}"),
            });
        }
        self.allocator.release(&tx, table)?;
        tx.commit()?;
        Ok(())
    }

    /// Cancels an ACTIVE reservation, releasing any table it held.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyCanceled`] for a canceled reservation,
    /// [`Error::NotFound`] if the code is unknown or already seated or
    /// expired, or a database error.
    pub fn cancel(&self, conn: &mut Connection, code: &ConfirmationCode) -> Result<()> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let reservation = find_existing(&tx, code)?;

        match reservation.status() {
            ReservationStatus::Active => {}
            ReservationStatus::Canceled => {
                return Err(Error::AlreadyCanceled {
                    code: code.to_string(),
                })
            }
            ReservationStatus::CheckedIn | ReservationStatus::Expired => {
                return Err(not_active(code))
            }
        }

        if !Database::mark_canceled(&tx, reservation.id())? {
            return Err(not_active(code));
        }
        if let Some(table) = reservation.table_number() {
            self.allocator.release(&tx, table)?;
        }
        tx.commit()?;

        log::info!("Canceled reservation {code}");
        Ok(())
    }

    /// Claims a table for an ACTIVE reservation ahead of arrival.
    ///
    /// A reservation that already holds a table keeps it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the code is unknown or not ACTIVE,
    /// [`Error::Conflict`] if no table is free, or a database error.
    pub fn pre_assign(&self, conn: &mut Connection, code: &ConfirmationCode) -> Result<TableNumber> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let reservation = find_active(&tx, code)?;
        if let Some(table) = reservation.table_number() {
            return Ok(table);
        }

        let table = self
            .allocator
            .allocate(&tx, reservation.party_size())?
            .ok_or_else(|| Error::Conflict {
                reason: format!("no free table seats a party of {}", reservation.party_size()),
            })?;
        if !Database::assign_table(&tx, reservation.id(), table)? {
            return Err(not_active(code));
        }
        tx.commit()?;

        log::info!("Pre-assigned table {table} to {code}");
        Ok(table)
    }

    /// Records that a seated party has left and frees its table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] unless the reservation is CHECKED_IN and
    /// not yet finished, or a database error.
    pub fn finish(
        &self,
        conn: &mut Connection,
        code: &ConfirmationCode,
        now: NaiveDateTime,
    ) -> Result<TableNumber> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let reservation = find_existing(&tx, code)?;
        let seated = || Error::NotFound {
            resource: format!("seated reservation {code}"),
        };

        let table = match (reservation.status(), reservation.table_number()) {
            (ReservationStatus::CheckedIn, Some(table)) if reservation.finished_at().is_none() => {
                table
            }
            _ => return Err(seated()),
        };
        if !Database::mark_finished(&tx, reservation.id(), now)? {
            return Err(seated());
        }
        self.allocator.release(&tx, table)?;
        tx.commit()?;

        log::info!("Party of {code} left table {table}");
        Ok(table)
    }

    /// Expires every ACTIVE reservation past its grace period.
    ///
    /// Returns the codes this sweep expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried or updated.
    pub fn expire_overdue(
        &self,
        conn: &mut Connection,
        now: NaiveDateTime,
    ) -> Result<Vec<ConfirmationCode>> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let cutoff = now - self.settings.grace_period;

        let mut expired = Vec::new();
        for reservation in Database::find_overdue_reservations(&tx, cutoff)? {
            if self.expire(&tx, &reservation)? {
                expired.push(reservation.code().clone());
            }
        }
        tx.commit()?;

        if !expired.is_empty() {
            log::info!("Expired {} overdue reservation(s)", expired.len());
        }
        Ok(expired)
    }

    /// Looks up a reservation in any status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the code is unknown.
    pub fn find(&self, conn: &Connection, code: &ConfirmationCode) -> Result<Reservation> {
        find_existing(conn, code)
    }

    /// Lists reservations matching `filter`, earliest start first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list(&self, conn: &Connection, filter: &ReservationFilter) -> Result<Vec<Reservation>> {
        Database::list_reservations(conn, filter)
    }

    // ACTIVE -> EXPIRED, then release the held table. `false` if another
    // transition got there first.
    fn expire(&self, conn: &Connection, reservation: &Reservation) -> Result<bool> {
        if !Database::mark_expired(conn, reservation.id())? {
            return Ok(false);
        }
        if let Some(table) = reservation.table_number() {
            self.allocator.release(conn, table)?;
        }
        log::info!("Reservation {} expired", reservation.code());
        Ok(true)
    }
}

fn not_active(code: &ConfirmationCode) -> Error {
    Error::NotFound {
        resource: format!("active reservation {code}"),
    }
}

fn find_existing(conn: &Connection, code: &ConfirmationCode) -> Result<Reservation> {
    Database::get_reservation_by_code(conn, code)?.ok_or_else(|| Error::NotFound {
        resource: format!("reservation {code}"),
    })
}

fn find_active(conn: &Connection, code: &ConfirmationCode) -> Result<Reservation> {
    match Database::get_reservation_by_code(conn, code)? {
        Some(reservation) if reservation.status() == ReservationStatus::Active => Ok(reservation),
        _ => Err(not_active(code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::MockAvailabilityChecker;
    use crate::database::test_util::{create_test_database, insert_table};
    use crate::table::TableStatus;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 1)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    fn permissive() -> ReservationLifecycle<MockAvailabilityChecker> {
        let mut availability = MockAvailabilityChecker::new();
        availability
            .expect_check_window()
            .returning(|_, _, _| Ok(()));
        availability
            .expect_has_capacity()
            .returning(|_, _, _| Ok(true));
        ReservationLifecycle::new(availability, LifecycleSettings::default())
    }

    fn book(
        lifecycle: &ReservationLifecycle<MockAvailabilityChecker>,
        conn: &mut Connection,
        party_size: u32,
    ) -> ConfirmationCode {
        let request = NewReservation::new(at(19, 0, 0), party_size, "guest");
        lifecycle
            .create(conn, &request, at(9, 0, 0))
            .unwrap()
            .code()
            .clone()
    }

    fn table_status(conn: &Connection, table: TableNumber) -> TableStatus {
        Database::get_table(conn, table).unwrap().unwrap().status()
    }

    #[test]
    fn test_create_persists_active_without_table() {
        let mut db = create_test_database();
        let lifecycle = permissive();
        let request = NewReservation::new(at(19, 0, 0), 4, "guest-17")
            .with_email(Some("guest@example.com".into()));

        let created = lifecycle
            .create(db.connection_mut(), &request, at(9, 0, 0))
            .unwrap();
        assert!(created.id() > 0);
        assert_eq!(created.code().as_str().len(), 8);

        let stored = lifecycle.find(db.connection(), created.code()).unwrap();
        assert_eq!(stored.status(), ReservationStatus::Active);
        assert_eq!(stored.table_number(), None);
        assert_eq!(stored.email(), Some("guest@example.com"));
        assert_eq!(stored.created_at(), at(9, 0, 0));
    }

    #[test]
    fn test_create_rejects_bad_party_before_asking_availability() {
        let mut db = create_test_database();
        // No expectations: any call to the checker would panic.
        let lifecycle =
            ReservationLifecycle::new(MockAvailabilityChecker::new(), LifecycleSettings::default());

        for party in [0, 21] {
            let request = NewReservation::new(at(19, 0, 0), party, "guest");
            let err = lifecycle
                .create(db.connection_mut(), &request, at(9, 0, 0))
                .unwrap_err();
            assert!(matches!(err, Error::Validation { .. }), "party {party}");
        }
    }

    #[test]
    fn test_create_without_capacity_is_conflict() {
        let mut db = create_test_database();
        let mut availability = MockAvailabilityChecker::new();
        availability
            .expect_check_window()
            .times(1)
            .returning(|_, _, _| Ok(()));
        availability
            .expect_has_capacity()
            .times(1)
            .returning(|_, _, _| Ok(false));
        let lifecycle = ReservationLifecycle::new(availability, LifecycleSettings::default());

        let request = NewReservation::new(at(19, 0, 0), 4, "guest");
        let err = lifecycle
            .create(db.connection_mut(), &request, at(9, 0, 0))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
        assert!(lifecycle
            .list(db.connection(), &ReservationFilter::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_create_outside_window_is_validation_error() {
        let mut db = create_test_database();
        let mut availability = MockAvailabilityChecker::new();
        availability.expect_check_window().returning(|_, _, _| {
            Err(Error::Validation {
                field: "start_time".into(),
                message: "closed".into(),
            })
        });
        let lifecycle = ReservationLifecycle::new(availability, LifecycleSettings::default());

        let request = NewReservation::new(at(19, 0, 0), 4, "guest");
        let err = lifecycle
            .create(db.connection_mut(), &request, at(9, 0, 0))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_check_in_too_early_changes_nothing() {
        let mut db = create_test_database();
        insert_table(db.connection(), 1, 4);
        let lifecycle = permissive();
        let code = book(&lifecycle, db.connection_mut(), 4);

        let err = lifecycle
            .check_in(db.connection_mut(), &code, at(18, 59, 59))
            .unwrap_err();
        assert!(matches!(err, Error::TooEarly { .. }));

        let stored = lifecycle.find(db.connection(), &code).unwrap();
        assert_eq!(stored.status(), ReservationStatus::Active);
        let table = TableNumber::try_from(1).unwrap();
        assert_eq!(table_status(db.connection(), table), TableStatus::Empty);
    }

    #[test]
    fn test_check_in_within_grace_seats_party() {
        let mut db = create_test_database();
        let table = insert_table(db.connection(), 1, 4);
        let lifecycle = permissive();
        let code = book(&lifecycle, db.connection_mut(), 3);

        let seated = lifecycle
            .check_in(db.connection_mut(), &code, at(19, 15, 0))
            .unwrap();
        assert_eq!(seated, table);
        assert_eq!(table_status(db.connection(), table), TableStatus::Occupied);

        let stored = lifecycle.find(db.connection(), &code).unwrap();
        assert_eq!(stored.status(), ReservationStatus::CheckedIn);
        assert_eq!(stored.checked_in_at(), Some(at(19, 15, 0)));

        // A second check-in finds nothing ACTIVE.
        assert!(lifecycle
            .check_in(db.connection_mut(), &code, at(19, 16, 0))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_check_in_late_expires() {
        let mut db = create_test_database();
        let table = insert_table(db.connection(), 1, 4);
        let lifecycle = permissive();
        let code = book(&lifecycle, db.connection_mut(), 4);

        let err = lifecycle
            .check_in(db.connection_mut(), &code, at(19, 15, 1))
            .unwrap_err();
        assert!(matches!(err, Error::Expired { .. }));

        let stored = lifecycle.find(db.connection(), &code).unwrap();
        assert_eq!(stored.status(), ReservationStatus::Expired);
        assert_eq!(table_status(db.connection(), table), TableStatus::Empty);
    }

    #[test]
    fn test_late_check_in_releases_pre_assigned_table() {
        let mut db = create_test_database();
        let table = insert_table(db.connection(), 1, 4);
        let lifecycle = permissive();
        let code = book(&lifecycle, db.connection_mut(), 4);

        assert_eq!(lifecycle.pre_assign(db.connection_mut(), &code).unwrap(), table);
        assert_eq!(table_status(db.connection(), table), TableStatus::Occupied);

        let err = lifecycle
            .check_in(db.connection_mut(), &code, at(20, 0, 0))
            .unwrap_err();
        assert!(matches!(err, Error::Expired { .. }));
        assert_eq!(table_status(db.connection(), table), TableStatus::Empty);
    }

    #[test]
    fn test_check_in_uses_pre_assigned_table() {
        let mut db = create_test_database();
        insert_table(db.connection(), 1, 4);
        let second = insert_table(db.connection(), 2, 6);
        let lifecycle = permissive();
        let code = book(&lifecycle, db.connection_mut(), 5);

        assert_eq!(lifecycle.pre_assign(db.connection_mut(), &code).unwrap(), second);
        // Pre-assigning again keeps the same table.
        assert_eq!(lifecycle.pre_assign(db.connection_mut(), &code).unwrap(), second);
        assert_eq!(
            lifecycle
                .check_in(db.connection_mut(), &code, at(19, 0, 0))
                .unwrap(),
            second
        );
    }

    #[test]
    fn test_check_in_without_table_is_conflict_and_keeps_reservation() {
        let mut db = create_test_database();
        insert_table(db.connection(), 1, 2);
        let lifecycle = permissive();
        let code = book(&lifecycle, db.connection_mut(), 4);

        let err = lifecycle
            .check_in(db.connection_mut(), &code, at(19, 5, 0))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
        let stored = lifecycle.find(db.connection(), &code).unwrap();
        assert_eq!(stored.status(), ReservationStatus::Active);
        assert_eq!(stored.table_number(), None);
    }

    #[test]
    fn test_unknown_code_is_not_found() {
        let mut db = create_test_database();
        let lifecycle = permissive();
        let code = ConfirmationCode::parse("NOPE2345").unwrap();

        assert!(lifecycle
            .check_in(db.connection_mut(), &code, at(19, 0, 0))
            .unwrap_err()
            .is_not_found());
        assert!(lifecycle
            .cancel(db.connection_mut(), &code)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_cancel_releases_table_and_reports_repeat() {
        let mut db = create_test_database();
        let table = insert_table(db.connection(), 1, 4);
        let lifecycle = permissive();
        let code = book(&lifecycle, db.connection_mut(), 2);
        lifecycle.pre_assign(db.connection_mut(), &code).unwrap();

        lifecycle.cancel(db.connection_mut(), &code).unwrap();
        assert_eq!(table_status(db.connection(), table), TableStatus::Empty);
        assert_eq!(
            lifecycle.find(db.connection(), &code).unwrap().status(),
            ReservationStatus::Canceled
        );

        let err = lifecycle.cancel(db.connection_mut(), &code).unwrap_err();
        assert!(matches!(err, Error::AlreadyCanceled { .. }));
    }

    #[test]
    fn test_cancel_after_check_in_is_not_found() {
        let mut db = create_test_database();
        insert_table(db.connection(), 1, 4);
        let lifecycle = permissive();
        let code = book(&lifecycle, db.connection_mut(), 2);
        lifecycle
            .check_in(db.connection_mut(), &code, at(19, 0, 0))
            .unwrap();

        assert!(lifecycle
            .cancel(db.connection_mut(), &code)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_finish_releases_table_once() {
        let mut db = create_test_database();
        let table = insert_table(db.connection(), 1, 4);
        let lifecycle = permissive();
        let code = book(&lifecycle, db.connection_mut(), 2);
        lifecycle
            .check_in(db.connection_mut(), &code, at(19, 0, 0))
            .unwrap();

        assert_eq!(
            lifecycle
                .finish(db.connection_mut(), &code, at(21, 0, 0))
                .unwrap(),
            table
        );
        assert_eq!(table_status(db.connection(), table), TableStatus::Empty);
        let stored = lifecycle.find(db.connection(), &code).unwrap();
        assert_eq!(stored.status(), ReservationStatus::CheckedIn);
        assert_eq!(stored.finished_at(), Some(at(21, 0, 0)));

        assert!(lifecycle
            .finish(db.connection_mut(), &code, at(21, 5, 0))
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_expire_overdue_sweeps_only_late_reservations() {
        let mut db = create_test_database();
        let table = insert_table(db.connection(), 1, 4);
        let lifecycle = permissive();
        let late = book(&lifecycle, db.connection_mut(), 2);
        lifecycle.pre_assign(db.connection_mut(), &late).unwrap();

        let request = NewReservation::new(at(20, 0, 0), 2, "guest");
        let on_time = lifecycle
            .create(db.connection_mut(), &request, at(9, 0, 0))
            .unwrap();

        let expired = lifecycle
            .expire_overdue(db.connection_mut(), at(19, 30, 0))
            .unwrap();
        assert_eq!(expired, vec![late.clone()]);
        assert_eq!(table_status(db.connection(), table), TableStatus::Empty);
        assert_eq!(
            lifecycle.find(db.connection(), on_time.code()).unwrap().status(),
            ReservationStatus::Active
        );

        // Nothing left to sweep at the same instant.
        assert!(lifecycle
            .expire_overdue(db.connection_mut(), at(19, 30, 0))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_release_table_refuses_while_held() {
        let mut db = create_test_database();
        let table = insert_table(db.connection(), 1, 4);
        let lifecycle = permissive();
        let code = book(&lifecycle, db.connection_mut(), 2);
        lifecycle.pre_assign(db.connection_mut(), &code).unwrap();

        let err = lifecycle
            .release_table(db.connection_mut(), table)
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
        assert_eq!(table_status(db.connection(), table), TableStatus::Occupied);

        lifecycle
            .check_in(db.connection_mut(), &code, at(19, 0, 0))
            .unwrap();
        let err = lifecycle
            .release_table(db.connection_mut(), table)
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));

        lifecycle
            .finish(db.connection_mut(), &code, at(21, 0, 0))
            .unwrap();
        lifecycle.release_table(db.connection_mut(), table).unwrap();
        assert_eq!(table_status(db.connection(), table), TableStatus::Empty);
    }

    #[test]
    fn test_check_in_reclaims_table_released_underneath() {
        let mut db = create_test_database();
        let table = insert_table(db.connection(), 1, 4);
        let lifecycle = permissive();
        let first = book(&lifecycle, db.connection_mut(), 2);
        lifecycle.pre_assign(db.connection_mut(), &first).unwrap();
        lifecycle.allocator().release(db.connection(), table).unwrap();

        assert_eq!(
            lifecycle
                .check_in(db.connection_mut(), &first, at(19, 0, 0))
                .unwrap(),
            table
        );
        assert_eq!(table_status(db.connection(), table), TableStatus::Occupied);

        // The only table is taken again, so a second party cannot sit there.
        let second = book(&lifecycle, db.connection_mut(), 2);
        let err = lifecycle
            .check_in(db.connection_mut(), &second, at(19, 5, 0))
            .unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
    }

    #[test]
    fn test_check_in_moves_off_table_seated_by_another_party() {
        let mut db = create_test_database();
        let first_table = insert_table(db.connection(), 1, 4);
        let lifecycle = permissive();
        let first = book(&lifecycle, db.connection_mut(), 2);
        lifecycle.pre_assign(db.connection_mut(), &first).unwrap();
        lifecycle
            .allocator()
            .release(db.connection(), first_table)
            .unwrap();

        let second = book(&lifecycle, db.connection_mut(), 2);
        assert_eq!(
            lifecycle
                .check_in(db.connection_mut(), &second, at(19, 0, 0))
                .unwrap(),
            first_table
        );

        let spare = insert_table(db.connection(), 2, 4);
        assert_eq!(
            lifecycle
                .check_in(db.connection_mut(), &first, at(19, 5, 0))
                .unwrap(),
            spare
        );
        let stored = lifecycle.find(db.connection(), &first).unwrap();
        assert_eq!(stored.table_number(), Some(spare));
    }
}
