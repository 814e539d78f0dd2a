#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # bistro
//!
//! A library for seating restaurant guests against a shared store.
//!
//! Sessions to the store come from a bounded [`ConnectionPool`] that
//! recycles them and closes idle ones in the background. On top of it the
//! [`TableAllocator`] claims physical tables with single conditional
//! updates, and the [`ReservationLifecycle`] moves bookings from ACTIVE to
//! CHECKED_IN, CANCELED or EXPIRED.
//!
//! ## Core Types
//!
//! - [`ConnectionPool`] and [`PooledConnection`]: Bounded session pool
//! - [`TableAllocator`], [`RestaurantTable`] and [`TableNumber`]: Table claims
//! - [`ReservationLifecycle`], [`Reservation`] and [`ConfirmationCode`]: Bookings
//! - [`OpeningHoursAvailability`]: Booking windows and slot capacity
//! - [`Restaurant`] and [`dispatch::Dispatcher`]: Service and request routing
//! - [`Error`], [`Outcome`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use bistro::{ConfirmationCode, Error, Outcome, TableNumber};
//!
//! let table = TableNumber::try_from(12).unwrap();
//! assert_eq!(table.value(), 12);
//!
//! let code = ConfirmationCode::parse("k7qw2m4x").unwrap();
//! assert_eq!(code.as_str(), "K7QW2M4X");
//!
//! let err = Error::TooEarly {
//!     code: code.to_string(),
//!     start: chrono::NaiveDate::from_ymd_opt(2026, 5, 1)
//!         .unwrap()
//!         .and_hms_opt(19, 0, 0)
//!         .unwrap(),
//! };
//! assert_eq!(err.outcome(), Outcome::TooEarly);
//! ```

pub mod availability;
pub mod clock;
pub mod config;
pub mod database;
pub mod dispatch;
pub mod error;
pub mod init;
pub mod logging;
pub mod pool;
pub mod reservation;
pub mod restaurant;
pub mod table;

// Re-export key types at crate root for convenience
pub use availability::{AvailabilityChecker, OpeningHours, OpeningHoursAvailability};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Outcome, Result};
pub use init::{init_data_dir, InitOptions, InitResult};
pub use logging::{init_logger, LogLevel, Logger};
pub use pool::{ConnectionPool, PoolConfig, PoolState, PooledConnection};
pub use reservation::{
    ConfirmationCode, LifecycleSettings, NewReservation, Reservation, ReservationFilter,
    ReservationLifecycle, ReservationStatus, ValidationError,
};
pub use restaurant::Restaurant;
pub use table::{RestaurantTable, TableAllocator, TableNumber, TableStatus};
