//! Request dispatch.
//!
//! A [`Dispatcher`] turns a decoded [`Request`] into calls on a
//! [`Restaurant`] and always answers with a [`Response`]; failures become
//! [`Response::Failure`] carrying a stable [`Outcome`](crate::Outcome) code.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use bistro::config::Config;
//! use bistro::dispatch::Dispatcher;
//! use bistro::Restaurant;
//!
//! let restaurant = Restaurant::open(&Config::default(), "/srv/bistro".as_ref()).unwrap();
//! let dispatcher = Dispatcher::new(Arc::new(restaurant));
//! let reply = dispatcher.dispatch_line(r#"{"command":"expire-overdue"}"#);
//! println!("{}", reply.reply_line());
//! ```

mod request;
mod response;

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::reservation::NewReservation;
use crate::restaurant::Restaurant;

pub use request::Request;
pub use response::Response;

/// Routes requests to the restaurant service.
///
/// # Type Parameters
///
/// * `C` - Supplies the current time (defaults to [`SystemClock`])
#[derive(Debug)]
pub struct Dispatcher<C: Clock = SystemClock> {
    restaurant: Arc<Restaurant>,
    clock: C,
}

impl Dispatcher<SystemClock> {
    /// Creates a dispatcher on the system clock.
    #[must_use]
    pub fn new(restaurant: Arc<Restaurant>) -> Self {
        Self::with_clock(restaurant, SystemClock)
    }
}

impl<C: Clock> Dispatcher<C> {
    /// Creates a dispatcher on an explicit clock.
    #[must_use]
    pub fn with_clock(restaurant: Arc<Restaurant>, clock: C) -> Self {
        Self { restaurant, clock }
    }

    /// Returns the restaurant service.
    #[must_use]
    pub const fn restaurant(&self) -> &Arc<Restaurant> {
        &self.restaurant
    }

    /// Returns the clock.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Executes one request.
    pub fn dispatch(&self, request: &Request) -> Response {
        match self.execute(request) {
            Ok(response) => response,
            Err(err) => {
                log::debug!("{} failed: {err}", request.name());
                Response::failure(&err)
            }
        }
    }

    /// Decodes one JSON request and executes it.
    ///
    /// A line that does not decode yields a `VALIDATION_ERROR` failure.
    pub fn dispatch_line(&self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line.trim()) {
            Ok(request) => self.dispatch(&request),
            Err(err) => Response::failure(&Error::Validation {
                field: "request".into(),
                message: err.to_string(),
            }),
        }
    }

    fn execute(&self, request: &Request) -> Result<Response> {
        let now = self.clock.now();
        match request {
            Request::AvailableSlots { date, party_size } => {
                let slots = self
                    .restaurant
                    .available_slots(*date, *party_size, now)?
                    .into_iter()
                    .map(|slot| slot.format("%H:%M").to_string())
                    .collect();
                Ok(Response::Slots { slots })
            }
            Request::CreateReservation {
                start,
                party_size,
                customer_ref,
                phone,
                email,
            } => {
                let new = NewReservation::new(*start, *party_size, customer_ref.clone())
                    .with_phone(phone.clone())
                    .with_email(email.clone());
                let reservation = self.restaurant.create_reservation(&new, now)?;
                Ok(Response::Created {
                    code: reservation.code().clone(),
                })
            }
            Request::CancelReservation { code } => {
                self.restaurant.cancel(code)?;
                Ok(Response::Canceled { code: code.clone() })
            }
            Request::CheckIn { code } => Ok(Response::CheckedIn {
                table_number: self.restaurant.check_in(code, now)?,
            }),
            Request::ExpireOverdue => Ok(Response::Expired {
                codes: self.restaurant.expire_overdue(now)?,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::OpeningHours;
    use crate::clock::FixedClock;
    use crate::config::{Config, PoolSettings};
    use crate::error::Outcome;
    use crate::table::{RestaurantTable, TableNumber};
    use chrono::{Duration, NaiveDate, NaiveDateTime, Weekday};
    use tempfile::TempDir;

    // 2026-05-04 is a Monday.
    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 4)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn dispatcher(dir: &TempDir, now: NaiveDateTime) -> Dispatcher<FixedClock> {
        let config = Config {
            pool: Some(PoolSettings {
                reap_interval_secs: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let restaurant = Restaurant::open(&config, dir.path()).unwrap();
        restaurant
            .set_opening_hours(&OpeningHours::parse(Weekday::Mon, "18:00-22:00").unwrap())
            .unwrap();
        restaurant
            .add_table(&RestaurantTable::new(TableNumber::try_from(4).unwrap(), 4).unwrap())
            .unwrap();
        Dispatcher::with_clock(Arc::new(restaurant), FixedClock::new(now))
    }

    fn created_code(response: &Response) -> crate::ConfirmationCode {
        match response {
            Response::Created { code } => code.clone(),
            other => panic!("expected Created, got {other:?}"),
        }
    }

    #[test]
    fn test_slots_then_book_then_check_in() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(&dir, at(9, 0));

        let slots = dispatcher.dispatch_line(
            r#"{"command":"available-slots","date":"2026-05-04","party_size":2}"#,
        );
        assert_eq!(slots.reply_line(), "OK SLOTS 18:00 18:30 19:00 19:30 20:00");

        let created = dispatcher.dispatch(&Request::CreateReservation {
            start: at(19, 0),
            party_size: 2,
            customer_ref: "guest-3".into(),
            phone: None,
            email: Some("guest3@example.com".into()),
        });
        let code = created_code(&created);

        let early = dispatcher.dispatch(&Request::CheckIn { code: code.clone() });
        assert_eq!(early.outcome(), Some(Outcome::TooEarly));

        dispatcher.clock().set(at(19, 10));
        let seated = dispatcher.dispatch(&Request::CheckIn { code });
        assert_eq!(seated.reply_line(), "OK CHECKED_IN 4");
    }

    #[test]
    fn test_cancel_twice_reports_already_canceled() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(&dir, at(9, 0));
        let code = created_code(&dispatcher.dispatch(&Request::CreateReservation {
            start: at(20, 0),
            party_size: 4,
            customer_ref: "guest-8".into(),
            phone: None,
            email: None,
        }));

        let first = dispatcher.dispatch(&Request::CancelReservation { code: code.clone() });
        assert_eq!(first, Response::Canceled { code: code.clone() });
        let second = dispatcher.dispatch(&Request::CancelReservation { code });
        assert_eq!(second.outcome(), Some(Outcome::AlreadyCanceled));
    }

    #[test]
    fn test_expire_sweep() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(&dir, at(9, 0));
        let code = created_code(&dispatcher.dispatch(&Request::CreateReservation {
            start: at(18, 0),
            party_size: 2,
            customer_ref: "guest-2".into(),
            phone: None,
            email: None,
        }));

        dispatcher.clock().set(at(18, 0) + Duration::minutes(16));
        let swept = dispatcher.dispatch(&Request::ExpireOverdue);
        assert_eq!(swept, Response::Expired { codes: vec![code.clone()] });

        let late = dispatcher.dispatch(&Request::CheckIn { code });
        assert_eq!(late.outcome(), Some(Outcome::NotFound));
    }

    #[test]
    fn test_malformed_line_is_validation_failure() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(&dir, at(9, 0));
        let reply = dispatcher.dispatch_line("{not json");
        assert_eq!(reply.outcome(), Some(Outcome::ValidationError));
        assert!(reply.reply_line().starts_with("ERR VALIDATION_ERROR "));
    }

    #[test]
    fn test_closed_day_has_no_slots() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(&dir, at(9, 0));
        let reply = dispatcher.dispatch(&Request::AvailableSlots {
            date: NaiveDate::from_ymd_opt(2026, 5, 5).unwrap(),
            party_size: 2,
        });
        assert_eq!(reply, Response::Slots { slots: vec![] });
    }
}
