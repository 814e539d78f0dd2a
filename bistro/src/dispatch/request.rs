//! Inbound commands.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::reservation::{ConfirmationCode, NewReservation};

/// One command with its arguments.
///
/// Serialized as a JSON object tagged by `command`.
///
/// # Examples
///
/// ```
/// use bistro::dispatch::Request;
///
/// let request: Request = serde_json::from_str(
///     r#"{"command":"check-in","code":"K7QW2M4X"}"#,
/// ).unwrap();
/// assert_eq!(request.name(), "check-in");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Request {
    /// Start times on `date` that can take `party_size` guests.
    AvailableSlots {
        /// Day to search.
        date: NaiveDate,
        /// Number of guests.
        party_size: u32,
    },
    /// Book a table.
    CreateReservation {
        /// Requested start time.
        start: NaiveDateTime,
        /// Number of guests.
        party_size: u32,
        /// Opaque reference to the booking customer.
        customer_ref: String,
        /// Optional contact phone number.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phone: Option<String>,
        /// Optional contact e-mail address.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
    /// Cancel a booking.
    CancelReservation {
        /// Confirmation code.
        code: ConfirmationCode,
    },
    /// Seat an arriving party.
    CheckIn {
        /// Confirmation code.
        code: ConfirmationCode,
    },
    /// Expire every booking past its grace period.
    ExpireOverdue,
}

impl Request {
    /// The command name as it appears on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AvailableSlots { .. } => "available-slots",
            Self::CreateReservation { .. } => "create-reservation",
            Self::CancelReservation { .. } => "cancel-reservation",
            Self::CheckIn { .. } => "check-in",
            Self::ExpireOverdue => "expire-overdue",
        }
    }

    /// Builds a create request from a [`NewReservation`].
    #[must_use]
    pub fn create(reservation: NewReservation) -> Self {
        Self::CreateReservation {
            start: reservation.start_time,
            party_size: reservation.party_size,
            customer_ref: reservation.customer_ref,
            phone: reservation.phone,
            email: reservation.email,
        }
    }
}
