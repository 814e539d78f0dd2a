//! Reservation types and their lifecycle.
//!
//! A reservation books a party for a start time. It begins ACTIVE and ends in
//! exactly one of CHECKED_IN, CANCELED or EXPIRED; reservations are never
//! deleted. The transitions themselves live in [`ReservationLifecycle`].

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::table::TableNumber;

pub mod lifecycle;

#[cfg(test)]
mod proptests;

pub use lifecycle::{LifecycleSettings, ReservationLifecycle};

/// Characters used in generated confirmation codes.
///
/// Digits and letters that are easy to confuse when read aloud (0/O, 1/I)
/// are left out.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a generated confirmation code.
pub const CODE_LENGTH: usize = 8;

const MAX_CODE_LENGTH: usize = 32;
const MAX_CUSTOMER_REF_LENGTH: usize = 128;
const MAX_EMAIL_LENGTH: usize = 254;

/// The externally visible handle of a reservation.
///
/// # Examples
///
/// ```
/// use bistro::ConfirmationCode;
///
/// let code = ConfirmationCode::parse(" k7qw2m4x ").unwrap();
/// assert_eq!(code.as_str(), "K7QW2M4X");
///
/// let generated = ConfirmationCode::generate(&mut rand::thread_rng());
/// assert_eq!(generated.as_str().len(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConfirmationCode(String);

impl ConfirmationCode {
    /// Generates a fresh random code from [`CODE_ALPHABET`].
    ///
    /// Uniqueness is not guaranteed here; the store's UNIQUE constraint
    /// rejects collisions and the caller retries.
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..CODE_LENGTH)
            .map(|_| char::from(CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())]))
            .collect();
        Self(code)
    }

    /// Parses a code supplied by a caller, normalizing case and whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty, too long, or contains anything
    /// other than ASCII letters and digits.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError {
                field: "confirmation_code".into(),
                message: "confirmation code must not be empty".into(),
            });
        }
        if trimmed.len() > MAX_CODE_LENGTH {
            return Err(ValidationError {
                field: "confirmation_code".into(),
                message: format!("confirmation code exceeds {MAX_CODE_LENGTH} characters"),
            });
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError {
                field: "confirmation_code".into(),
                message: "confirmation code may only contain letters and digits".into(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ConfirmationCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ConfirmationCode> for String {
    fn from(code: ConfirmationCode) -> Self {
        code.0
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    /// Booked and awaiting arrival.
    Active,
    /// The party arrived and was seated.
    CheckedIn,
    /// Canceled before arrival.
    Canceled,
    /// The party never arrived within the grace period.
    Expired,
}

impl ReservationStatus {
    /// The value stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::CheckedIn => "CHECKED_IN",
            Self::Canceled => "CANCELED",
            Self::Expired => "EXPIRED",
        }
    }

    /// Returns `true` for the three end states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "ACTIVE" => Ok(Self::Active),
            "CHECKED_IN" => Ok(Self::CheckedIn),
            "CANCELED" | "CANCELLED" => Ok(Self::Canceled),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown reservation status: {s}"),
            }),
        }
    }
}

/// A booking request, before it has been assigned a code or persisted.
///
/// # Examples
///
/// ```
/// use bistro::NewReservation;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap().and_hms_opt(19, 0, 0).unwrap();
/// let request = NewReservation::new(start, 4, "guest-17")
///     .with_phone(Some("+44 20 7946 0958".into()));
/// assert_eq!(request.party_size, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    /// Requested start time.
    pub start_time: NaiveDateTime,
    /// Number of guests.
    pub party_size: u32,
    /// Opaque reference to the booking customer.
    pub customer_ref: String,
    /// Optional contact phone number.
    pub phone: Option<String>,
    /// Optional contact e-mail address.
    pub email: Option<String>,
}

impl NewReservation {
    /// Creates a request without contact details.
    #[must_use]
    pub fn new(start_time: NaiveDateTime, party_size: u32, customer_ref: impl Into<String>) -> Self {
        Self {
            start_time,
            party_size,
            customer_ref: customer_ref.into(),
            phone: None,
            email: None,
        }
    }

    /// Sets the contact phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }

    /// Sets the contact e-mail address.
    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }
}

/// A persisted reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    id: i64,
    code: ConfirmationCode,
    start_time: NaiveDateTime,
    party_size: u32,
    customer_ref: String,
    phone: Option<String>,
    email: Option<String>,
    table_number: Option<TableNumber>,
    status: ReservationStatus,
    checked_in_at: Option<NaiveDateTime>,
    finished_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
}

impl Reservation {
    /// Creates a new reservation builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use bistro::{ConfirmationCode, Reservation, ReservationStatus};
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap().and_hms_opt(19, 0, 0).unwrap();
    /// let code = ConfirmationCode::parse("ABCD2345").unwrap();
    /// let reservation = Reservation::builder(code, start, 2, "guest-1").build().unwrap();
    /// assert_eq!(reservation.status(), ReservationStatus::Active);
    /// assert!(reservation.table_number().is_none());
    /// ```
    #[must_use]
    pub fn builder(
        code: ConfirmationCode,
        start_time: NaiveDateTime,
        party_size: u32,
        customer_ref: impl Into<String>,
    ) -> ReservationBuilder {
        ReservationBuilder {
            id: 0,
            code,
            start_time,
            party_size,
            customer_ref: customer_ref.into(),
            phone: None,
            email: None,
            table_number: None,
            status: ReservationStatus::Active,
            checked_in_at: None,
            finished_at: None,
            created_at: None,
        }
    }

    /// Returns the row identifier (0 until persisted).
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Returns the confirmation code.
    #[must_use]
    pub const fn code(&self) -> &ConfirmationCode {
        &self.code
    }

    /// Returns the start time.
    #[must_use]
    pub const fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    /// Returns the party size.
    #[must_use]
    pub const fn party_size(&self) -> u32 {
        self.party_size
    }

    /// Returns the customer reference.
    #[must_use]
    pub fn customer_ref(&self) -> &str {
        &self.customer_ref
    }

    /// Returns the contact phone number.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns the contact e-mail address.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the table held by this reservation, if any.
    #[must_use]
    pub const fn table_number(&self) -> Option<TableNumber> {
        self.table_number
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Returns when the party checked in.
    #[must_use]
    pub const fn checked_in_at(&self) -> Option<NaiveDateTime> {
        self.checked_in_at
    }

    /// Returns when the seated party left.
    #[must_use]
    pub const fn finished_at(&self) -> Option<NaiveDateTime> {
        self.finished_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// The latest instant at which check-in is still accepted.
    #[must_use]
    pub fn check_in_deadline(&self, grace: Duration) -> NaiveDateTime {
        self.start_time + grace
    }

    /// Returns `true` if `now` is past the grace period of this reservation.
    ///
    /// Exactly at the deadline the party may still check in.
    #[must_use]
    pub fn is_overdue(&self, now: NaiveDateTime, grace: Duration) -> bool {
        now > self.check_in_deadline(grace)
    }

    pub(crate) fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub(crate) fn with_code(mut self, code: ConfirmationCode) -> Self {
        self.code = code;
        self
    }
}

/// Builder for creating `Reservation` instances.
#[derive(Debug)]
pub struct ReservationBuilder {
    id: i64,
    code: ConfirmationCode,
    start_time: NaiveDateTime,
    party_size: u32,
    customer_ref: String,
    phone: Option<String>,
    email: Option<String>,
    table_number: Option<TableNumber>,
    status: ReservationStatus,
    checked_in_at: Option<NaiveDateTime>,
    finished_at: Option<NaiveDateTime>,
    created_at: Option<NaiveDateTime>,
}

impl ReservationBuilder {
    /// Sets the row identifier.
    #[must_use]
    pub const fn id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    /// Sets the contact phone number. Blank values are treated as absent.
    #[must_use]
    pub fn phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
        self
    }

    /// Sets the contact e-mail address. Blank values are treated as absent.
    #[must_use]
    pub fn email(mut self, email: Option<String>) -> Self {
        self.email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());
        self
    }

    /// Sets the held table.
    #[must_use]
    pub const fn table_number(mut self, table_number: Option<TableNumber>) -> Self {
        self.table_number = table_number;
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the check-in timestamp.
    #[must_use]
    pub const fn checked_in_at(mut self, checked_in_at: Option<NaiveDateTime>) -> Self {
        self.checked_in_at = checked_in_at;
        self
    }

    /// Sets the finish timestamp.
    #[must_use]
    pub const fn finished_at(mut self, finished_at: Option<NaiveDateTime>) -> Self {
        self.finished_at = finished_at;
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub const fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Builds the reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The party size is zero
    /// - The customer reference is blank, too long, or has control characters
    /// - The phone number is not plausibly a phone number
    /// - The e-mail address is not plausibly an e-mail address
    ///
    /// # Examples
    ///
    /// ```
    /// use bistro::{ConfirmationCode, Reservation};
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap().and_hms_opt(19, 0, 0).unwrap();
    /// let code = ConfirmationCode::parse("ABCD2345").unwrap();
    ///
    /// assert!(Reservation::builder(code.clone(), start, 0, "guest").build().is_err());
    /// assert!(Reservation::builder(code, start, 2, "guest")
    ///     .email(Some("not-an-address".into()))
    ///     .build()
    ///     .is_err());
    /// ```
    pub fn build(self) -> Result<Reservation, ValidationError> {
        if self.party_size == 0 {
            return Err(ValidationError {
                field: "party_size".into(),
                message: "party size must be at least 1".into(),
            });
        }

        let customer_ref = self.customer_ref.trim().to_string();
        validate_customer_ref(&customer_ref)?;

        if let Some(ref phone) = self.phone {
            validate_phone(phone)?;
        }
        if let Some(ref email) = self.email {
            validate_email(email)?;
        }

        Ok(Reservation {
            id: self.id,
            code: self.code,
            start_time: self.start_time,
            party_size: self.party_size,
            customer_ref,
            phone: self.phone,
            email: self.email,
            table_number: self.table_number,
            status: self.status,
            checked_in_at: self.checked_in_at,
            finished_at: self.finished_at,
            created_at: self
                .created_at
                .unwrap_or_else(|| chrono::Local::now().naive_local()),
        })
    }
}

fn validate_customer_ref(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError {
            field: "customer_ref".into(),
            message: "customer reference must be non-empty after trimming whitespace".into(),
        });
    }
    if value.chars().count() > MAX_CUSTOMER_REF_LENGTH {
        return Err(ValidationError {
            field: "customer_ref".into(),
            message: format!("customer reference exceeds {MAX_CUSTOMER_REF_LENGTH} characters"),
        });
    }
    if value.chars().any(char::is_control) {
        return Err(ValidationError {
            field: "customer_ref".into(),
            message: "customer reference must not contain control characters".into(),
        });
    }
    Ok(())
}

fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let body = value.strip_prefix('+').unwrap_or(value);
    let allowed = body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '.'));
    let digits = body.chars().filter(char::is_ascii_digit).count();
    if !allowed || !(6..=15).contains(&digits) {
        return Err(ValidationError {
            field: "phone".into(),
            message: format!("'{value}' is not a valid phone number"),
        });
    }
    Ok(())
}

fn validate_email(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError {
        field: "email".into(),
        message: format!("'{value}' is not a valid e-mail address"),
    };
    if value.len() > MAX_EMAIL_LENGTH || value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }
    Ok(())
}

/// Filter for listing reservations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    /// Only reservations in this status.
    pub status: Option<ReservationStatus>,
    /// Only reservations starting on this day.
    pub date: Option<NaiveDate>,
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}
