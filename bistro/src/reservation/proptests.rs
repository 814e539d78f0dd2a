//! Property-based tests for reservation types.

use super::{ConfirmationCode, Reservation, ReservationStatus, CODE_ALPHABET, CODE_LENGTH};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn start_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (0i64..365 * 24 * 4).prop_map(|quarter_hours| {
        NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::minutes(quarter_hours * 15)
    })
}

fn status_strategy() -> impl Strategy<Value = ReservationStatus> {
    prop_oneof![
        Just(ReservationStatus::Active),
        Just(ReservationStatus::CheckedIn),
        Just(ReservationStatus::Canceled),
        Just(ReservationStatus::Expired),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Generated codes have a fixed length and only unambiguous characters
    #[test]
    fn generated_code_shape(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let code = ConfirmationCode::generate(&mut rng);
        prop_assert_eq!(code.as_str().len(), CODE_LENGTH);
        prop_assert!(code.as_str().bytes().all(|b| CODE_ALPHABET.contains(&b)));
        prop_assert_eq!(ConfirmationCode::parse(code.as_str()).unwrap(), code);
    }

    // Parsing is case-insensitive and ignores surrounding whitespace
    #[test]
    fn parse_normalizes_case(raw in "[a-zA-Z0-9]{1,32}") {
        let lower = ConfirmationCode::parse(&format!("  {}  ", raw.to_lowercase())).unwrap();
        let upper = ConfirmationCode::parse(&raw.to_uppercase()).unwrap();
        prop_assert_eq!(lower, upper);
    }

    // Codes with separators or punctuation are rejected
    #[test]
    fn parse_rejects_punctuation(prefix in "[A-Z]{1,8}", sep in "[-_ ./#]", suffix in "[A-Z]{1,8}") {
        let joined = format!("{prefix}{sep}{suffix}");
        prop_assert!(ConfirmationCode::parse(&joined).is_err());
    }

    // Overdue exactly when past start plus grace
    #[test]
    fn overdue_boundary(
        start in start_strategy(),
        grace_minutes in 0i64..120,
        offset_secs in -7200i64..14400
    ) {
        let code = ConfirmationCode::parse("ABCD2345").unwrap();
        let reservation = Reservation::builder(code, start, 2, "guest").build().unwrap();
        let grace = Duration::minutes(grace_minutes);
        let now = start + Duration::seconds(offset_secs);
        prop_assert_eq!(
            reservation.is_overdue(now, grace),
            offset_secs > grace_minutes * 60
        );
    }

    // Status names round-trip through parsing
    #[test]
    fn status_parse_round_trip(status in status_strategy()) {
        prop_assert_eq!(status.as_str().parse::<ReservationStatus>().unwrap(), status);
        prop_assert_eq!(status.is_terminal(), status != ReservationStatus::Active);
    }
}
