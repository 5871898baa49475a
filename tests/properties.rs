use proptest::prelude::*;
use timespan::{ArithmeticError, Duration, Timestamp};

fn arb_duration() -> impl Strategy<Value = Duration> {
    (any::<i64>(), 0i64..1_000_000_000).prop_map(|(seconds, nanos)| {
        Duration::of_seconds_nanos(seconds, nanos).unwrap()
    })
}

proptest! {
    #[test]
    fn nanos_invariant_holds_for_any_adjustment(seconds in any::<i64>(), adjustment in any::<i64>()) {
        if let Ok(d) = Duration::of_seconds_nanos(seconds, adjustment) {
            prop_assert!(d.nanos_in_second() < 1_000_000_000);
        }
    }

    #[test]
    fn nanos_invariant_holds_for_millis_and_nanos(amount in any::<i64>()) {
        prop_assert!(Duration::of_millis(amount).nanos_in_second() < 1_000_000_000);
        prop_assert!(Duration::of_nanos(amount).nanos_in_second() < 1_000_000_000);
    }

    #[test]
    fn of_nanos_preserves_total(nanos in any::<i64>()) {
        prop_assert_eq!(Duration::of_nanos(nanos).to_nanos_i128(), i128::from(nanos));
        prop_assert_eq!(Duration::of_nanos(nanos).to_nanos(), Ok(nanos));
    }

    #[test]
    fn of_millis_preserves_total(millis in any::<i64>()) {
        prop_assert_eq!(Duration::of_millis(millis).to_millis(), Ok(millis));
    }

    #[test]
    fn display_parse_round_trip(d in arb_duration()) {
        let text = d.to_string();
        prop_assert_eq!(Duration::parse(&text), Ok(d));
    }

    #[test]
    fn display_is_canonical_ptns(d in arb_duration()) {
        let text = d.to_string();
        prop_assert!(text.starts_with("PT"));
        prop_assert!(text.ends_with('S'));
        prop_assert!(!text.contains(','));
    }

    #[test]
    fn plus_then_minus_is_identity(a in arb_duration(), b in arb_duration()) {
        if let Ok(sum) = a.plus(b) {
            prop_assert_eq!(sum.minus(b), Ok(a));
        }
    }

    #[test]
    fn plus_zero_is_identity(d in arb_duration()) {
        prop_assert_eq!(d.plus(Duration::ZERO), Ok(d));
        prop_assert_eq!(d.minus(Duration::ZERO), Ok(d));
    }

    #[test]
    fn multiply_by_unit_scalars(d in arb_duration()) {
        prop_assert_eq!(d.multiplied_by(1), Ok(d));
        prop_assert_eq!(d.multiplied_by(0), Ok(Duration::ZERO));
        prop_assert_eq!(d.divided_by(1), Ok(d));
        prop_assert_eq!(d.divided_by(0), Err(ArithmeticError::DivisionByZero));
    }

    #[test]
    fn ordering_matches_total_nanos(a in arb_duration(), b in arb_duration()) {
        prop_assert_eq!(a.cmp(&b), a.to_nanos_i128().cmp(&b.to_nanos_i128()));
    }

    #[test]
    fn between_equals_timestamp_difference(
        start_seconds in -4_102_444_800i64..=4_102_444_800,
        start_nanos in 0i64..1_000_000_000,
        end_seconds in -4_102_444_800i64..=4_102_444_800,
        end_nanos in 0i64..1_000_000_000,
    ) {
        let start = Timestamp::of_epoch_seconds_nanos(start_seconds, start_nanos).unwrap();
        let end = Timestamp::of_epoch_seconds_nanos(end_seconds, end_nanos).unwrap();
        let d = Duration::between(start, end).unwrap();
        let expected = (i128::from(end_seconds) * 1_000_000_000 + i128::from(end_nanos))
            - (i128::from(start_seconds) * 1_000_000_000 + i128::from(start_nanos));
        prop_assert_eq!(d.to_nanos_i128(), expected);
    }

    #[test]
    fn decimal_seconds_round_trip(d in arb_duration()) {
        prop_assert_eq!(
            Duration::of_decimal_seconds(&d.to_decimal_seconds()),
            Ok(d)
        );
    }
}
