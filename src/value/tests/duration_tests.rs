//! Tests for ISO-8601 duration parsing, rendering and difference decomposition

use super::*;
use crate::Error;
use crate::value::IsoDuration;
use chrono::{TimeDelta, TimeZone, Utc};

#[test]
fn test_single_day_components() {
    let value = convert(ValueKind::Duration, "P1D");
    let duration = value.as_duration().unwrap();

    assert_eq!(duration.days(), 1);
    assert_eq!(duration.hours(), 0);
    assert_eq!(duration.minutes(), 0);
    assert_eq!(duration.seconds(), 0);
    assert!(!duration.is_negative());
}

#[test]
fn test_leading_minus_inverts_sign() {
    let positive = *convert(ValueKind::Duration, "P1D").as_duration().unwrap();
    let negative = *convert(ValueKind::Duration, "-P1D").as_duration().unwrap();

    assert!(negative.is_negative());
    assert_eq!(negative, positive.inverted());
    assert_eq!(negative.to_time_delta(), Some(TimeDelta::days(-1)));
}

#[test]
fn test_leading_plus_is_accepted() {
    let duration = *convert(ValueKind::Duration, "+PT30M").as_duration().unwrap();

    assert!(!duration.is_negative());
    assert_eq!(duration.minutes(), 30);
}

#[test]
fn test_malformed_duration_fails() {
    let err = ValueConverter::default()
        .convert(ValueKind::Duration, "not-a-duration")
        .unwrap_err();

    assert!(matches!(
        err,
        Error::InvalidValueForType {
            kind: ValueKind::Duration,
            ..
        }
    ));
}

#[test]
fn test_out_of_order_components_rejected() {
    assert!(IsoDuration::parse("P2D1Y").is_err());
    assert!(IsoDuration::parse("P2D1YT10H").is_err());
}

#[test]
fn test_bare_designators_rejected() {
    assert!(IsoDuration::parse("P").is_err());
    assert!(IsoDuration::parse("PT").is_err());
    assert!(IsoDuration::parse("P1DT").is_err());
}

#[test]
fn test_full_duration_renders_canonically() {
    let duration: IsoDuration = "P2Y6M8DT395M18S".parse().unwrap();

    assert_eq!(duration.years(), 2);
    assert_eq!(duration.months(), 6);
    assert_eq!(duration.days(), 8);
    assert_eq!(duration.minutes(), 395);
    assert_eq!(duration.to_string(), "P2Y6M8DT395M18S");
    // Calendar components have no fixed length
    assert_eq!(duration.to_time_delta(), None);
}

#[test]
fn test_lowercase_designators() {
    let duration = IsoDuration::parse("p1dt2h").unwrap();

    assert_eq!(duration.to_string(), "P1DT2H");
}

#[test]
fn test_zero_duration_renders_pt0s() {
    assert_eq!(IsoDuration::parse("P0D").unwrap().to_string(), "PT0S");
    assert_eq!(IsoDuration::default().to_string(), "PT0S");
}

#[test]
fn test_difference_decomposes_into_days_and_time() {
    let start = Utc.with_ymd_and_hms(2016, 3, 17, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2016, 4, 1, 8, 30, 22).unwrap();

    let duration = IsoDuration::between(&start, &end);

    assert_eq!(duration.to_string(), "P15DT8H30M22S");
    assert_eq!(duration.months(), 0);
    assert_eq!(IsoDuration::between(&end, &start).to_string(), "-P15DT8H30M22S");
}

#[test]
fn test_value_from_time_delta() {
    let value = TypedValue::from_time_delta(TimeDelta::seconds(90_061));

    assert_eq!(value.kind(), ValueKind::Duration);
    assert_eq!(value.to_string(), "P1DT1H1M1S");
    assert_eq!(
        value.as_duration().unwrap().to_time_delta(),
        Some(TimeDelta::seconds(90_061))
    );
}

#[test]
fn test_weeks_convert_to_time_delta() {
    let duration = IsoDuration::parse("P1W1D").unwrap();

    assert_eq!(duration.weeks(), 1);
    assert_eq!(duration.to_time_delta(), Some(TimeDelta::days(8)));
}

#[test]
fn test_empty_duration_is_null() {
    assert!(convert(ValueKind::Duration, "").is_null());
}

#[test]
fn test_duration_token_check() {
    assert!(TypedValue::is_valid_token(ValueKind::Duration, "-PT5S"));
    assert!(!TypedValue::is_valid_token(ValueKind::Duration, "5 seconds"));
}
