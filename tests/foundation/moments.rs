//! Integration tests for Moment
//!
//! Tests the display and RFC 3339 forms and their parsers.

use tagmarsh_foundation::{ErrorKind, Moment, MomentFormat};

const MILLIS: i64 = 1_792_413_296_789;

#[test]
fn display_form() {
    let moment = Moment::from_timestamp_millis(MILLIS).unwrap();
    assert_eq!(
        moment.format(MomentFormat::Display),
        "Mon Oct 19 2026 12:34:56 GMT+0000"
    );
}

#[test]
fn display_round_trip_drops_millis() {
    let moment = Moment::from_timestamp_millis(MILLIS).unwrap();
    let text = moment.format(MomentFormat::Display);
    let parsed = Moment::parse(&text).unwrap();
    assert_eq!(parsed.timestamp_millis(), MILLIS - 789);
    assert_eq!(parsed.format(MomentFormat::Display), text);
}

#[test]
fn display_accepts_zone_name_suffix() {
    let parsed =
        Moment::parse("Mon Oct 19 2026 12:34:56 GMT+0000 (Coordinated Universal Time)").unwrap();
    assert_eq!(parsed.timestamp_millis(), MILLIS - 789);
}

#[test]
fn display_with_offset_normalizes_to_utc() {
    let parsed = Moment::parse_as("Mon Oct 19 2026 14:34:56 GMT+0200", MomentFormat::Display).unwrap();
    assert_eq!(parsed.timestamp_millis(), MILLIS - 789);
}

#[test]
fn rfc3339_keeps_millis() {
    let moment = Moment::from_timestamp_millis(MILLIS).unwrap();
    let text = moment.format(MomentFormat::Rfc3339);
    assert_eq!(text, "2026-10-19T12:34:56.789Z");
    assert_eq!(Moment::parse(&text).unwrap(), moment);
}

#[test]
fn parse_as_is_strict() {
    let err = Moment::parse_as("2026-10-19T12:34:56.789Z", MomentFormat::Display).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidMoment(_)));
}

#[test]
fn garbage_is_invalid() {
    assert!(Moment::parse("next tuesday").is_err());
}
