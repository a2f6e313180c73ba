//! End-to-end scenarios exercising a real IANA zone database
//! (`/usr/share/zoneinfo`), run only when the `sys` feature is enabled.

#![cfg(feature = "sys")]

use chronia::{DateTimeDelta, Disambiguate, Instant, TimeDelta, Zone, ZonedDateTime};

fn amsterdam() -> Zone {
    Zone::load("Europe/Amsterdam").expect("host must carry the IANA tzdata")
}

/// S1 — fold arithmetic: adding 24h across the fall-back fold shifts the
/// civil time by only 23h of wall-clock distance in UTC.
#[test]
fn fold_arithmetic_across_a_day() {
    let earlier = ZonedDateTime::new(2023, 10, 29, 2, 15, 30, 0, amsterdam(), Disambiguate::Earlier).unwrap();
    let later = ZonedDateTime::new(2023, 10, 29, 2, 15, 30, 0, amsterdam(), Disambiguate::Later).unwrap();
    assert_eq!(later.to_instant().diff(earlier.to_instant()), TimeDelta::from_hours(1).unwrap());

    let shifted = earlier.checked_add_time(TimeDelta::from_hours(24).unwrap()).unwrap();
    assert_eq!(shifted.date(), chronia::Date::new(2023, 10, 30).unwrap());
    assert_eq!(shifted.time(), chronia::Time::new(1, 15, 30, 0).unwrap());
    assert_eq!(shifted.offset().get(), 3600);
}

/// S2 — gap disambiguation: the civil reading at 2023-03-26T02:30 does not
/// exist in Amsterdam (clocks jump from 02:00 to 03:00).
#[test]
fn gap_disambiguation_variants() {
    let earlier = ZonedDateTime::new(2023, 3, 26, 2, 30, 0, 0, amsterdam(), Disambiguate::Earlier).unwrap();
    assert_eq!(earlier.time(), chronia::Time::new(1, 30, 0, 0).unwrap());
    assert_eq!(earlier.offset().get(), 3600);

    let later = ZonedDateTime::new(2023, 3, 26, 2, 30, 0, 0, amsterdam(), Disambiguate::Later).unwrap();
    assert_eq!(later.time(), chronia::Time::new(3, 30, 0, 0).unwrap());
    assert_eq!(later.offset().get(), 7200);

    let compatible = ZonedDateTime::new(2023, 3, 26, 2, 30, 0, 0, amsterdam(), Disambiguate::Compatible).unwrap();
    assert_eq!(compatible.time(), later.time());

    assert!(ZonedDateTime::new(2023, 3, 26, 2, 30, 0, 0, amsterdam(), Disambiguate::Raise).is_err());
}

/// S4 — an offset inconsistent with what the named zone actually has at that
/// civil time is rejected rather than silently accepted.
#[test]
fn offset_zone_mismatch_is_rejected() {
    let err = ZonedDateTime::from_common_iso("2023-10-29T02:15:30+03:00[Europe/Amsterdam]");
    assert!(err.is_err());
}

/// S5 — an Instant and a ZonedDateTime in different kinds compare equal (and
/// hash equal) when they denote the same point on the timeline.
#[test]
fn instant_equality_across_kinds() {
    let instant = Instant::from_utc(2020, 8, 15, 21, 0, 0, 0).unwrap();
    let zoned = ZonedDateTime::new(2020, 8, 15, 23, 0, 0, 0, amsterdam(), Disambiguate::Raise).unwrap();
    assert_eq!(instant, zoned.to_instant());
}

/// S6 — ISO 8601 duration grammar: mixed date/time components combine as
/// months + days on the date side, nanoseconds on the time side.
#[test]
fn iso_duration_parse() {
    let delta: DateTimeDelta = chronia::parsing::parse_datetime_delta("P1Y2M3W4DT5H6M7.000008S").unwrap();
    assert_eq!(delta.date_part().months(), 14);
    assert_eq!(delta.date_part().days(), 25);
    let expected_nanos = 5 * 3_600 * 1_000_000_000i128
        + 6 * 60 * 1_000_000_000i128
        + 7 * 1_000_000_000i128
        + 8 * 1_000i128;
    assert_eq!(delta.time_part().total_nanos(), expected_nanos);
}

/// S3 — a POSIX tail correctly projects the offset for an instant past the
/// zone database's last recorded transition.
#[test]
fn posix_tail_resolves_far_future_offset() {
    let zone = amsterdam();
    let far_future = Instant::from_timestamp(2_216_250_000).unwrap();
    assert_eq!(zone.offset_for_instant(far_future).get(), 7200);
}
