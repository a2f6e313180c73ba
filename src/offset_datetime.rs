//! A `(Date, Time)` pair anchored to a fixed UTC offset: aware, but with no
//! zone to consult, so the offset never changes once constructed.

use crate::common::round::Unit;
use crate::common::scalar::{Offset, RoundMode};
use crate::date::Date;
use crate::delta::{DateDelta, DateTimeDelta, TimeDelta};
use crate::error::{Error, Result};
use crate::instant::Instant;
use crate::parsing::parse_date_time_offset_zone;
use crate::time::Time;
use crate::zone::Zone;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Copy, Clone)]
pub struct OffsetDateTime {
    date: Date,
    time: Time,
    offset: Offset,
}

impl OffsetDateTime {
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
        offset_seconds: i32,
    ) -> Result<Self> {
        let offset = Offset::new(offset_seconds).ok_or(Error::ValueOutOfRange {
            what: "offset_seconds",
            value: offset_seconds as i64,
            min: Offset::MIN.get() as i64,
            max: Offset::MAX.get() as i64,
        })?;
        Ok(Self {
            date: Date::new(year, month, day)?,
            time: Time::new(hour, minute, second, nanosecond)?,
            offset,
        })
    }

    #[cfg(feature = "sys")]
    pub fn now(offset_seconds: i32) -> Result<Self> {
        let offset = Offset::new(offset_seconds).ok_or(Error::ValueOutOfRange {
            what: "offset_seconds",
            value: offset_seconds as i64,
            min: Offset::MIN.get() as i64,
            max: Offset::MAX.get() as i64,
        })?;
        Ok(Self::from_instant(Instant::now(), offset))
    }

    pub(crate) fn from_parts(date: Date, time: Time, offset: Offset) -> Self {
        Self { date, time, offset }
    }

    pub(crate) fn from_instant(instant: Instant, offset: Offset) -> Self {
        let shifted = instant
            .epoch_secs()
            .shift(offset.get() as i64)
            .unwrap_or(instant.epoch_secs());
        let date = Date::from_unix_days(shifted.as_unix_days());
        let time = Time::from_total_nanos_of_day(
            shifted.time_of_day_secs() as i128 * 1_000_000_000 + instant.subsec_nanos() as i128,
        );
        Self { date, time, offset }
    }

    pub fn to_instant(self) -> Instant {
        let naive = Instant::from_date_time(self.date, self.time)
            .expect("date and time were already validated at construction");
        let offset_delta = TimeDelta::from_seconds(self.offset.get() as i64)
            .expect("offset magnitude is always well within TimeDelta range");
        naive
            .checked_sub(offset_delta)
            .expect("offset datetime always maps to a representable instant")
    }

    pub const fn date(self) -> Date {
        self.date
    }

    pub const fn time(self) -> Time {
        self.time
    }

    pub const fn offset(self) -> Offset {
        self.offset
    }

    /// Replaces any combination of fields. Requires `ignore_dst = true`: changing
    /// a field independently of the others can silently produce a civil time that
    /// no longer matches what the fixed offset was originally chosen to represent.
    pub fn replace(
        self,
        date: Option<Date>,
        time: Option<Time>,
        offset_seconds: Option<i32>,
        ignore_dst: bool,
    ) -> Result<Self> {
        if !ignore_dst {
            return Err(Error::ImplicitlyIgnoringDST {
                operation: "OffsetDateTime::replace",
            });
        }
        let offset = match offset_seconds {
            Some(s) => Offset::new(s).ok_or(Error::ValueOutOfRange {
                what: "offset_seconds",
                value: s as i64,
                min: Offset::MIN.get() as i64,
                max: Offset::MAX.get() as i64,
            })?,
            None => self.offset,
        };
        Ok(Self {
            date: date.unwrap_or(self.date),
            time: time.unwrap_or(self.time),
            offset,
        })
    }

    pub fn checked_add_date(self, delta: DateDelta) -> Result<Self> {
        let date = self.date.add_months(delta.months())?.add_days(delta.days())?;
        Ok(Self { date, ..self })
    }

    pub fn checked_add_time(self, delta: TimeDelta) -> Result<Self> {
        let instant = self.to_instant().checked_add(delta)?;
        Ok(Self::from_instant(instant, self.offset))
    }

    pub fn checked_add_datetime(self, delta: DateTimeDelta) -> Result<Self> {
        self.checked_add_date(delta.date_part())?.checked_add_time(delta.time_part())
    }

    pub fn diff(self, other: Self) -> TimeDelta {
        self.to_instant().diff(other.to_instant())
    }

    pub fn round(self, unit: Unit, increment: i64, mode: RoundMode) -> Result<Self> {
        let instant = self.to_instant().round(unit, increment, mode)?;
        Ok(Self::from_instant(instant, self.offset))
    }

    /// Field-exact equality: same civil reading *and* the same recorded offset,
    /// unlike `==`, which compares only the instant the two refer to.
    pub fn exact_eq(self, other: Self) -> bool {
        self.date == other.date && self.time == other.time && self.offset == other.offset
    }

    pub fn format_common_iso(self) -> String {
        format!("{}T{}{}", self.date, self.time.format_common_iso(), self.offset)
    }

    /// Parses the common ISO 8601 profile. A trailing `[zone-key]` is rejected:
    /// an offset datetime carries no zone identifier to reconcile it against.
    pub fn from_common_iso(s: &str) -> Result<Self> {
        let (date, time, offset, zone_key) = parse_date_time_offset_zone(s)?;
        if zone_key.is_some() {
            return Err(Error::InvalidFormat {
                what: "offset datetime (unexpected zone annotation)",
                input: s.to_string(),
            });
        }
        Ok(Self::from_parts(date, time, offset))
    }

    /// Parses RFC 3339, accepting `-00:00` as a plain zero offset.
    pub fn from_rfc3339(s: &str) -> Result<Self> {
        crate::parsing::parse_rfc3339_offset_datetime(s)
    }

    /// Parses RFC 2822, rejecting the `-0000` "zone unknown" marker: an offset
    /// datetime has no way to record "unknown" distinctly from zero.
    pub fn from_rfc2822(s: &str) -> Result<Self> {
        crate::parsing::parse_rfc2822_offset_datetime(s)
    }

    /// Converts to a different fixed offset, or keeps the current one.
    pub fn to_fixed_offset(self, offset_seconds: Option<i32>) -> Result<Self> {
        let offset = match offset_seconds {
            Some(s) => Offset::new(s).ok_or(Error::ValueOutOfRange {
                what: "offset_seconds",
                value: s as i64,
                min: Offset::MIN.get() as i64,
                max: Offset::MAX.get() as i64,
            })?,
            None => self.offset,
        };
        Ok(Self::from_instant(self.to_instant(), offset))
    }

    /// Reprojects into a [`ZonedDateTime`] for the given zone, preserving the instant.
    pub fn to_tz(self, key: &str) -> Result<crate::zoned_datetime::ZonedDateTime> {
        let zone = Zone::load(key)?;
        Ok(crate::zoned_datetime::ZonedDateTime::from_instant(self.to_instant(), zone))
    }

    /// Reprojects into a [`crate::system_datetime::SystemDateTime`] in the host's zone.
    #[cfg(feature = "sys")]
    pub fn to_system_tz(self) -> Result<crate::system_datetime::SystemDateTime> {
        crate::system_datetime::SystemDateTime::from_instant(self.to_instant())
    }
}

impl PartialEq for OffsetDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.to_instant() == other.to_instant()
    }
}

impl Eq for OffsetDateTime {}

impl PartialOrd for OffsetDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OffsetDateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_instant().cmp(&other.to_instant())
    }
}

impl fmt::Display for OffsetDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_common_iso())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_roundtrip() {
        let dt = OffsetDateTime::new(2023, 6, 1, 12, 0, 0, 0, 3600).unwrap();
        let back = OffsetDateTime::from_instant(dt.to_instant(), dt.offset());
        assert!(back.exact_eq(dt));
    }

    #[test]
    fn equal_instant_different_offset_compares_equal() {
        let a = OffsetDateTime::new(2023, 6, 1, 12, 0, 0, 0, 3600).unwrap();
        let b = OffsetDateTime::new(2023, 6, 1, 8, 0, 0, 0, 0).unwrap();
        assert_eq!(a, b);
        assert!(!a.exact_eq(b));
    }

    #[test]
    fn replace_requires_ignore_dst() {
        let dt = OffsetDateTime::new(2023, 6, 1, 12, 0, 0, 0, 3600).unwrap();
        assert!(dt.replace(None, None, Some(7200), false).is_err());
        let replaced = dt.replace(None, None, Some(7200), true).unwrap();
        assert_eq!(replaced.offset().get(), 7200);
    }

    #[test]
    fn add_time_crosses_midnight() {
        let dt = OffsetDateTime::new(2023, 6, 1, 23, 0, 0, 0, 0).unwrap();
        let shifted = dt.checked_add_time(TimeDelta::from_hours(2).unwrap()).unwrap();
        assert_eq!(shifted.date(), Date::new(2023, 6, 2).unwrap());
        assert_eq!(shifted.time(), Time::new(1, 0, 0, 0).unwrap());
    }

    #[test]
    fn from_common_iso_round_trips() {
        let dt = OffsetDateTime::new(2023, 6, 1, 12, 0, 0, 0, 3600).unwrap();
        let parsed = OffsetDateTime::from_common_iso(&dt.format_common_iso()).unwrap();
        assert!(parsed.exact_eq(dt));
    }

    #[test]
    fn from_common_iso_rejects_zone_annotation() {
        assert!(OffsetDateTime::from_common_iso("2023-06-01T12:00:00+01:00[Europe/Paris]").is_err());
    }

    #[test]
    fn to_fixed_offset_preserves_instant() {
        let dt = OffsetDateTime::new(2023, 6, 1, 12, 0, 0, 0, 3600).unwrap();
        let shifted = dt.to_fixed_offset(Some(0)).unwrap();
        assert_eq!(dt.to_instant(), shifted.to_instant());
        assert_eq!(shifted.offset().get(), 0);
    }

    #[test]
    fn from_rfc3339_accepts_unknown_offset_marker_as_zero() {
        let dt = OffsetDateTime::from_rfc3339("2023-10-29T01:30:00-00:00").unwrap();
        assert_eq!(dt.offset().get(), 0);
    }

    #[test]
    fn from_rfc2822_rejects_unknown_zone_marker() {
        assert!(OffsetDateTime::from_rfc2822("29 Oct 2023 01:30:00 -0000").is_err());
    }
}
