//! A point on the UTC timeline, independent of any civil calendar or zone.

use crate::common::round::Unit;
use crate::common::scalar::{EpochSecs, RoundMode, SubSecNanos, UnixDays};
use crate::date::Date;
use crate::delta::TimeDelta;
use crate::error::{Error, Result};
use crate::time::Time;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Instant {
    secs: EpochSecs,
    subsec: SubSecNanos,
}

impl Instant {
    pub const MIN: Self = Self {
        secs: EpochSecs::MIN,
        subsec: SubSecNanos::MIN,
    };
    pub const MAX: Self = Self {
        secs: EpochSecs::MAX,
        subsec: SubSecNanos::MAX,
    };

    pub fn from_utc(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8, nanosecond: u32) -> Result<Self> {
        let date = Date::new(year, month, day)?;
        let time = Time::new(hour, minute, second, nanosecond)?;
        Self::from_date_time(date, time)
    }

    pub(crate) fn from_date_time(date: Date, time: Time) -> Result<Self> {
        let secs = date.to_unix_days().epoch_secs_at(time.total_seconds());
        Ok(Self {
            secs,
            subsec: SubSecNanos::new_unchecked(time.nanosecond() as i32),
        })
    }

    pub fn from_timestamp(secs: i64) -> Result<Self> {
        let secs = EpochSecs::new(secs).ok_or(Error::ValueOutOfRange {
            what: "timestamp",
            value: secs,
            min: EpochSecs::MIN.get(),
            max: EpochSecs::MAX.get(),
        })?;
        Ok(Self { secs, subsec: SubSecNanos::MIN })
    }

    pub fn from_timestamp_millis(ms: i64) -> Result<Self> {
        let secs = ms.div_euclid(1000);
        let rem_ms = ms.rem_euclid(1000);
        let secs = EpochSecs::new(secs).ok_or(Error::ValueOutOfRange {
            what: "timestamp_millis",
            value: ms,
            min: EpochSecs::MIN.get() * 1000,
            max: EpochSecs::MAX.get() * 1000,
        })?;
        Ok(Self {
            secs,
            subsec: SubSecNanos::new_unchecked(rem_ms as i32 * 1_000_000),
        })
    }

    pub fn from_timestamp_nanos(nanos: i128) -> Result<Self> {
        let whole_secs = nanos.div_euclid(1_000_000_000);
        let rem_ns = nanos.rem_euclid(1_000_000_000);
        if whole_secs < EpochSecs::MIN.get() as i128 || whole_secs > EpochSecs::MAX.get() as i128 {
            let clamped = whole_secs.clamp(EpochSecs::MIN.get() as i128, EpochSecs::MAX.get() as i128) as i64;
            return Err(Error::ValueOutOfRange {
                what: "timestamp_nanos",
                value: clamped,
                min: EpochSecs::MIN.get(),
                max: EpochSecs::MAX.get(),
            });
        }
        let secs = EpochSecs::new_unchecked(whole_secs as i64);
        Ok(Self {
            secs,
            subsec: SubSecNanos::new_unchecked(rem_ns as i32),
        })
    }

    #[cfg(feature = "sys")]
    pub fn now() -> Self {
        let nanos = crate::tz::system::now_epoch_nanos();
        Self::from_timestamp_nanos(nanos).unwrap_or(Self::MAX)
    }

    pub const fn timestamp(self) -> i64 {
        self.secs.get()
    }

    pub fn timestamp_millis(self) -> i64 {
        self.secs.get() * 1000 + (self.subsec.get() / 1_000_000) as i64
    }

    pub fn timestamp_nanos(self) -> i128 {
        self.secs.get() as i128 * 1_000_000_000 + self.subsec.get() as i128
    }

    pub const fn subsec_nanos(self) -> u32 {
        self.subsec.get()
    }

    pub(crate) fn to_date_time(self) -> (Date, Time) {
        let date = Date::from_unix_days(self.secs.as_unix_days());
        let time = Time::from_total_nanos_of_day(
            self.secs.time_of_day_secs() as i128 * 1_000_000_000 + self.subsec.get() as i128,
        );
        (date, time)
    }

    pub(crate) fn epoch_secs(self) -> EpochSecs {
        self.secs
    }

    pub fn checked_add(self, delta: TimeDelta) -> Result<Self> {
        let total = self.timestamp_nanos() + delta.total_nanos();
        Self::from_timestamp_nanos(total)
    }

    pub fn checked_sub(self, delta: TimeDelta) -> Result<Self> {
        let total = self.timestamp_nanos() - delta.total_nanos();
        Self::from_timestamp_nanos(total)
    }

    pub fn diff(self, other: Self) -> TimeDelta {
        TimeDelta::from_nanos(self.timestamp_nanos() - other.timestamp_nanos())
            .expect("difference of two in-range instants always fits")
    }

    pub fn round(self, unit: Unit, increment: i64, mode: RoundMode) -> Result<Self> {
        if matches!(unit, Unit::Day) {
            let increment_nanos = unit.validate_increment(increment)?;
            let days = self.secs.as_unix_days().get() as i128;
            let nanos_in_day = self.secs.time_of_day_secs() as i128 * 1_000_000_000 + self.subsec.get() as i128;
            let rounded = mode.round_nonneg(nanos_in_day, increment_nanos);
            let extra_days = rounded / crate::common::scalar::NS_PER_DAY;
            let total = (days + extra_days) * crate::common::scalar::NS_PER_DAY;
            return Self::from_timestamp_nanos(total);
        }
        let increment_nanos = unit.validate_increment(increment)?;
        let nanos = self.timestamp_nanos();
        let sign = if nanos < 0 { -1 } else { 1 };
        let rounded = mode.round_nonneg(nanos.abs(), increment_nanos) * sign as i128;
        Self::from_timestamp_nanos(rounded)
    }

    pub fn format_common_iso(self) -> String {
        let (date, time) = self.to_date_time();
        format!("{date}T{}Z", time.format_common_iso())
    }

    /// Parses the common ISO 8601 profile. A `[zone]` annotation is rejected:
    /// an instant is a single point on the UTC timeline, with no zone to record.
    pub fn from_common_iso(s: &str) -> Result<Self> {
        let (date, time, offset, zone_key) = crate::parsing::parse_date_time_offset_zone(s)?;
        if zone_key.is_some() {
            return Err(Error::InvalidFormat { what: "instant (unexpected zone annotation)", input: s.to_string() });
        }
        let dt = crate::offset_datetime::OffsetDateTime::new(
            date.year(),
            date.month(),
            date.day(),
            time.hour(),
            time.minute(),
            time.second(),
            time.nanosecond(),
            offset.get(),
        )?;
        Ok(dt.to_instant())
    }

    /// Parses RFC 3339, rejecting the `-00:00` "offset unknown" marker: an
    /// instant is only well-defined when the offset used to derive it is known.
    pub fn from_rfc3339(s: &str) -> Result<Self> {
        crate::parsing::parse_rfc3339_instant(s)
    }

    /// Parses RFC 2822, mapping `-0000` ("zone unknown") to plain UTC.
    pub fn from_rfc2822(s: &str) -> Result<Self> {
        crate::parsing::parse_rfc2822_instant(s)
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_common_iso())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_roundtrip() {
        let i = Instant::from_timestamp(1_700_000_000).unwrap();
        assert_eq!(Instant::from_timestamp_nanos(i.timestamp_nanos()).unwrap(), i);
    }

    #[test]
    fn millis_roundtrip_with_fraction() {
        let i = Instant::from_timestamp_millis(1_700_000_000_123).unwrap();
        assert_eq!(i.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn from_utc_matches_epoch() {
        let i = Instant::from_utc(1970, 1, 1, 0, 0, 0, 0).unwrap();
        assert_eq!(i.timestamp(), 0);
    }

    #[test]
    fn diff_and_add_are_inverse() {
        let a = Instant::from_timestamp(1_000_000).unwrap();
        let b = Instant::from_timestamp(1_000_500).unwrap();
        let delta = b.diff(a);
        assert_eq!(a.checked_add(delta).unwrap(), b);
    }

    #[test]
    fn from_common_iso_round_trips() {
        let i = Instant::from_timestamp(1_700_000_000).unwrap();
        assert_eq!(Instant::from_common_iso(&i.format_common_iso()).unwrap(), i);
    }

    #[test]
    fn from_rfc3339_matches_common_iso() {
        let i = Instant::from_rfc3339("2023-11-14T22:13:20Z").unwrap();
        assert_eq!(i.timestamp(), 1_700_000_000);
    }

    #[test]
    fn from_rfc2822_maps_unknown_zone_to_utc() {
        let i = Instant::from_rfc2822("14 Nov 2023 22:13:20 -0000").unwrap();
        assert_eq!(i.timestamp(), 1_700_000_000);
    }

    #[test]
    fn format_is_iso_z() {
        let i = Instant::from_utc(2023, 10, 29, 1, 15, 30, 0).unwrap();
        assert_eq!(i.format_common_iso(), "2023-10-29T01:15:30Z");
    }
}
