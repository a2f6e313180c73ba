//! A `(Date, Time, offset)` reading resolved against the host's current zone
//! at construction time. Like [`OffsetDateTime`], the value is stable: a later
//! change to the host's zone configuration does not affect an already-built
//! `SystemDateTime`, and all field-level operations are its exactly.

#![cfg(feature = "sys")]

use crate::common::ambiguity::Disambiguate;
use crate::common::round::Unit;
use crate::common::scalar::{Offset, RoundMode};
use crate::date::Date;
use crate::delta::{DateDelta, DateTimeDelta, TimeDelta};
use crate::error::Result;
use crate::instant::Instant;
use crate::offset_datetime::OffsetDateTime;
use crate::time::Time;
use crate::zone::Zone;
use crate::zoned_datetime::ZonedDateTime;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SystemDateTime(OffsetDateTime);

impl SystemDateTime {
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
        disambiguate: Disambiguate,
    ) -> Result<Self> {
        let date = Date::new(year, month, day)?;
        let time = Time::new(hour, minute, second, nanosecond)?;
        let zone = Zone::system()?;
        let zoned = ZonedDateTime::from_date_time(date, time, zone, disambiguate)?;
        Ok(Self(OffsetDateTime::from_parts(zoned.date(), zoned.time(), zoned.offset())))
    }

    pub fn now() -> Result<Self> {
        Self::from_instant(Instant::now())
    }

    pub(crate) fn from_instant(instant: Instant) -> Result<Self> {
        let zone = Zone::system()?;
        let zoned = ZonedDateTime::from_instant(instant, zone);
        Ok(Self(OffsetDateTime::from_parts(zoned.date(), zoned.time(), zoned.offset())))
    }

    /// Parses the common ISO 8601 profile. A trailing `[zone-key]` is rejected,
    /// matching [`OffsetDateTime::from_common_iso`]; the civil reading is then
    /// resolved against the host's current zone.
    pub fn from_common_iso(s: &str) -> Result<Self> {
        let offset_dt = OffsetDateTime::from_common_iso(s)?;
        Self::from_instant(offset_dt.to_instant())
    }

    /// Converts to a fixed-offset reading, preserving the instant.
    pub fn to_fixed_offset(self, offset_seconds: Option<i32>) -> Result<OffsetDateTime> {
        self.0.to_fixed_offset(offset_seconds)
    }

    /// Reprojects into a [`ZonedDateTime`] for the given zone, preserving the instant.
    pub fn to_tz(self, key: &str) -> Result<ZonedDateTime> {
        self.0.to_tz(key)
    }

    /// Re-resolves against the host's current zone (re-probing, not using the
    /// zone that was in effect when `self` was constructed).
    pub fn to_system_tz(self) -> Result<Self> {
        Self::from_instant(self.to_instant())
    }

    pub fn date(self) -> Date {
        self.0.date()
    }

    pub fn time(self) -> Time {
        self.0.time()
    }

    pub fn offset(self) -> Offset {
        self.0.offset()
    }

    pub fn to_instant(self) -> Instant {
        self.0.to_instant()
    }

    pub fn replace(
        self,
        date: Option<Date>,
        time: Option<Time>,
        offset_seconds: Option<i32>,
        ignore_dst: bool,
    ) -> Result<Self> {
        Ok(Self(self.0.replace(date, time, offset_seconds, ignore_dst)?))
    }

    pub fn checked_add_date(self, delta: DateDelta) -> Result<Self> {
        Ok(Self(self.0.checked_add_date(delta)?))
    }

    pub fn checked_add_time(self, delta: TimeDelta) -> Result<Self> {
        Ok(Self(self.0.checked_add_time(delta)?))
    }

    pub fn checked_add_datetime(self, delta: DateTimeDelta) -> Result<Self> {
        Ok(Self(self.0.checked_add_datetime(delta)?))
    }

    pub fn diff(self, other: Self) -> TimeDelta {
        self.0.diff(other.0)
    }

    pub fn round(self, unit: Unit, increment: i64, mode: RoundMode) -> Result<Self> {
        Ok(Self(self.0.round(unit, increment, mode)?))
    }

    pub fn exact_eq(self, other: Self) -> bool {
        self.0.exact_eq(other.0)
    }

    pub fn format_common_iso(self) -> String {
        self.0.format_common_iso()
    }
}

impl fmt::Display for SystemDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_resolves_against_system_zone() {
        let sdt = SystemDateTime::new(2023, 6, 1, 12, 0, 0, 0, Disambiguate::Raise);
        assert!(sdt.is_ok());
    }

    #[test]
    fn stable_after_construction() {
        let sdt = SystemDateTime::new(2023, 6, 1, 12, 0, 0, 0, Disambiguate::Compatible).unwrap();
        let shifted = sdt.checked_add_time(TimeDelta::from_hours(1).unwrap()).unwrap();
        assert_eq!(shifted.offset(), sdt.offset());
    }

    #[test]
    fn to_fixed_offset_preserves_instant() {
        let sdt = SystemDateTime::new(2023, 6, 1, 12, 0, 0, 0, Disambiguate::Compatible).unwrap();
        let fixed = sdt.to_fixed_offset(Some(0)).unwrap();
        assert_eq!(sdt.to_instant(), fixed.to_instant());
    }
}
