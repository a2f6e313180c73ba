//! A civil `(Date, Time)` paired with a [`Zone`] and the offset that zone
//! implies at that reading. The offset is cached at construction so ordinary
//! field access never re-consults the zone; arithmetic re-resolves it.

use crate::common::ambiguity::Disambiguate;
use crate::common::round::Unit;
use crate::common::scalar::{Offset, RoundMode};
use crate::date::Date;
use crate::delta::{DateDelta, DateTimeDelta, TimeDelta};
use crate::error::{Error, Result};
use crate::instant::Instant;
use crate::offset_datetime::OffsetDateTime;
use crate::parsing::parse_date_time_offset_zone;
use crate::time::Time;
use crate::zone::Zone;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone)]
pub struct ZonedDateTime {
    date: Date,
    time: Time,
    offset: Offset,
    zone: Zone,
}

impl ZonedDateTime {
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: u8,
        nanosecond: u32,
        zone: Zone,
        disambiguate: Disambiguate,
    ) -> Result<Self> {
        let date = Date::new(year, month, day)?;
        let time = Time::new(hour, minute, second, nanosecond)?;
        Self::from_date_time(date, time, zone, disambiguate)
    }

    #[cfg(feature = "sys")]
    pub fn now(zone: Zone) -> Self {
        Self::from_instant(Instant::now(), zone)
    }

    pub(crate) fn from_date_time(date: Date, time: Time, zone: Zone, disambiguate: Disambiguate) -> Result<Self> {
        let local_secs = date.to_unix_days().epoch_secs_at(time.total_seconds()).get();
        let ambiguity = zone.inner().ambiguity_for_local(local_secs);
        let resolved = ambiguity.resolve(disambiguate)?;

        if resolved.shifted {
            // The requested civil time fell in a gap: the caller's `disambiguate`
            // chose a side, which means the real instant lands on the other side
            // of the gap from what was asked for. Re-derive the civil fields from
            // that instant so `self.date`/`self.time` are internally consistent
            // with `self.offset`.
            #[cfg(feature = "log")]
            log::debug!(
                "civil time {date} {time} falls in a gap for {zone}, shifting per {disambiguate:?}"
            );
            let utc_secs = local_secs - resolved.offset.get() as i64;
            let instant = Instant::from_timestamp(utc_secs)?;
            let reprojected = Self::from_instant_with_offset(instant, time.nanosecond(), resolved.offset, zone);
            return Ok(reprojected);
        }
        Ok(Self {
            date,
            time,
            offset: resolved.offset,
            zone,
        })
    }

    fn from_instant_with_offset(instant: Instant, nanosecond: u32, offset: Offset, zone: Zone) -> Self {
        let shifted = instant
            .epoch_secs()
            .shift(offset.get() as i64)
            .unwrap_or(instant.epoch_secs());
        let date = Date::from_unix_days(shifted.as_unix_days());
        let time = Time::from_total_nanos_of_day(shifted.time_of_day_secs() as i128 * 1_000_000_000 + nanosecond as i128);
        Self { date, time, offset, zone }
    }

    pub(crate) fn from_instant(instant: Instant, zone: Zone) -> Self {
        let offset = zone.inner().offset_for_instant(instant.epoch_secs().get());
        Self::from_instant_with_offset(instant, instant.subsec_nanos(), offset, zone)
    }

    pub fn to_instant(self) -> Instant {
        let naive =
            Instant::from_date_time(self.date, self.time).expect("date and time were already validated");
        let offset_delta = TimeDelta::from_seconds(self.offset.get() as i64)
            .expect("offset magnitude is always well within TimeDelta range");
        naive
            .checked_sub(offset_delta)
            .expect("zoned datetime always maps to a representable instant")
    }

    pub const fn date(&self) -> Date {
        self.date
    }

    pub const fn time(&self) -> Time {
        self.time
    }

    pub const fn offset(&self) -> Offset {
        self.offset
    }

    pub fn zone_key(&self) -> Option<&str> {
        self.zone.key()
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    pub fn replace(self, date: Option<Date>, time: Option<Time>, disambiguate: Disambiguate) -> Result<Self> {
        Self::from_date_time(date.unwrap_or(self.date), time.unwrap_or(self.time), self.zone, disambiguate)
    }

    /// Pure calendar shift, followed by re-resolving ambiguity at the new civil
    /// reading (the shifted date/time may now fall in a different zone's gap or
    /// fold than the original did).
    pub fn checked_add_date(self, delta: DateDelta, disambiguate: Disambiguate) -> Result<Self> {
        let date = self.date.add_months(delta.months())?.add_days(delta.days())?;
        Self::from_date_time(date, self.time, self.zone, disambiguate)
    }

    /// Adds wall-clock duration via the instant it denotes, then reprojects
    /// through the zone: the result always lands on a real instant, and picks
    /// up whatever offset is in effect there, crossing DST transitions safely.
    pub fn checked_add_time(self, delta: TimeDelta) -> Result<Self> {
        let zone = self.zone.clone();
        let instant = self.to_instant().checked_add(delta)?;
        Ok(Self::from_instant(instant, zone))
    }

    pub fn checked_add_datetime(self, delta: DateTimeDelta, disambiguate: Disambiguate) -> Result<Self> {
        self.checked_add_date(delta.date_part(), disambiguate)?
            .checked_add_time(delta.time_part())
    }

    pub fn diff(self, other: Self) -> TimeDelta {
        self.to_instant().diff(other.to_instant())
    }

    pub fn round(self, unit: Unit, increment: i64, mode: RoundMode) -> Result<Self> {
        let zone = self.zone.clone();
        let instant = self.to_instant().round(unit, increment, mode)?;
        Ok(Self::from_instant(instant, zone))
    }

    /// Field-exact equality: same civil reading, offset, and zone — unlike
    /// `==`, which compares only the instant the two refer to.
    pub fn exact_eq(&self, other: &Self) -> bool {
        self.date == other.date && self.time == other.time && self.offset == other.offset && self.zone == other.zone
    }

    pub fn format_common_iso(&self) -> String {
        let zone_suffix = self
            .zone
            .key()
            .map(|k| format!("[{k}]"))
            .unwrap_or_default();
        format!("{}T{}{}{}", self.date, self.time.format_common_iso(), self.offset, zone_suffix)
    }

    /// Parses the common ISO 8601 profile, requiring a trailing `[zone-key]`.
    /// The parsed offset must be one the zone actually produces for that civil
    /// reading, or parsing fails with `InvalidOffsetForZone` (§8 scenario S4).
    pub fn from_common_iso(s: &str) -> Result<Self> {
        use crate::common::ambiguity::Ambiguity;

        let (date, time, offset, zone_key) = parse_date_time_offset_zone(s)?;
        let key = zone_key.ok_or_else(|| Error::InvalidFormat {
            what: "zoned datetime (missing zone annotation)",
            input: s.to_string(),
        })?;
        let zone = Zone::load(&key)?;
        let local_secs = date.to_unix_days().epoch_secs_at(time.total_seconds()).get();
        match zone.inner().ambiguity_for_local(local_secs) {
            Ambiguity::Unambiguous(off) if off == offset => {}
            Ambiguity::Fold(a, b) if offset == a || offset == b => {}
            _ => return Err(Error::InvalidOffsetForZone),
        }
        Ok(Self { date, time, offset, zone })
    }

    /// Converts to a fixed-offset reading at the zone's current offset, preserving the instant.
    pub fn to_fixed_offset(&self, offset_seconds: Option<i32>) -> Result<OffsetDateTime> {
        let offset = match offset_seconds {
            Some(s) => Offset::new(s).ok_or(Error::ValueOutOfRange {
                what: "offset_seconds",
                value: s as i64,
                min: Offset::MIN.get() as i64,
                max: Offset::MAX.get() as i64,
            })?,
            None => self.offset,
        };
        Ok(OffsetDateTime::from_instant(self.to_instant(), offset))
    }

    /// Reprojects into a different zone, preserving the instant.
    pub fn to_tz(&self, key: &str) -> Result<Self> {
        let zone = Zone::load(key)?;
        Ok(Self::from_instant(self.to_instant(), zone))
    }

    /// Reprojects into the host's current zone, preserving the instant.
    #[cfg(feature = "sys")]
    pub fn to_system_tz(&self) -> Result<crate::system_datetime::SystemDateTime> {
        crate::system_datetime::SystemDateTime::from_instant(self.to_instant())
    }
}

impl PartialEq for ZonedDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.to_instant() == other.to_instant()
    }
}

impl Eq for ZonedDateTime {}

impl PartialOrd for ZonedDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ZonedDateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_instant().cmp(&other.to_instant())
    }
}

impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_common_iso())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_zone_never_ambiguous() {
        let zone = Zone::fixed(3600).unwrap();
        let zdt = ZonedDateTime::new(2023, 6, 1, 12, 0, 0, 0, zone, Disambiguate::Raise).unwrap();
        assert_eq!(zdt.offset().get(), 3600);
    }

    #[test]
    fn instant_roundtrip_preserves_exact_fields() {
        let zone = Zone::fixed(-18000).unwrap();
        let zdt = ZonedDateTime::new(2023, 6, 1, 12, 0, 0, 0, zone, Disambiguate::Raise).unwrap();
        let reprojected = ZonedDateTime::from_instant(zdt.to_instant(), zdt.zone().clone());
        assert!(reprojected.exact_eq(&zdt));
    }

    #[test]
    fn equal_instant_different_zone_compares_equal() {
        let a = ZonedDateTime::new(2023, 6, 1, 12, 0, 0, 0, Zone::fixed(3600).unwrap(), Disambiguate::Raise).unwrap();
        let b = ZonedDateTime::new(2023, 6, 1, 8, 0, 0, 0, Zone::fixed(0).unwrap(), Disambiguate::Raise).unwrap();
        assert_eq!(a, b);
        assert!(!a.exact_eq(&b));
    }

    #[test]
    fn add_time_crosses_midnight() {
        let zone = Zone::fixed(0).unwrap();
        let zdt = ZonedDateTime::new(2023, 6, 1, 23, 0, 0, 0, zone, Disambiguate::Raise).unwrap();
        let shifted = zdt.checked_add_time(TimeDelta::from_hours(2).unwrap()).unwrap();
        assert_eq!(shifted.date(), Date::new(2023, 6, 2).unwrap());
        assert_eq!(shifted.time(), Time::new(1, 0, 0, 0).unwrap());
    }

    #[test]
    fn to_fixed_offset_preserves_instant() {
        let zone = Zone::fixed(3600).unwrap();
        let zdt = ZonedDateTime::new(2023, 6, 1, 12, 0, 0, 0, zone, Disambiguate::Raise).unwrap();
        let fixed = zdt.to_fixed_offset(Some(0)).unwrap();
        assert_eq!(zdt.to_instant(), fixed.to_instant());
        assert_eq!(fixed.offset().get(), 0);
    }

    #[test]
    fn to_tz_rejects_an_unresolvable_key() {
        let zone = Zone::fixed(3600).unwrap();
        let zdt = ZonedDateTime::new(2023, 6, 1, 12, 0, 0, 0, zone, Disambiguate::Raise).unwrap();
        assert!(zdt.to_tz("Not/A_Real_Zone").is_err());
    }

    #[test]
    fn from_common_iso_requires_zone_annotation() {
        assert!(ZonedDateTime::from_common_iso("2023-06-01T12:00:00+01:00").is_err());
    }
}
