//! Civil time-of-day, no leap seconds, no zone.

use crate::common::scalar::{RoundMode, SubSecNanos};
use crate::common::round::Unit;
use crate::error::{Error, Result};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time {
    hour: u8,
    minute: u8,
    second: u8,
    nanosecond: SubSecNanos,
}

impl Time {
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
        nanosecond: SubSecNanos::MIN,
    };

    pub fn new(hour: u8, minute: u8, second: u8, nanosecond: u32) -> Result<Self> {
        if hour > 23 {
            return Err(Error::ValueOutOfRange { what: "hour", value: hour as i64, min: 0, max: 23 });
        }
        if minute > 59 {
            return Err(Error::ValueOutOfRange { what: "minute", value: minute as i64, min: 0, max: 59 });
        }
        if second > 59 {
            return Err(Error::ValueOutOfRange { what: "second", value: second as i64, min: 0, max: 59 });
        }
        let nanosecond = SubSecNanos::new(nanosecond).ok_or(Error::ValueOutOfRange {
            what: "nanosecond",
            value: nanosecond as i64,
            min: 0,
            max: 999_999_999,
        })?;
        Ok(Self { hour, minute, second, nanosecond })
    }

    pub const fn hour(self) -> u8 {
        self.hour
    }

    pub const fn minute(self) -> u8 {
        self.minute
    }

    pub const fn second(self) -> u8 {
        self.second
    }

    pub const fn nanosecond(self) -> u32 {
        self.nanosecond.get()
    }

    /// Seconds since midnight, in `0..86_400`.
    pub fn total_seconds(self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    /// Nanoseconds since midnight, in `0..86_400_000_000_000`.
    pub fn total_nanos(self) -> i128 {
        self.total_seconds() as i128 * 1_000_000_000 + self.nanosecond() as i128
    }

    pub fn from_total_nanos_of_day(nanos: i128) -> Self {
        debug_assert!((0..86_400_000_000_000).contains(&nanos));
        let secs = (nanos / 1_000_000_000) as u32;
        let ns = (nanos % 1_000_000_000) as u32;
        Self {
            hour: (secs / 3600) as u8,
            minute: ((secs / 60) % 60) as u8,
            second: (secs % 60) as u8,
            nanosecond: SubSecNanos::new_unchecked(ns as i32),
        }
    }

    /// Round to the nearest multiple of `increment` units of `unit`, wrapping at
    /// the day boundary. Returns the rounded time plus whether the day wrapped
    /// (and in which direction: +1 for past midnight forward, -1 backward —
    /// though backward wrap cannot occur since all inputs are non-negative).
    pub fn round(self, unit: Unit, increment: i64, mode: RoundMode) -> Result<(Self, i64)> {
        let increment_nanos = unit.validate_increment(increment)?;
        let nanos = self.total_nanos();
        let rounded = mode.round_nonneg(nanos, increment_nanos);
        let day_nanos = crate::common::scalar::NS_PER_DAY;
        if rounded >= day_nanos {
            Ok((Self::from_total_nanos_of_day(rounded - day_nanos), 1))
        } else {
            Ok((Self::from_total_nanos_of_day(rounded), 0))
        }
    }

    pub fn format_common_iso(self) -> String {
        format!(
            "{:02}:{:02}:{:02}{}",
            self.hour, self.minute, self.second, self.nanosecond
        )
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_common_iso())
    }
}
