//! A civil `(Date, Time)` pair with no offset or zone: a "naive" local reading.

use crate::common::round::Unit;
use crate::common::scalar::RoundMode;
use crate::date::Date;
use crate::delta::{DateDelta, DateTimeDelta, TimeDelta};
use crate::error::{Error, Result};
use crate::parsing::parse_plain_datetime;
use crate::time::Time;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlainDateTime {
    date: Date,
    time: Time,
}

impl PlainDateTime {
    pub fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8, nanosecond: u32) -> Result<Self> {
        Ok(Self {
            date: Date::new(year, month, day)?,
            time: Time::new(hour, minute, second, nanosecond)?,
        })
    }

    pub(crate) fn from_parts(date: Date, time: Time) -> Self {
        Self { date, time }
    }

    pub const fn date(self) -> Date {
        self.date
    }

    pub const fn time(self) -> Time {
        self.time
    }

    pub fn replace_date(self, date: Date) -> Self {
        Self { date, ..self }
    }

    pub fn replace_time(self, time: Time) -> Self {
        Self { time, ..self }
    }

    /// Pure calendar shift: never ambiguous, since there is no zone to consult.
    pub fn checked_add_date(self, delta: DateDelta) -> Result<Self> {
        let date = self.date.add_months(delta.months())?.add_days(delta.days())?;
        Ok(Self { date, ..self })
    }

    /// Requires `ignore_dst = true`: a naive value has no zone, so this is purely
    /// nominal clock arithmetic, but the gate keeps the call site visibly distinct
    /// from the zone-aware operation with the same shape.
    pub fn checked_add_time(self, delta: TimeDelta, ignore_dst: bool) -> Result<Self> {
        if !ignore_dst {
            return Err(Error::ImplicitlyIgnoringDST {
                operation: "PlainDateTime::checked_add_time",
            });
        }
        let total = self.time.total_nanos() + delta.total_nanos();
        let day_shift = total.div_euclid(crate::common::scalar::NS_PER_DAY);
        let nanos_in_day = total.rem_euclid(crate::common::scalar::NS_PER_DAY);
        let date = self.date.add_days(day_shift as i32)?;
        Ok(Self {
            date,
            time: Time::from_total_nanos_of_day(nanos_in_day),
        })
    }

    pub fn checked_add_datetime(self, delta: DateTimeDelta, ignore_dst: bool) -> Result<Self> {
        if !delta.time_part().is_zero() && !ignore_dst {
            return Err(Error::ImplicitlyIgnoringDST {
                operation: "PlainDateTime::checked_add_datetime",
            });
        }
        self.checked_add_date(delta.date_part())?
            .checked_add_time(delta.time_part(), true)
    }

    pub fn round(self, unit: Unit, increment: i64, mode: RoundMode) -> Result<Self> {
        let (time, day_carry) = self.time.round(unit, increment, mode)?;
        let date = if day_carry != 0 {
            self.date.add_days(day_carry as i32)?
        } else {
            self.date
        };
        Ok(Self { date, time })
    }

    pub fn format_common_iso(self) -> String {
        format!("{}T{}", self.date, self.time.format_common_iso())
    }

    /// Parses the common ISO 8601 profile. An offset or zone annotation, if
    /// present, is rejected: a naive value carries neither.
    pub fn from_common_iso(s: &str) -> Result<Self> {
        parse_plain_datetime(s)
    }
}

impl fmt::Display for PlainDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_common_iso())
    }
}
