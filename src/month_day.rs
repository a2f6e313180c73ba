//! A calendar month and day, with no year. Internally validated against a
//! fixed reference leap year so `--02-29` is representable on its own.

use crate::common::scalar::{Month, Year};
use crate::date::Date;
use crate::error::{Error, Result};
use std::fmt;

/// Any leap year works as the validation reference; `4` is simply the first one.
const REFERENCE_LEAP_YEAR: i32 = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: Month,
    day: u8,
}

impl MonthDay {
    pub fn new(month: u8, day: u8) -> Result<Self> {
        let month = Month::from_number(month).ok_or(Error::ValueOutOfRange {
            what: "month",
            value: month as i64,
            min: 1,
            max: 12,
        })?;
        let reference = Year::new(REFERENCE_LEAP_YEAR).expect("reference leap year is in range");
        let max_day = reference.days_in_month(month);
        if day < 1 || day > max_day {
            return Err(Error::ValueOutOfRange {
                what: "day",
                value: day as i64,
                min: 1,
                max: max_day as i64,
            });
        }
        Ok(Self { month, day })
    }

    pub(crate) fn from_date(date: Date) -> Self {
        Self::new(date.month(), date.day()).expect("a valid Date always has a valid month/day")
    }

    pub const fn month(self) -> u8 {
        self.month.number()
    }

    pub const fn day(self) -> u8 {
        self.day
    }

    /// Whether this `--02-29` needs a leap year to exist as a concrete date.
    pub fn is_leap_day(self) -> bool {
        self.month() == 2 && self.day == 29
    }

    /// Anchors this month/day onto a concrete year, producing a full [`Date`].
    /// Fails for `--02-29` paired with a non-leap year: there is no such date
    /// to constrain to, and silently shifting to Feb 28 or Mar 1 would be a
    /// surprising substitution for the caller to discover later.
    pub fn on_year(self, year: i32) -> Result<Date> {
        Date::new(year, self.month(), self.day)
    }

    pub fn format_common_iso(self) -> String {
        format!("--{:02}-{:02}", self.month(), self.day)
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_common_iso())
    }
}
