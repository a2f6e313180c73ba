//! A calendar year and month, with no day component.

use crate::common::scalar::{Month, Year};
use crate::date::Date;
use crate::error::{Error, Result};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: Year,
    month: Month,
}

impl YearMonth {
    pub fn new(year: i32, month: u8) -> Result<Self> {
        let year = Year::new(year).ok_or(Error::ValueOutOfRange {
            what: "year",
            value: year as i64,
            min: Year::MIN as i64,
            max: Year::MAX as i64,
        })?;
        let month = Month::from_number(month).ok_or(Error::ValueOutOfRange {
            what: "month",
            value: month as i64,
            min: 1,
            max: 12,
        })?;
        Ok(Self { year, month })
    }

    pub(crate) fn from_date(date: Date) -> Self {
        Self::new(date.year(), date.month()).expect("a valid Date always has a valid year/month")
    }

    pub const fn year(self) -> i32 {
        self.year.get()
    }

    pub const fn month(self) -> u8 {
        self.month.number()
    }

    pub fn days_in_month(self) -> u8 {
        self.year.days_in_month(self.month)
    }

    pub fn is_leap_year(self) -> bool {
        self.year.is_leap()
    }

    /// The first day of this month, as a full [`Date`].
    pub fn on_day(self, day: u8) -> Result<Date> {
        Date::new(self.year(), self.month(), day)
    }

    pub fn checked_add_months(self, months: i32) -> Result<Self> {
        let total = self.year() as i64 * 12 + (self.month() as i64 - 1) + months as i64;
        let year = total.div_euclid(12) as i32;
        let month = (total.rem_euclid(12) + 1) as u8;
        Self::new(year, month)
    }

    pub fn format_common_iso(self) -> String {
        format!("{:04}-{:02}", self.year(), self.month())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_common_iso())
    }
}
