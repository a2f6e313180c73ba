//! Proleptic Gregorian calendar date.

use crate::common::scalar::{Month, UnixDays, Weekday, Year};
use crate::delta::DateDelta;
use crate::error::{Error, Result};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    year: Year,
    month: Month,
    day: u8,
}

impl Date {
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self> {
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
        let max_day = year.days_in_month(month);
        if day < 1 || day > max_day {
            return Err(Error::ValueOutOfRange {
                what: "day",
                value: day as i64,
                min: 1,
                max: max_day as i64,
            });
        }
        Ok(Self { year, month, day })
    }

    pub const fn year(self) -> i32 {
        self.year.get()
    }

    pub const fn month(self) -> u8 {
        self.month.number()
    }

    pub const fn day(self) -> u8 {
        self.day
    }

    pub fn weekday(self) -> Weekday {
        self.to_unix_days().day_of_week()
    }

    pub fn is_leap_year(self) -> bool {
        self.year.is_leap()
    }

    pub fn days_in_month(self) -> u8 {
        self.year.days_in_month(self.month)
    }

    /// 1-based day of the year.
    pub fn ordinal_day(self) -> u16 {
        self.year.days_before_month(self.month) + self.day as u16
    }

    pub fn from_ordinal(year: i32, ordinal: u16) -> Result<Self> {
        let y = Year::new(year).ok_or(Error::ValueOutOfRange {
            what: "year",
            value: year as i64,
            min: Year::MIN as i64,
            max: Year::MAX as i64,
        })?;
        if ordinal < 1 || ordinal > y.days_in_year() {
            return Err(Error::ValueOutOfRange {
                what: "ordinal_day",
                value: ordinal as i64,
                min: 1,
                max: y.days_in_year() as i64,
            });
        }
        let mut month = Month::January;
        for m in 1..=12u8 {
            let candidate = Month::from_number(m).unwrap();
            if y.days_before_month(candidate) + 1 > ordinal {
                break;
            }
            month = candidate;
        }
        let day = (ordinal - y.days_before_month(month)) as u8;
        Ok(Self { year: y, month, day })
    }

    pub(crate) fn to_unix_days(self) -> UnixDays {
        UnixDays::from_ymd(self.year, self.month, self.day)
    }

    pub(crate) fn from_unix_days(days: UnixDays) -> Self {
        let (year, month, day) = days.date();
        Self { year, month, day }
    }

    /// Month-saturating replace: if a target month has fewer days than `self.day`,
    /// clamp to the last valid day of that month.
    pub fn replace_year(self, year: i32) -> Result<Self> {
        let y = Year::new(year).ok_or(Error::ValueOutOfRange {
            what: "year",
            value: year as i64,
            min: Year::MIN as i64,
            max: Year::MAX as i64,
        })?;
        let day = self.day.min(y.days_in_month(self.month));
        Ok(Self { year: y, month: self.month, day })
    }

    pub fn replace_month(self, month: u8) -> Result<Self> {
        let m = Month::from_number(month).ok_or(Error::ValueOutOfRange {
            what: "month",
            value: month as i64,
            min: 1,
            max: 12,
        })?;
        let day = self.day.min(self.year.days_in_month(m));
        Ok(Self { year: self.year, month: m, day })
    }

    pub fn replace_day(self, day: u8) -> Result<Self> {
        Self::new(self.year(), self.month(), day)
    }

    pub fn add_days(self, days: i32) -> Result<Self> {
        let shifted = self
            .to_unix_days()
            .shift(days)
            .ok_or(Error::ValueOutOfRange {
                what: "date",
                value: days as i64,
                min: UnixDays::MIN.get() as i64,
                max: UnixDays::MAX.get() as i64,
            })?;
        Ok(Self::from_unix_days(shifted))
    }

    /// Add calendar months, saturating the day-of-month if it overflows the target month.
    pub fn add_months(self, months: i32) -> Result<Self> {
        let total = self.year() as i64 * 12 + (self.month() as i64 - 1) + months as i64;
        let year = total.div_euclid(12) as i32;
        let month = (total.rem_euclid(12) + 1) as u8;
        self.replace_year(year)?.replace_month(month)
    }

    /// `self - other`, per §4.1: month-first with a residual-day tie-break so that
    /// `other + (self - other) == self` always holds.
    pub fn diff(self, other: Self) -> DateDelta {
        let sign = match self.to_unix_days().get().cmp(&other.to_unix_days().get()) {
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Greater => 1,
            std::cmp::Ordering::Equal => return DateDelta::ZERO,
        };
        let mut months =
            (self.year() as i64 - other.year() as i64) * 12 + (self.month() as i64 - other.month() as i64);
        // Shift `other` by `months`; if that overshoots past `self`, back off by one month.
        let mut shifted = other.add_months(months as i32).unwrap_or(other);
        if sign > 0 && shifted.to_unix_days().get() > self.to_unix_days().get() {
            months -= 1;
            shifted = other.add_months(months as i32).unwrap_or(other);
        } else if sign < 0 && shifted.to_unix_days().get() < self.to_unix_days().get() {
            months += 1;
            shifted = other.add_months(months as i32).unwrap_or(other);
        }
        let days = self.to_unix_days().get() - shifted.to_unix_days().get();
        DateDelta::new_unchecked(months as i32, days)
    }

}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_saturating_replace() {
        let d = Date::new(2021, 1, 31).unwrap();
        let replaced = d.replace_month(2).unwrap();
        assert_eq!(replaced, Date::new(2021, 2, 28).unwrap());
    }

    #[test]
    fn date_diff_inverse_identity() {
        let cases = [
            (Date::new(2021, 3, 31).unwrap(), Date::new(2021, 1, 31).unwrap()),
            (Date::new(2020, 2, 29).unwrap(), Date::new(2019, 2, 28).unwrap()),
            (Date::new(2023, 10, 29).unwrap(), Date::new(2023, 3, 26).unwrap()),
        ];
        for (a, b) in cases {
            let delta = a.diff(b);
            let reconstructed = b.add_months(delta.months()).unwrap().add_days(delta.days()).unwrap();
            assert_eq!(reconstructed, a, "b + (a - b) should equal a for {a} - {b}");
        }
    }

    #[test]
    fn ordinal_day_roundtrip() {
        let d = Date::new(2023, 3, 1).unwrap();
        let ord = d.ordinal_day();
        assert_eq!(Date::from_ordinal(2023, ord).unwrap(), d);
    }

    #[test]
    fn rejects_invalid_day() {
        assert!(Date::new(2021, 2, 29).is_err());
        assert!(Date::new(2020, 2, 29).is_ok());
    }
}
