use crate::error::{Error, Result};
use std::fmt;

const MAX_MONTHS: i32 = 9999 * 12;
const MAX_DAYS: i32 = 9999 * 366;

/// A calendar delta: whole months plus whole days. `months` and `days` must be
/// same-signed, or either may be zero — mixed-sign deltas are rejected at
/// construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DateDelta {
    months: i32,
    days: i32,
}

impl DateDelta {
    pub const ZERO: Self = Self { months: 0, days: 0 };

    /// Construct directly from months and days, validating sign-consistency and bounds.
    pub fn new(months: i32, days: i32) -> Result<Self> {
        if months != 0 && days != 0 && (months < 0) != (days < 0) {
            return Err(Error::MixedSignDelta);
        }
        if months.unsigned_abs() > MAX_MONTHS as u32 {
            return Err(Error::ValueOutOfRange {
                what: "months",
                value: months as i64,
                min: -(MAX_MONTHS as i64),
                max: MAX_MONTHS as i64,
            });
        }
        if days.unsigned_abs() > MAX_DAYS as u32 {
            return Err(Error::ValueOutOfRange {
                what: "days",
                value: days as i64,
                min: -(MAX_DAYS as i64),
                max: MAX_DAYS as i64,
            });
        }
        Ok(Self { months, days })
    }

    /// Used internally by [`crate::date::Date::diff`], which already guarantees
    /// sign-consistency and bounds by construction.
    pub(crate) fn new_unchecked(months: i32, days: i32) -> Self {
        Self { months, days }
    }

    /// Build from normalized components: `years` collapse into months (×12),
    /// `weeks` collapse into days (×7).
    pub fn from_parts(years: i32, months: i32, weeks: i32, days: i32) -> Result<Self> {
        let total_months = years
            .checked_mul(12)
            .and_then(|y| y.checked_add(months))
            .ok_or(Error::ValueOutOfRange {
                what: "months",
                value: months as i64,
                min: -(MAX_MONTHS as i64),
                max: MAX_MONTHS as i64,
            })?;
        let total_days = weeks
            .checked_mul(7)
            .and_then(|w| w.checked_add(days))
            .ok_or(Error::ValueOutOfRange {
                what: "days",
                value: days as i64,
                min: -(MAX_DAYS as i64),
                max: MAX_DAYS as i64,
            })?;
        Self::new(total_months, total_days)
    }

    pub const fn months(self) -> i32 {
        self.months
    }

    pub const fn days(self) -> i32 {
        self.days
    }

    pub const fn is_zero(self) -> bool {
        self.months == 0 && self.days == 0
    }

    pub fn checked_add(self, other: Self) -> Result<Self> {
        let months = self
            .months
            .checked_add(other.months)
            .ok_or(Error::ValueOutOfRange {
                what: "months",
                value: 0,
                min: -(MAX_MONTHS as i64),
                max: MAX_MONTHS as i64,
            })?;
        let days = self
            .days
            .checked_add(other.days)
            .ok_or(Error::ValueOutOfRange {
                what: "days",
                value: 0,
                min: -(MAX_DAYS as i64),
                max: MAX_DAYS as i64,
            })?;
        Self::new(months, days)
    }

    pub fn checked_neg(self) -> Result<Self> {
        Self::new(-self.months, -self.days)
    }

    /// Multiplication by an integer factor. Non-integer multiplication is not
    /// representable for a calendar delta and is rejected at the call site
    /// (there is no float overload).
    pub fn checked_mul(self, factor: i32) -> Result<Self> {
        let months = self.months.checked_mul(factor).ok_or(Error::ValueOutOfRange {
            what: "months",
            value: 0,
            min: -(MAX_MONTHS as i64),
            max: MAX_MONTHS as i64,
        })?;
        let days = self.days.checked_mul(factor).ok_or(Error::ValueOutOfRange {
            what: "days",
            value: 0,
            min: -(MAX_DAYS as i64),
            max: MAX_DAYS as i64,
        })?;
        Self::new(months, days)
    }

    /// Format using the "common" ISO 8601 duration profile (date part only),
    /// e.g. `P1Y2M3D`, canonical zero `P0D`.
    pub fn format_common_iso(self) -> String {
        if self.is_zero() {
            return "P0D".to_string();
        }
        let sign = if self.months < 0 || self.days < 0 { "-" } else { "" };
        let years = self.months.abs() / 12;
        let months = self.months.abs() % 12;
        let mut s = format!("{sign}P");
        if years != 0 {
            s.push_str(&format!("{years}Y"));
        }
        if months != 0 {
            s.push_str(&format!("{months}M"));
        }
        if self.days != 0 {
            s.push_str(&format!("{}D", self.days.abs()));
        }
        s
    }
}

impl fmt::Display for DateDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_common_iso())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mixed_sign() {
        assert!(DateDelta::new(1, -1).is_err());
        assert!(DateDelta::new(-1, 1).is_err());
        assert!(DateDelta::new(0, -1).is_ok());
        assert!(DateDelta::new(-1, 0).is_ok());
    }

    #[test]
    fn normalizes_years_and_weeks() {
        let d = DateDelta::from_parts(1, 2, 3, 4).unwrap();
        assert_eq!(d.months(), 14);
        assert_eq!(d.days(), 25);
    }

    #[test]
    fn format_common_iso_zero() {
        assert_eq!(DateDelta::ZERO.format_common_iso(), "P0D");
    }
}
