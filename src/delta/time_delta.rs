use crate::common::scalar::RoundMode;
use crate::error::{Error, Result};
use std::fmt;

/// Bound so a `TimeDelta` composes safely with the `Instant` range:
/// ±9999 years · 366 days · 86_400 s · 10^9 ns.
const MAX_NANOS: i128 = 9999 * 366 * 86_400 * 1_000_000_000;

/// A signed duration, stored as a single 128-bit nanosecond count. Every
/// time unit (hours, minutes, seconds, milliseconds, microseconds,
/// nanoseconds) normalizes into this one field on construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeDelta(i128);

impl TimeDelta {
    pub const ZERO: Self = Self(0);

    pub fn from_nanos(nanos: i128) -> Result<Self> {
        if nanos.unsigned_abs() > MAX_NANOS as u128 {
            return Err(Error::ValueOutOfRange {
                what: "total_nanoseconds",
                value: 0,
                min: -(MAX_NANOS as i64),
                max: MAX_NANOS as i64,
            });
        }
        Ok(Self(nanos))
    }

    pub(crate) fn from_nanos_unchecked(nanos: i128) -> Self {
        Self(nanos)
    }

    pub fn from_hours(h: i64) -> Result<Self> {
        Self::from_nanos(h as i128 * 3_600_000_000_000)
    }

    pub fn from_minutes(m: i64) -> Result<Self> {
        Self::from_nanos(m as i128 * 60_000_000_000)
    }

    pub fn from_seconds(s: i64) -> Result<Self> {
        Self::from_nanos(s as i128 * 1_000_000_000)
    }

    pub fn from_millis(ms: i64) -> Result<Self> {
        Self::from_nanos(ms as i128 * 1_000_000)
    }

    pub fn from_micros(us: i64) -> Result<Self> {
        Self::from_nanos(us as i128 * 1_000)
    }

    pub const fn total_nanos(self) -> i128 {
        self.0
    }

    pub fn total_seconds_f64(self) -> f64 {
        self.0 as f64 / 1e9
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Result<Self> {
        Self::from_nanos(self.0 + other.0)
    }

    pub fn checked_sub(self, other: Self) -> Result<Self> {
        Self::from_nanos(self.0 - other.0)
    }

    pub fn checked_neg(self) -> Result<Self> {
        Self::from_nanos(-self.0)
    }

    pub fn checked_mul_i64(self, factor: i64) -> Result<Self> {
        Self::from_nanos(self.0 * factor as i128)
    }

    /// Float multiplication truncates to whole nanoseconds, per §4.2.
    pub fn checked_mul_f64(self, factor: f64) -> Result<Self> {
        let nanos = (self.0 as f64 * factor).trunc();
        if !nanos.is_finite() {
            return Err(Error::ValueOutOfRange {
                what: "total_nanoseconds",
                value: 0,
                min: -(MAX_NANOS as i64),
                max: MAX_NANOS as i64,
            });
        }
        Self::from_nanos(nanos as i128)
    }

    pub fn checked_div_i64(self, divisor: i64) -> Result<Self> {
        if divisor == 0 {
            return Err(Error::DivisionByZero);
        }
        Self::from_nanos(self.0 / divisor as i128)
    }

    pub fn checked_div_f64(self, divisor: f64) -> Result<Self> {
        if divisor == 0.0 {
            return Err(Error::DivisionByZero);
        }
        let nanos = (self.0 as f64 / divisor).trunc();
        Self::from_nanos(nanos as i128)
    }

    /// Division by another `TimeDelta` yields a dimensionless float ratio.
    pub fn checked_div_delta(self, other: Self) -> Result<f64> {
        if other.0 == 0 {
            return Err(Error::DivisionByZero);
        }
        Ok(self.0 as f64 / other.0 as f64)
    }

    pub fn round(self, mode: RoundMode, increment_nanos: i128) -> Self {
        let sign = if self.0 < 0 { -1 } else { 1 };
        let rounded = mode.round_nonneg(self.0.abs(), increment_nanos);
        Self(rounded * sign as i128)
    }

    /// Format using the "common" ISO 8601 duration profile (time part only),
    /// e.g. `PT5H6M7.000008S`, canonical zero `PT0S`.
    pub fn format_common_iso(self) -> String {
        if self.is_zero() {
            return "PT0S".to_string();
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        let total = self.0.unsigned_abs();
        let hours = total / 3_600_000_000_000;
        let rem = total % 3_600_000_000_000;
        let minutes = rem / 60_000_000_000;
        let rem = rem % 60_000_000_000;
        let seconds = rem / 1_000_000_000;
        let nanos = rem % 1_000_000_000;
        let mut s = format!("{sign}PT");
        if hours != 0 {
            s.push_str(&format!("{hours}H"));
        }
        if minutes != 0 {
            s.push_str(&format!("{minutes}M"));
        }
        if seconds != 0 || nanos != 0 || (hours == 0 && minutes == 0) {
            if nanos != 0 {
                let mut frac = format!("{nanos:09}");
                while frac.ends_with('0') {
                    frac.pop();
                }
                s.push_str(&format!("{seconds}.{frac}S"));
            } else {
                s.push_str(&format!("{seconds}S"));
            }
        }
        s
    }
}

impl std::ops::Add for TimeDelta {
    type Output = Result<Self>;
    fn add(self, rhs: Self) -> Result<Self> {
        self.checked_add(rhs)
    }
}

impl fmt::Display for TimeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_common_iso())
    }
}
