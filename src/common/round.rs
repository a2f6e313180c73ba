//! Increment-and-mode rounding, shared by `Time`, `PlainDateTime`, and the
//! aware datetime wrappers.

pub use super::scalar::RoundMode;
use crate::error::{Error, Result};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Unit {
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
}

impl Unit {
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "nanosecond" => Unit::Nanosecond,
            "microsecond" => Unit::Microsecond,
            "millisecond" => Unit::Millisecond,
            "second" => Unit::Second,
            "minute" => Unit::Minute,
            "hour" => Unit::Hour,
            "day" => Unit::Day,
            _ => return None,
        })
    }

    pub const fn nanos(self) -> i128 {
        match self {
            Unit::Nanosecond => 1,
            Unit::Microsecond => 1_000,
            Unit::Millisecond => 1_000_000,
            Unit::Second => 1_000_000_000,
            Unit::Minute => 60 * 1_000_000_000,
            Unit::Hour => 3_600 * 1_000_000_000,
            Unit::Day => 86_400 * 1_000_000_000,
        }
    }

    /// Validates `increment` for this unit and returns the increment expressed
    /// in nanoseconds. `day` permits only increment 1.
    pub fn validate_increment(self, increment: i64) -> Result<i128> {
        if increment <= 0 || increment >= 1000 {
            return Err(Error::InvalidRoundingIncrement { increment });
        }
        let divides = |n: i64| n % increment == 0;
        let ok = match self {
            Unit::Nanosecond | Unit::Microsecond | Unit::Millisecond => divides(1_000),
            Unit::Second | Unit::Minute => divides(60),
            Unit::Hour => divides(24),
            Unit::Day => increment == 1,
        };
        if ok {
            Ok(increment as i128 * self.nanos())
        } else {
            Err(Error::InvalidRoundingIncrement { increment })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_must_divide_coarser_unit() {
        assert!(Unit::Minute.validate_increment(15).is_ok());
        assert!(Unit::Minute.validate_increment(7).is_err());
        assert!(Unit::Hour.validate_increment(24).is_ok());
        assert!(Unit::Hour.validate_increment(5).is_err());
        assert!(Unit::Day.validate_increment(1).is_ok());
        assert!(Unit::Day.validate_increment(2).is_err());
    }
}
