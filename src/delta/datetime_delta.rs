use super::{DateDelta, TimeDelta};
use crate::error::{Error, Result};
use std::fmt;

/// The composition of a [`DateDelta`] and a [`TimeDelta`]. The same
/// mixed-sign prohibition that applies within each part also applies across
/// the two parts: a positive `DateDelta` cannot be paired with a negative
/// `TimeDelta` (ignoring zero on either side).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct DateTimeDelta {
    date: DateDelta,
    time: TimeDelta,
}

impl DateTimeDelta {
    pub const ZERO: Self = Self {
        date: DateDelta::ZERO,
        time: TimeDelta::ZERO,
    };

    pub fn new(date: DateDelta, time: TimeDelta) -> Result<Self> {
        let date_sign = if date.months() < 0 || date.days() < 0 {
            -1
        } else if date.months() > 0 || date.days() > 0 {
            1
        } else {
            0
        };
        let time_sign = if time.total_nanos() > 0 {
            1
        } else if time.total_nanos() < 0 {
            -1
        } else {
            0
        };
        if date_sign != 0 && time_sign != 0 && date_sign != time_sign {
            return Err(Error::MixedSignDelta);
        }
        Ok(Self { date, time })
    }

    pub const fn date_part(self) -> DateDelta {
        self.date
    }

    pub const fn time_part(self) -> TimeDelta {
        self.time
    }

    pub const fn is_zero(self) -> bool {
        self.date.is_zero() && self.time.is_zero()
    }

    pub fn checked_add_time(self, delta: TimeDelta) -> Result<Self> {
        Self::new(self.date, self.time.checked_add(delta)?)
    }

    pub fn checked_add_date(self, delta: DateDelta) -> Result<Self> {
        Self::new(self.date.checked_add(delta)?, self.time)
    }

    pub fn format_common_iso(self) -> String {
        if self.is_zero() {
            return "P0D".to_string();
        }
        let date_part = self.date.format_common_iso();
        let time_part = self.time.format_common_iso();
        let date_body = date_part.trim_start_matches('-').trim_start_matches('P');
        let time_body = time_part.trim_start_matches('-').trim_start_matches("PT");
        let mut s = String::new();
        if date_part.starts_with('-') || (date_part == "P0D" && time_part.starts_with('-')) {
            s.push('-');
        }
        s.push('P');
        if !self.date.is_zero() {
            s.push_str(date_body);
        }
        if !self.time.is_zero() {
            s.push('T');
            s.push_str(time_body);
        }
        s
    }
}

impl fmt::Display for DateTimeDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_common_iso())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s6_iso_duration_parse_shape() {
        // P1Y2M3W4DT5H6M7.000008S -> months=14, days=25, nanos as below
        let date = DateDelta::from_parts(1, 2, 3, 4).unwrap();
        let time = TimeDelta::from_nanos(5 * 3_600_000_000_000 + 6 * 60_000_000_000 + 7_000_000_000 + 8_000)
            .unwrap();
        let dtd = DateTimeDelta::new(date, time).unwrap();
        assert_eq!(dtd.date_part().months(), 14);
        assert_eq!(dtd.date_part().days(), 25);
        assert_eq!(
            dtd.time_part().total_nanos(),
            5 * 3_600_000_000_000 + 6 * 60_000_000_000 + 7_000_000_000 + 8_000
        );
    }

    #[test]
    fn rejects_mixed_sign_across_parts() {
        let date = DateDelta::new(1, 0).unwrap();
        let time = TimeDelta::from_seconds(-1).unwrap();
        assert!(DateTimeDelta::new(date, time).is_err());
    }
}
