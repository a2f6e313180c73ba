//! The "common" ISO 8601 profile: extended (`2023-10-29T13:00:00+02:00`) or
//! basic (`20231029T130000+0200`) form, `T`/`t`/space separator, `Z` or a
//! numeric offset, 1-9 fractional digits with `.` or `,` as the radix point,
//! and an optional trailing `[Zone/Key]` suffix.

use crate::common::parse::Scan;
use crate::common::scalar::Offset;
use crate::date::Date;
use crate::delta::{DateDelta, DateTimeDelta, TimeDelta};
use crate::error::{Error, Result};
use crate::plain_datetime::PlainDateTime;
use crate::time::Time;

fn invalid(what: &'static str, input: &str) -> Error {
    Error::InvalidFormat { what, input: input.to_string() }
}

fn parse_date_inner(scan: &mut Scan) -> Option<Date> {
    let year = scan.exactly_n_digits(4)? as i32;
    let extended = scan.peek() == Some(b'-');
    if extended {
        scan.take_unchecked(1);
    }
    let month = scan.exactly_n_digits(2)? as u8;
    if extended {
        scan.expect(b'-')?;
    }
    let day = scan.exactly_n_digits(2)? as u8;
    Date::new(year, month, day).ok()
}

fn parse_time_inner(scan: &mut Scan) -> Option<Time> {
    let hour = scan.exactly_n_digits(2)? as u8;
    let extended = scan.peek() == Some(b':');
    if extended {
        scan.take_unchecked(1);
    }
    let minute = scan.exactly_n_digits(2)? as u8;
    if extended {
        scan.expect(b':')?;
    }
    let second = scan.exactly_n_digits(2)? as u8;
    let nanosecond = scan.subsec()?.get();
    Time::new(hour, minute, second, nanosecond).ok()
}

fn parse_offset_inner(scan: &mut Scan) -> Option<Offset> {
    match scan.peek()? {
        b'Z' | b'z' => {
            scan.take_unchecked(1);
            Some(Offset::ZERO)
        }
        b'+' | b'-' => {
            let negative = scan.take_unchecked(1)[0] == b'-';
            let hour = scan.exactly_n_digits(2)? as i32;
            let extended = scan.peek() == Some(b':');
            if extended {
                scan.take_unchecked(1);
            }
            let minute = if scan.peek().is_some_and(|b| b.is_ascii_digit()) {
                scan.exactly_n_digits(2)? as i32
            } else {
                0
            };
            let second = if extended && scan.peek() == Some(b':') {
                scan.take_unchecked(1);
                scan.exactly_n_digits(2)? as i32
            } else if !extended && scan.peek().is_some_and(|b| b.is_ascii_digit()) {
                scan.exactly_n_digits(2)? as i32
            } else {
                0
            };
            let total = hour * 3600 + minute * 60 + second;
            Offset::new(if negative { -total } else { total })
        }
        _ => None,
    }
}

pub fn parse_plain_date(s: &str) -> Result<Date> {
    let mut scan = Scan::new(s.as_bytes());
    scan.parse_all(parse_date_inner).ok_or_else(|| invalid("date", s))
}

pub fn parse_plain_time(s: &str) -> Result<Time> {
    let mut scan = Scan::new(s.as_bytes());
    scan.parse_all(parse_time_inner).ok_or_else(|| invalid("time", s))
}

fn takes_datetime_separator(scan: &mut Scan) -> Option<()> {
    match scan.peek() {
        Some(b'T' | b't' | b' ') => {
            scan.take_unchecked(1);
            Some(())
        }
        _ => None,
    }
}

pub fn parse_plain_datetime(s: &str) -> Result<PlainDateTime> {
    let mut scan = Scan::new(s.as_bytes());
    let parsed = scan.parse_all(|sc| {
        let date = parse_date_inner(sc)?;
        takes_datetime_separator(sc)?;
        let time = parse_time_inner(sc)?;
        Some(PlainDateTime::from_parts(date, time))
    });
    parsed.ok_or_else(|| invalid("plain_datetime", s))
}

pub fn parse_offset(s: &str) -> Result<Offset> {
    let mut scan = Scan::new(s.as_bytes());
    scan.parse_all(parse_offset_inner).ok_or_else(|| invalid("offset", s))
}

/// Parses a full `date T time (Z|offset) [zone]` reading. The offset is
/// present whenever the input carries one (always, for this crate's common
/// profile); the zone key is present only when a `[...]` suffix was given.
pub fn parse_date_time_offset_zone(s: &str) -> Result<(Date, Time, Offset, Option<String>)> {
    let mut scan = Scan::new(s.as_bytes());
    let parsed = scan.parse_all(|sc| {
        let date = parse_date_inner(sc)?;
        takes_datetime_separator(sc)?;
        let time = parse_time_inner(sc)?;
        let offset = parse_offset_inner(sc)?;
        let zone = if sc.peek() == Some(b'[') {
            sc.take_unchecked(1);
            let bytes = sc.take_until(|b| b == b']')?;
            sc.expect(b']')?;
            Some(String::from_utf8_lossy(bytes).into_owned())
        } else {
            None
        };
        Some((date, time, offset, zone))
    });
    parsed.ok_or_else(|| invalid("offset_datetime", s))
}

/// Raw components of a parsed ISO 8601 duration, sign already distributed
/// into every field (so `DateDelta`/`TimeDelta`'s own sign-consistency check
/// is what ultimately validates a string like `P1D-T1H`, which this parser
/// cannot produce since the sign is grammatically shared by the whole string).
struct RawDuration {
    negative: bool,
    years: i64,
    months: i64,
    weeks: i64,
    days: i64,
    hours: i64,
    minutes: i64,
    seconds: i64,
    nanos: u32,
}

fn parse_digits(scan: &mut Scan) -> Option<i64> {
    let mut total: i64 = scan.digit()? as i64;
    while let Some(d) = scan.digit() {
        total = total.checked_mul(10)?.checked_add(d as i64)?;
    }
    Some(total)
}

fn parse_duration_inner(scan: &mut Scan) -> Option<RawDuration> {
    let negative = match scan.peek() {
        Some(b'-') => {
            scan.take_unchecked(1);
            true
        }
        Some(b'+') => {
            scan.take_unchecked(1);
            false
        }
        _ => false,
    };
    scan.expect(b'P')?;

    let (mut years, mut months, mut weeks, mut days) = (0i64, 0i64, 0i64, 0i64);
    while scan.peek().is_some_and(|b| b.is_ascii_digit()) {
        let value = parse_digits(scan)?;
        match scan.peek()? {
            b'Y' => years = value,
            b'M' => months = value,
            b'W' => weeks = value,
            b'D' => days = value,
            _ => return None,
        }
        scan.take_unchecked(1);
    }

    let (mut hours, mut minutes, mut seconds, mut nanos) = (0i64, 0i64, 0i64, 0u32);
    if scan.peek() == Some(b'T') {
        scan.take_unchecked(1);
        let mut saw_any = false;
        while scan.peek().is_some_and(|b| b.is_ascii_digit()) {
            saw_any = true;
            let value = parse_digits(scan)?;
            let frac = scan.subsec()?.get();
            match scan.peek()? {
                b'H' => hours = value,
                b'M' => minutes = value,
                b'S' => {
                    seconds = value;
                    nanos = frac;
                }
                _ => return None,
            }
            scan.take_unchecked(1);
        }
        if !saw_any {
            return None;
        }
    }

    let sign = if negative { -1 } else { 1 };
    Some(RawDuration {
        negative,
        years: years * sign,
        months: months * sign,
        weeks: weeks * sign,
        days: days * sign,
        hours: hours * sign,
        minutes: minutes * sign,
        seconds: seconds * sign,
        nanos,
    })
}

pub fn parse_date_delta(s: &str) -> Result<DateDelta> {
    let mut scan = Scan::new(s.as_bytes());
    let raw = scan
        .parse_all(|sc| {
            let raw = parse_duration_inner(sc)?;
            (raw.hours == 0 && raw.minutes == 0 && raw.seconds == 0 && raw.nanos == 0).then_some(raw)
        })
        .ok_or_else(|| invalid("date_delta", s))?;
    DateDelta::from_parts(raw.years as i32, raw.months as i32, raw.weeks as i32, raw.days as i32)
}

pub fn parse_time_delta(s: &str) -> Result<TimeDelta> {
    let mut scan = Scan::new(s.as_bytes());
    let raw = scan
        .parse_all(|sc| {
            let raw = parse_duration_inner(sc)?;
            (raw.years == 0 && raw.months == 0 && raw.weeks == 0 && raw.days == 0).then_some(raw)
        })
        .ok_or_else(|| invalid("time_delta", s))?;
    TimeDelta::from_nanos(
        raw.hours as i128 * 3_600_000_000_000
            + raw.minutes as i128 * 60_000_000_000
            + raw.seconds as i128 * 1_000_000_000
            + if raw.negative { -(raw.nanos as i128) } else { raw.nanos as i128 },
    )
}

pub fn parse_datetime_delta(s: &str) -> Result<DateTimeDelta> {
    let mut scan = Scan::new(s.as_bytes());
    let raw = scan.parse_all(parse_duration_inner).ok_or_else(|| invalid("datetime_delta", s))?;
    let date = DateDelta::from_parts(raw.years as i32, raw.months as i32, raw.weeks as i32, raw.days as i32)?;
    let time = TimeDelta::from_nanos(
        raw.hours as i128 * 3_600_000_000_000
            + raw.minutes as i128 * 60_000_000_000
            + raw.seconds as i128 * 1_000_000_000
            + if raw.negative { -(raw.nanos as i128) } else { raw.nanos as i128 },
    )?;
    DateTimeDelta::new(date, time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_extended_and_basic_dates() {
        assert_eq!(parse_plain_date("2023-10-29").unwrap(), Date::new(2023, 10, 29).unwrap());
        assert_eq!(parse_plain_date("20231029").unwrap(), Date::new(2023, 10, 29).unwrap());
    }

    #[test]
    fn parses_time_with_fraction() {
        let t = parse_plain_time("13:45:30.5").unwrap();
        assert_eq!(t, Time::new(13, 45, 30, 500_000_000).unwrap());
    }

    #[test]
    fn parses_offset_and_zone_suffix() {
        let (date, time, offset, zone) =
            parse_date_time_offset_zone("2023-10-29T01:30:00+02:00[Europe/Berlin]").unwrap();
        assert_eq!(date, Date::new(2023, 10, 29).unwrap());
        assert_eq!(time, Time::new(1, 30, 0, 0).unwrap());
        assert_eq!(offset.get(), 7200);
        assert_eq!(zone.as_deref(), Some("Europe/Berlin"));
    }

    #[test]
    fn z_offset_is_zero() {
        let (_, _, offset, zone) = parse_date_time_offset_zone("2023-10-29T01:30:00Z").unwrap();
        assert_eq!(offset.get(), 0);
        assert_eq!(zone, None);
    }

    #[test]
    fn s6_iso_duration_full() {
        let dtd = parse_datetime_delta("P1Y2M3W4DT5H6M7.000008S").unwrap();
        assert_eq!(dtd.date_part().months(), 14);
        assert_eq!(dtd.date_part().days(), 25);
        assert_eq!(
            dtd.time_part().total_nanos(),
            5 * 3_600_000_000_000 + 6 * 60_000_000_000 + 7_000_000_000 + 8_000
        );
    }

    #[test]
    fn rejects_mixed_designators_in_date_delta() {
        assert!(parse_date_delta("PT1H").is_err());
    }
}
