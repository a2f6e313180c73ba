//! RFC 3339: a strict subset of ISO 8601 with a mandatory numeric offset or
//! `Z`, extended format only, no `[zone]` suffix. `-00:00` is accepted but
//! treated identically to `+00:00` here — this crate has no "unknown offset"
//! marker distinct from UTC, unlike RFC 2822's `-0000`.

use crate::common::parse::Scan;
use crate::common::scalar::Offset;
use crate::date::Date;
use crate::error::{Error, Result};
use crate::instant::Instant;
use crate::offset_datetime::OffsetDateTime;
use crate::time::Time;

fn invalid(input: &str) -> Error {
    Error::InvalidFormat { what: "rfc3339", input: input.to_string() }
}

/// The third element is `true` iff the offset was written as the literal
/// `-00:00` form: "instant known, local offset unknown".
fn parse_parts(s: &str) -> Option<(Date, Time, Offset, bool)> {
    let mut scan = Scan::new(s.as_bytes());
    scan.parse_all(|sc| {
        let year = sc.exactly_n_digits(4)? as i32;
        sc.expect(b'-')?;
        let month = sc.exactly_n_digits(2)? as u8;
        sc.expect(b'-')?;
        let day = sc.exactly_n_digits(2)? as u8;
        let date = Date::new(year, month, day).ok()?;
        match sc.peek()? {
            b'T' | b't' | b' ' => {
                sc.take_unchecked(1);
            }
            _ => return None,
        }
        let hour = sc.digits00_23()?;
        sc.expect(b':')?;
        let minute = sc.digits00_59()?;
        sc.expect(b':')?;
        let second = sc.digits00_59()?;
        let nanosecond = sc.subsec()?.get();
        let time = Time::new(hour, minute, second, nanosecond).ok()?;
        let (offset, unknown_offset) = match sc.peek()? {
            b'Z' | b'z' => {
                sc.take_unchecked(1);
                (Offset::ZERO, false)
            }
            sign @ (b'+' | b'-') => {
                sc.take_unchecked(1);
                let oh = sc.digits00_23()?;
                sc.expect(b':')?;
                let om = sc.digits00_59()?;
                let total = oh as i32 * 3600 + om as i32 * 60;
                let offset = Offset::new(if sign == b'-' { -total } else { total })?;
                (offset, sign == b'-' && total == 0)
            }
            _ => return None,
        };
        Some((date, time, offset, unknown_offset))
    })
}

pub fn parse_rfc3339_offset_datetime(s: &str) -> Result<OffsetDateTime> {
    let (date, time, offset, _) = parse_parts(s).ok_or_else(|| invalid(s))?;
    OffsetDateTime::new(
        date.year(),
        date.month(),
        date.day(),
        time.hour(),
        time.minute(),
        time.second(),
        time.nanosecond(),
        offset.get(),
    )
}

/// Rejects `-00:00`: the instant is well-defined only when the offset is known.
pub fn parse_rfc3339_instant(s: &str) -> Result<Instant> {
    let (date, time, offset, unknown_offset) = parse_parts(s).ok_or_else(|| invalid(s))?;
    if unknown_offset {
        return Err(invalid(s));
    }
    let dt = OffsetDateTime::new(
        date.year(),
        date.month(),
        date.day(),
        time.hour(),
        time.minute(),
        time.second(),
        time.nanosecond(),
        offset.get(),
    )?;
    Ok(dt.to_instant())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utc_and_offset_forms() {
        assert!(parse_rfc3339_instant("2023-10-29T01:30:00Z").is_ok());
        assert!(parse_rfc3339_instant("2023-10-29T01:30:00+02:00").is_ok());
    }

    #[test]
    fn rejects_basic_format() {
        assert!(parse_rfc3339_instant("20231029T013000Z").is_err());
    }

    #[test]
    fn rejects_missing_offset() {
        assert!(parse_rfc3339_instant("2023-10-29T01:30:00").is_err());
    }

    #[test]
    fn instant_rejects_unknown_offset_marker() {
        assert!(parse_rfc3339_instant("2023-10-29T01:30:00-00:00").is_err());
    }

    #[test]
    fn offset_datetime_accepts_unknown_offset_marker_as_zero() {
        let dt = parse_rfc3339_offset_datetime("2023-10-29T01:30:00-00:00").unwrap();
        assert_eq!(dt.offset().get(), 0);
    }
}
