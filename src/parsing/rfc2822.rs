//! RFC 2822 §3.3 date-time, tolerant of folding whitespace and `(comments)`
//! anywhere between tokens. Comments are skipped by paren-depth counting, not
//! parsed as structured CFWS content. Accepts the obsolete 2- and 3-digit
//! year forms and a leading `Day, ` weekday (checked against the parsed date,
//! not merely ignored). Zones: numeric `+hhmm`/`-hhmm`, or `UT`/`GMT`/`Z`;
//! the obsolete single-letter military zones are not recognized. `-0000`
//! ("time zone unknown" in RFC 2822) is accepted but stored as a plain zero
//! offset, same as `+0000`, since this crate has no "unknown offset" marker.

use crate::common::parse::Scan;
use crate::common::scalar::{Offset, Weekday};
use crate::date::Date;
use crate::error::{Error, Result};
use crate::instant::Instant;
use crate::offset_datetime::OffsetDateTime;
use crate::time::Time;

fn invalid(input: &str) -> Error {
    Error::InvalidFormat { what: "rfc2822", input: input.to_string() }
}

fn skip_cfws(scan: &mut Scan) {
    loop {
        scan.ascii_whitespace();
        if scan.peek() != Some(b'(') {
            break;
        }
        let mut depth = 0i32;
        loop {
            match scan.peek() {
                Some(b'(') => {
                    depth += 1;
                    scan.take_unchecked(1);
                }
                Some(b')') => {
                    scan.take_unchecked(1);
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Some(_) => {
                    scan.take_unchecked(1);
                }
                None => break,
            }
        }
    }
}

fn weekday_from_abbrev(bytes: &[u8]) -> Option<Weekday> {
    Some(match bytes.to_ascii_uppercase().as_slice() {
        b"MON" => Weekday::Monday,
        b"TUE" => Weekday::Tuesday,
        b"WED" => Weekday::Wednesday,
        b"THU" => Weekday::Thursday,
        b"FRI" => Weekday::Friday,
        b"SAT" => Weekday::Saturday,
        b"SUN" => Weekday::Sunday,
        _ => return None,
    })
}

fn month_from_abbrev(bytes: &[u8]) -> Option<u8> {
    Some(match bytes.to_ascii_uppercase().as_slice() {
        b"JAN" => 1,
        b"FEB" => 2,
        b"MAR" => 3,
        b"APR" => 4,
        b"MAY" => 5,
        b"JUN" => 6,
        b"JUL" => 7,
        b"AUG" => 8,
        b"SEP" => 9,
        b"OCT" => 10,
        b"NOV" => 11,
        b"DEC" => 12,
        _ => return None,
    })
}

/// 2-digit years roll over at 50 (RFC 2822 §4.3, carried from RFC 822 obs-year):
/// `00..=49` -> 2000s, `50..=99` -> 1900s. 3-digit years are `1900 + n`.
fn parse_year(scan: &mut Scan) -> Option<i32> {
    let mut digits = Vec::new();
    while digits.len() < 4 {
        match scan.peek() {
            Some(b) if b.is_ascii_digit() => {
                digits.push(b);
                scan.take_unchecked(1);
            }
            _ => break,
        }
    }
    if digits.len() < 2 {
        return None;
    }
    let raw: i32 = std::str::from_utf8(&digits).ok()?.parse().ok()?;
    Some(match digits.len() {
        2 if raw < 50 => 2000 + raw,
        2 => 1900 + raw,
        3 => 1900 + raw,
        _ => raw,
    })
}

/// Returns the offset and whether it was written as the literal `-0000`
/// "zone unknown" marker.
fn parse_zone(scan: &mut Scan) -> Option<(Offset, bool)> {
    match scan.peek()? {
        b'+' | b'-' => {
            let negative = scan.take_unchecked(1)[0] == b'-';
            let digits = scan.exactly_n_digits(4)?;
            let total = (digits / 100) as i32 * 3600 + (digits % 100) as i32 * 60;
            let offset = Offset::new(if negative { -total } else { total })?;
            Some((offset, negative && total == 0))
        }
        _ => {
            let start = scan.rest();
            let mut n = 0usize;
            while scan.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
                scan.take_unchecked(1);
                n += 1;
            }
            match start[..n].to_ascii_uppercase().as_slice() {
                b"UT" | b"GMT" | b"Z" => Some((Offset::ZERO, false)),
                _ => None,
            }
        }
    }
}

fn parse_inner(s: &str) -> Option<(Date, Time, Offset, bool)> {
    let mut scan = Scan::new(s.as_bytes());
    skip_cfws(&mut scan);

    let checkpoint = scan.rest();
    let mut weekday = None;
    if let Some(bytes) = scan.take(3) {
        if let Some(wd) = weekday_from_abbrev(bytes) {
            skip_cfws(&mut scan);
            if scan.peek() == Some(b',') {
                scan.take_unchecked(1);
            }
            weekday = Some(wd);
        } else {
            scan = Scan::new(checkpoint);
        }
    } else {
        scan = Scan::new(checkpoint);
    }

    skip_cfws(&mut scan);
    let day = scan.up_to_2_digits()?;
    skip_cfws(&mut scan);
    let month_bytes = scan.take(3)?;
    let month = month_from_abbrev(month_bytes)?;
    skip_cfws(&mut scan);
    let year = parse_year(&mut scan)?;
    skip_cfws(&mut scan);

    let hour = scan.digits00_23()?;
    skip_cfws(&mut scan);
    scan.expect(b':')?;
    skip_cfws(&mut scan);
    let minute = scan.digits00_59()?;
    skip_cfws(&mut scan);
    let second = if scan.peek() == Some(b':') {
        scan.take_unchecked(1);
        skip_cfws(&mut scan);
        scan.digits00_59()?
    } else {
        0
    };
    skip_cfws(&mut scan);
    let (offset, zone_unknown) = parse_zone(&mut scan)?;
    skip_cfws(&mut scan);

    if !scan.is_done() {
        return None;
    }

    let date = Date::new(year, month, day).ok()?;
    if let Some(wd) = weekday {
        if date.weekday() != wd {
            return None;
        }
    }
    let time = Time::new(hour, minute, second, 0).ok()?;
    Some((date, time, offset, zone_unknown))
}

/// Rejects `-0000`: an offset datetime has no way to record "zone unknown"
/// separately from an actual zero offset.
pub fn parse_rfc2822_offset_datetime(s: &str) -> Result<OffsetDateTime> {
    let (date, time, offset, zone_unknown) = parse_inner(s).ok_or_else(|| invalid(s))?;
    if zone_unknown {
        return Err(invalid(s));
    }
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

/// Accepts `-0000`: for an instant only the resulting UTC timestamp matters,
/// so "zone unknown" and "zone is UTC" coincide.
pub fn parse_rfc2822_instant(s: &str) -> Result<Instant> {
    let (date, time, offset, _) = parse_inner(s).ok_or_else(|| invalid(s))?;
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
    fn parses_canonical_form() {
        let dt = parse_rfc2822_offset_datetime("Sun, 29 Oct 2023 01:30:00 +0200").unwrap();
        assert_eq!(dt.date(), Date::new(2023, 10, 29).unwrap());
        assert_eq!(dt.offset().get(), 7200);
    }

    #[test]
    fn tolerates_comments_and_folding() {
        let dt = parse_rfc2822_offset_datetime("29  Oct   2023 (the date) 01:30:00 GMT").unwrap();
        assert_eq!(dt.offset().get(), 0);
    }

    #[test]
    fn rejects_wrong_weekday() {
        // 2023-10-29 was a Sunday, not a Monday.
        assert!(parse_rfc2822_offset_datetime("Mon, 29 Oct 2023 01:30:00 +0000").is_err());
    }

    #[test]
    fn offset_datetime_rejects_unknown_zone_marker() {
        assert!(parse_rfc2822_offset_datetime("29 Oct 2023 01:30:00 -0000").is_err());
    }

    #[test]
    fn instant_accepts_unknown_zone_marker_as_utc() {
        let instant = parse_rfc2822_instant("29 Oct 2023 01:30:00 -0000").unwrap();
        let utc = parse_rfc2822_instant("29 Oct 2023 01:30:00 +0000").unwrap();
        assert_eq!(instant, utc);
    }

    #[test]
    fn two_digit_year_rolls_over_at_fifty() {
        let dt = parse_rfc2822_offset_datetime("29 Oct 23 01:30:00 +0000").unwrap();
        assert_eq!(dt.date().year(), 2023);
    }

    #[test]
    fn rejects_military_zone_letter() {
        assert!(parse_rfc2822_offset_datetime("29 Oct 2023 01:30:00 A").is_err());
    }
}
