//! POSIX TZ rule string parser, per-year transition projection, and the
//! ambiguity classifier for the "tail" beyond a TZif file's last transition.
//!
//! Hand-rolled rather than delegated to the `combine` parser-combinator crate
//! the teacher itself depends on: §4.4 scopes this grammar as an in-core
//! component.

use crate::common::ambiguity::Ambiguity;
use crate::common::parse::Scan;
use crate::common::scalar::{Month, UnixDays, Weekday, Year};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rule {
    /// `Mm.n.d`: month (1-12), week-of-month (1-4, or 5 = last), weekday (0=Sun..6=Sat).
    MonthWeekday { month: u8, week: u8, weekday: u8 },
    /// `Jn`: Julian day 1-365, Feb 29 always skipped.
    JulianNoLeap(u16),
    /// `n`: day-of-year 0-365, Feb 29 counted.
    DayOfYear(u16),
}

impl Rule {
    /// The `UnixDays` on which this rule falls in the given year.
    fn day_for_year(self, year: i32) -> UnixDays {
        let y = Year::new(year).expect("year in supported range");
        match self {
            Rule::DayOfYear(n) => {
                UnixDays::from_ymd(y, Month::January, 1).shift(n as i32).expect("in range")
            }
            Rule::JulianNoLeap(n) => {
                // day 60 is always March 1; Feb 29 is never n's target.
                let mut day = n as i32;
                if y.is_leap() && n >= 60 {
                    day += 1;
                }
                UnixDays::from_ymd(y, Month::January, 1).shift(day - 1).expect("in range")
            }
            Rule::MonthWeekday { month, week, weekday } => {
                let month = Month::from_number(month).expect("validated at parse time");
                let target = Weekday::from_sunday_is_0(weekday).expect("validated at parse time");
                if week == 5 {
                    // Last occurrence of `weekday` in `month`.
                    let last_day = y.days_in_month(month);
                    let last = UnixDays::from_ymd(y, month, last_day);
                    let diff = (last.day_of_week().sunday_is_0() + 7 - target.sunday_is_0()) % 7;
                    last.shift(-(diff as i32)).expect("in range")
                } else {
                    let first = UnixDays::from_ymd(y, month, 1);
                    let diff = (target.sunday_is_0() + 7 - first.day_of_week().sunday_is_0()) % 7;
                    let nth_first = first.shift(diff as i32).expect("in range");
                    nth_first.shift((week as i32 - 1) * 7).expect("in range")
                }
            }
        }
    }

    /// The nominal wall-clock reading (seconds, "local treated as continuous")
    /// at which this rule's transition occurs in `year`.
    fn local_seconds_for_year(self, year: i32, time_of_day_secs: i32) -> i64 {
        self.day_for_year(year).get() as i64 * 86_400 + time_of_day_secs as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DstRule {
    pub offset: i32,
    pub start: (Rule, i32),
    pub end: (Rule, i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PosixTz {
    pub std_offset: i32,
    pub dst: Option<DstRule>,
}

impl PosixTz {
    pub fn offset_for_instant(&self, utc_secs: i64, year: i32) -> i32 {
        let Some(dst) = &self.dst else {
            return self.std_offset;
        };
        let t1 = dst.start.0.local_seconds_for_year(year, dst.start.1) - self.std_offset as i64;
        let t2 = dst.end.0.local_seconds_for_year(year, dst.end.1) - dst.offset as i64;
        let (ta, after_a, tb, after_b) = if t1 <= t2 {
            (t1, dst.offset, t2, self.std_offset)
        } else {
            (t2, self.std_offset, t1, dst.offset)
        };
        if utc_secs < ta {
            after_b
        } else if utc_secs < tb {
            after_a
        } else {
            after_b
        }
    }

    pub fn ambiguity_for_local(&self, local_secs: i64, year: i32) -> Ambiguity {
        let Some(dst) = &self.dst else {
            return Ambiguity::Unambiguous(
                crate::common::scalar::Offset::new_unchecked(self.std_offset),
            );
        };
        let t1 = dst.start.0.local_seconds_for_year(year, dst.start.1);
        let t2 = dst.end.0.local_seconds_for_year(year, dst.end.1);
        // Transition 1: std -> dst. Transition 2: dst -> std.
        let trans1 = Transition { at: t1, before: self.std_offset, after: dst.offset };
        let trans2 = Transition { at: t2, before: dst.offset, after: self.std_offset };

        let (first, second) = if trans1.at <= trans2.at {
            (trans1, trans2)
        } else {
            (trans2, trans1)
        };

        if let Some(amb) = first.classify(local_secs) {
            return amb;
        }
        if let Some(amb) = second.classify(local_secs) {
            return amb;
        }
        let off = if local_secs < first.at {
            second.after
        } else if local_secs < second.at {
            first.after
        } else {
            second.after
        };
        Ambiguity::Unambiguous(crate::common::scalar::Offset::new_unchecked(off))
    }
}

struct Transition {
    at: i64,
    before: i32,
    after: i32,
}

impl Transition {
    fn classify(&self, local_secs: i64) -> Option<Ambiguity> {
        use crate::common::scalar::Offset;
        let delta = self.after - self.before;
        if delta > 0 {
            if (self.at..self.at + delta as i64).contains(&local_secs) {
                return Some(Ambiguity::Gap(
                    Offset::new_unchecked(self.before),
                    Offset::new_unchecked(self.after),
                ));
            }
        } else if delta < 0 {
            let width = (-delta) as i64;
            if (self.at - width..self.at).contains(&local_secs) {
                return Some(Ambiguity::Fold(
                    Offset::new_unchecked(self.before),
                    Offset::new_unchecked(self.after),
                ));
            }
        }
        None
    }
}

/// Parses a POSIX TZ rule string: `std offset [dst [offset] [, start[/time], end[/time]]]`.
pub(crate) fn parse(s: &[u8]) -> Option<PosixTz> {
    let mut scan = Scan::new(s);
    skip_tzname(&mut scan)?;
    let std_offset = parse_offset(&mut scan)?;

    if scan.is_done() {
        return Some(PosixTz { std_offset, dst: None });
    }

    skip_tzname(&mut scan)?;
    let dst_offset = if scan.peek().map(|c| c == b',').unwrap_or(true) {
        std_offset + 3600
    } else {
        parse_offset(&mut scan)?
    };

    if scan.is_done() {
        // "always DST" with no explicit rule is not well-formed per POSIX; require rules.
        return None;
    }
    scan.expect(b',')?;
    let start = parse_rule_and_time(&mut scan)?;
    scan.expect(b',')?;
    let end = parse_rule_and_time(&mut scan)?;
    if !scan.is_done() {
        return None;
    }

    Some(PosixTz {
        std_offset,
        dst: Some(DstRule { offset: dst_offset, start, end }),
    })
}

fn skip_tzname(scan: &mut Scan<'_>) -> Option<()> {
    if scan.peek() == Some(b'<') {
        scan.take_unchecked(1);
        scan.take_until(|c| c == b'>')?;
        scan.expect(b'>')?;
    } else {
        let name = scan.take_until(|c| c.is_ascii_digit() || c == b'+' || c == b'-' || c == b',')?;
        if name.len() < 3 || !name.iter().all(u8::is_ascii_alphabetic) {
            return None;
        }
    }
    Some(())
}

fn looking_at(scan: &Scan<'_>, c: u8) -> bool {
    scan.peek() == Some(c)
}

fn parse_hms(scan: &mut Scan<'_>) -> Option<i32> {
    let h = scan.up_to_3_digits()? as i32;
    let mut total = h * 3600;
    if looking_at(scan, b':') {
        scan.take_unchecked(1);
        total += scan.digits00_59()? as i32 * 60;
        if looking_at(scan, b':') {
            scan.take_unchecked(1);
            total += scan.digits00_59()? as i32;
        }
    }
    Some(total)
}

/// POSIX convention: the offset string is *west* of UTC, so the stored,
/// east-positive offset is the negation of the parsed magnitude.
fn parse_offset(scan: &mut Scan<'_>) -> Option<i32> {
    let negative_input = match scan.peek() {
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
    let magnitude = parse_hms(scan)?;
    if !(-167 * 3600..=167 * 3600).contains(&magnitude) {
        return None;
    }
    let west_of_utc = if negative_input { -magnitude } else { magnitude };
    Some(-west_of_utc)
}

fn parse_rule_and_time(scan: &mut Scan<'_>) -> Option<(Rule, i32)> {
    let rule = parse_rule(scan)?;
    let time = if looking_at(scan, b'/') {
        scan.take_unchecked(1);
        let negative = looking_at(scan, b'-');
        if negative || looking_at(scan, b'+') {
            scan.take_unchecked(1);
        }
        let mag = parse_hms(scan)?;
        if negative {
            -mag
        } else {
            mag
        }
    } else {
        2 * 3600
    };
    if !(-167 * 3600..=167 * 3600).contains(&time) {
        return None;
    }
    Some((rule, time))
}

fn parse_rule(scan: &mut Scan<'_>) -> Option<Rule> {
    match scan.peek()? {
        b'J' => {
            scan.take_unchecked(1);
            let n = parse_up_to_3(scan)?;
            if !(1..=365).contains(&n) {
                return None;
            }
            Some(Rule::JulianNoLeap(n))
        }
        b'M' => {
            scan.take_unchecked(1);
            let month = parse_up_to_2(scan)?;
            if !(1..=12).contains(&month) {
                return None;
            }
            scan.expect(b'.')?;
            let week = parse_up_to_2(scan)?;
            if !(1..=5).contains(&week) {
                return None;
            }
            scan.expect(b'.')?;
            let weekday = parse_up_to_2(scan)?;
            if !(0..=6).contains(&weekday) {
                return None;
            }
            Some(Rule::MonthWeekday { month: month as u8, week: week as u8, weekday: weekday as u8 })
        }
        b'0'..=b'9' => {
            let n = parse_up_to_3(scan)?;
            if n > 365 {
                return None;
            }
            Some(Rule::DayOfYear(n))
        }
        _ => None,
    }
}

fn parse_up_to_3(scan: &mut Scan<'_>) -> Option<u16> {
    scan.up_to_3_digits()
}

fn parse_up_to_2(scan: &mut Scan<'_>) -> Option<u16> {
    scan.up_to_2_digits().map(|n| n as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fixed_offset() {
        let tz = parse(b"EST5").unwrap();
        assert_eq!(tz.std_offset, -18_000);
        assert!(tz.dst.is_none());
    }

    #[test]
    fn parses_bracketed_name_with_sign() {
        let tz = parse(b"<-03>3<-02>-2,M3.2.0/-1,M11.1.0/-1").unwrap();
        assert_eq!(tz.std_offset, -10_800);
        assert_eq!(tz.dst.unwrap().offset, 7_200);
    }

    #[test]
    fn parses_us_style_with_default_dst_and_default_time() {
        // US Eastern: EST5EDT,M3.2.0,M11.1.0
        let tz = parse(b"EST5EDT,M3.2.0,M11.1.0").unwrap();
        assert_eq!(tz.std_offset, -18_000);
        let dst = tz.dst.unwrap();
        assert_eq!(dst.offset, -14_400); // default std+3600
        assert_eq!(dst.start.1, 2 * 3600);
    }

    #[test]
    fn nth_weekday_rule_day() {
        // M3.2.0 = second Sunday in March.
        let rule = Rule::MonthWeekday { month: 3, week: 2, weekday: 0 };
        let day = rule.day_for_year(2023);
        let (y, m, d) = day.date();
        assert_eq!((y.get(), m.number(), d), (2023, 3, 12));
    }

    #[test]
    fn last_weekday_rule_day() {
        // M11.1.0 = first Sunday in November (week=1, not last) sanity vs M11.5.0
        let rule = Rule::MonthWeekday { month: 11, week: 5, weekday: 0 };
        let day = rule.day_for_year(2023);
        let (y, m, d) = day.date();
        assert_eq!((y.get(), m.number(), d), (2023, 11, 26));
    }

    #[test]
    fn julian_skips_feb29() {
        let rule = Rule::JulianNoLeap(60);
        let day = rule.day_for_year(2024); // leap year
        let (y, m, d) = day.date();
        assert_eq!((y.get(), m.number(), d), (2024, 3, 1));
    }

    #[test]
    fn day_of_year_counts_feb29() {
        let rule = Rule::DayOfYear(59);
        let day = rule.day_for_year(2024); // leap year, day 59 (0-indexed) = Feb 29
        let (y, m, d) = day.date();
        assert_eq!((y.get(), m.number(), d), (2024, 2, 29));
    }

    #[test]
    fn gap_at_spring_forward() {
        // Europe/Amsterdam-style: CET-1CEST,M3.5.0,M10.5.0/3
        let tz = parse(b"CET-1CEST,M3.5.0,M10.5.0/3").unwrap();
        let dst = tz.dst.unwrap();
        let start_day = dst.start.0.day_for_year(2023);
        let t1 = start_day.get() as i64 * 86_400 + dst.start.1 as i64;
        let amb = tz.ambiguity_for_local(t1 + 1800, 2023);
        assert!(matches!(amb, Ambiguity::Gap(..)));
    }

    #[test]
    fn fold_at_fall_back() {
        let tz = parse(b"CET-1CEST,M3.5.0,M10.5.0/3").unwrap();
        let dst = tz.dst.unwrap();
        let end_day = dst.end.0.day_for_year(2023);
        let t2 = end_day.get() as i64 * 86_400 + dst.end.1 as i64;
        let amb = tz.ambiguity_for_local(t2 - 1800, 2023);
        assert!(matches!(amb, Ambiguity::Fold(..)));
    }

    #[test]
    fn southern_hemisphere_wraparound() {
        // Sydney-style: AEST-10AEDT,M10.1.0,M4.1.0/3
        let tz = parse(b"AEST-10AEDT,M10.1.0,M4.1.0/3").unwrap();
        let dst = tz.dst.unwrap();
        assert_eq!(tz.std_offset, 36_000);
        assert_eq!(dst.offset, 39_600);
        // January (southern summer) should resolve to DST.
        let jan = UnixDays::from_ymd(Year::new(2023).unwrap(), Month::January, 15).get() as i64
            * 86_400
            + 12 * 3600;
        match tz.ambiguity_for_local(jan, 2023) {
            Ambiguity::Unambiguous(off) => assert_eq!(off.get(), 39_600),
            other => panic!("expected unambiguous DST, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_inputs() {
        assert!(parse(b"").is_none());
        assert!(parse(b"EST").is_none()); // offset is required
        assert!(parse(b"AB").is_none());
    }
}
