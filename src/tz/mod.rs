//! Time zone: a TZif transition table plus its POSIX-rule tail, exposing the
//! two queries every other component needs — offset for an instant, and
//! ambiguity classification for a civil (local) time.

mod posix;
mod tzif;

pub(crate) mod store;
#[cfg(feature = "sys")]
pub(crate) mod system;

use crate::common::ambiguity::Ambiguity;
use crate::common::scalar::{Offset, UnixDays};
use crate::error::{Error, Result};
use posix::PosixTz;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TimeZone {
    /// Sorted ascending by the first field. Empty for a fixed-offset zone.
    transitions: Vec<(i64, i32)>,
    initial_offset: i32,
    posix: Option<PosixTz>,
    /// The canonical identifier this zone was loaded under, if any (absent
    /// for `TimeZone::fixed`, which has no key in a zone database).
    key: Option<String>,
}

impl TimeZone {
    pub fn fixed(offset: Offset) -> Self {
        Self {
            transitions: Vec::new(),
            initial_offset: offset.get(),
            posix: None,
            key: None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    #[cfg_attr(not(feature = "log"), allow(dead_code))]
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn from_tzif_bytes(key: &str, buf: &[u8]) -> Result<Self> {
        let data = tzif::parse(buf).map_err(|e| Error::InvalidTzData {
            key: key.to_string(),
            reason: tzif_error_reason(e),
        })?;
        let posix = if data.posix_tz.is_empty() {
            None
        } else {
            Some(posix::parse(&data.posix_tz).ok_or_else(|| Error::InvalidTzData {
                key: key.to_string(),
                reason: "malformed POSIX TZ tail",
            })?)
        };
        Ok(Self {
            transitions: data.transitions,
            initial_offset: data.initial_offset,
            posix,
            key: Some(key.to_string()),
        })
    }

    pub fn offset_for_instant(&self, utc_secs: i64) -> Offset {
        let idx = self.transitions.partition_point(|&(t, _)| t <= utc_secs);
        if idx < self.transitions.len() || self.posix.is_none() {
            let off = if idx == 0 {
                self.initial_offset
            } else {
                self.transitions[idx - 1].1
            };
            return Offset::new_unchecked(off);
        }
        // Past the last known transition: project with the POSIX tail.
        let posix = self.posix.as_ref().expect("checked above");
        let year = year_of_utc_secs(utc_secs);
        Offset::new_unchecked(posix.offset_for_instant(utc_secs, year))
    }

    pub fn ambiguity_for_local(&self, local_secs: i64) -> Ambiguity {
        let idx = self.nearest_transition_index(local_secs);

        for candidate in [idx.checked_sub(1), Some(idx)] {
            let Some(i) = candidate else { continue };
            if i >= self.transitions.len() {
                continue;
            }
            let before = self.offset_before(i);
            let after = self.transitions[i].1;
            if before == after {
                continue;
            }
            let t = self.transitions[i].0;
            if after > before {
                let window = (t + before as i64)..(t + after as i64);
                if window.contains(&local_secs) {
                    return Ambiguity::Gap(Offset::new_unchecked(before), Offset::new_unchecked(after));
                }
            } else {
                let window = (t + after as i64)..(t + before as i64);
                if window.contains(&local_secs) {
                    return Ambiguity::Fold(Offset::new_unchecked(before), Offset::new_unchecked(after));
                }
            }
        }

        if idx == self.transitions.len() {
            if let Some(posix) = &self.posix {
                let year = year_of_utc_secs(local_secs);
                return posix.ambiguity_for_local(local_secs, year);
            }
        }

        let off = if idx == 0 {
            self.initial_offset
        } else {
            self.transitions[idx - 1].1
        };
        Ambiguity::Unambiguous(Offset::new_unchecked(off))
    }

    fn offset_before(&self, idx: usize) -> i32 {
        if idx == 0 {
            self.initial_offset
        } else {
            self.transitions[idx - 1].1
        }
    }

    /// Estimate the transition index bracketing a local (wall-clock) reading by
    /// fixed-point refinement on the candidate UTC offset: two rounds suffice
    /// since offsets never shift by more than a day between iterations.
    fn nearest_transition_index(&self, local_secs: i64) -> usize {
        if self.transitions.is_empty() {
            return 0;
        }
        let mut offset_guess = self.initial_offset;
        let mut idx = 0;
        for _ in 0..3 {
            idx = self.transitions.partition_point(|&(t, _)| t <= local_secs - offset_guess as i64);
            let refined = self.offset_before(idx);
            if refined == offset_guess {
                break;
            }
            offset_guess = refined;
        }
        idx
    }
}

fn year_of_utc_secs(secs: i64) -> i32 {
    UnixDays::new_unchecked(secs.div_euclid(86_400) as i32).date().0.get()
}

fn tzif_error_reason(e: tzif::TzifError) -> &'static str {
    match e {
        tzif::TzifError::BadMagic => "bad magic or unsupported version",
        tzif::TzifError::Truncated => "truncated file",
        tzif::TzifError::InconsistentCounts => "inconsistent header counts",
        tzif::TzifError::OffsetOutOfRange => "offset field out of range",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_offset_is_always_unambiguous() {
        let tz = TimeZone::fixed(Offset::new(3600).unwrap());
        assert_eq!(tz.offset_for_instant(0).get(), 3600);
        assert_eq!(
            tz.ambiguity_for_local(0),
            Ambiguity::Unambiguous(Offset::new(3600).unwrap())
        );
    }

    #[test]
    fn transition_table_picks_correct_side() {
        let tz = TimeZone {
            transitions: vec![(1_000_000, 7200)],
            initial_offset: 3600,
            posix: None,
            key: None,
        };
        assert_eq!(tz.offset_for_instant(999_999).get(), 3600);
        assert_eq!(tz.offset_for_instant(1_000_000).get(), 7200);
    }

    /// Builds a minimal v2 TZif buffer: an empty 32-bit section, a single-transition
    /// 64-bit section, and the given POSIX tail.
    fn build_v2(posix_tail: &str) -> Vec<u8> {
        fn header(timecnt: u32, typecnt: u32) -> Vec<u8> {
            let mut h = Vec::new();
            h.extend_from_slice(b"TZif");
            h.push(b'2');
            h.extend_from_slice(&[0u8; 15]);
            h.extend_from_slice(&0u32.to_be_bytes()); // isutcnt
            h.extend_from_slice(&0u32.to_be_bytes()); // isstdcnt
            h.extend_from_slice(&0u32.to_be_bytes()); // leapcnt
            h.extend_from_slice(&timecnt.to_be_bytes());
            h.extend_from_slice(&typecnt.to_be_bytes());
            h.extend_from_slice(&0u32.to_be_bytes()); // charcnt
            h
        }
        let mut buf = Vec::new();
        // v1 (32-bit) section: no transitions, one fixed type.
        buf.extend_from_slice(&header(0, 1));
        buf.extend_from_slice(&3600i32.to_be_bytes());
        buf.push(0);
        buf.push(0);
        // v2 (64-bit) section: one transition to standard CET at epoch 0.
        buf.extend_from_slice(&header(1, 1));
        buf.extend_from_slice(&0i64.to_be_bytes());
        buf.push(0); // transition type index
        buf.extend_from_slice(&3600i32.to_be_bytes());
        buf.push(0);
        buf.push(0);
        buf.extend_from_slice(format!("\n{posix_tail}\n").as_bytes());
        buf
    }

    #[test]
    fn posix_tail_projects_offset_past_last_transition() {
        let buf = build_v2("CET-1CEST,M3.5.0,M10.5.0/3");
        let tz = TimeZone::from_tzif_bytes("Europe/Amsterdam", &buf).unwrap();
        assert_eq!(tz.offset_for_instant(2_216_250_000).get(), 7200);
    }
}
