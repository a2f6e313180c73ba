//! Binary TZif decoder (RFC 8536), versions 1, 2, and 3.
//!
//! This is a from-scratch decoder rather than a wrapper around the `tzif` crate:
//! the byte format is specified directly by §4.3 as an in-scope "core" component.

use crate::common::scalar::{EpochSecs, Offset};

/// A decoded TZif file: a sorted transition table, the offset that applies
/// before the earliest transition, and the trailing POSIX rule (empty if none).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TzifData {
    /// `(utc_epoch_seconds, offset_seconds)`, strictly increasing by the first field.
    pub transitions: Vec<(i64, i32)>,
    pub initial_offset: i32,
    pub posix_tz: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TzifError {
    BadMagic,
    Truncated,
    InconsistentCounts,
    OffsetOutOfRange,
}

const MAGIC: &[u8; 4] = b"TZif";
const HEADER_LEN: usize = 4 + 1 + 15 + 6 * 4; // magic+version+reserved+6 counts

struct Counts {
    isutcnt: u32,
    isstdcnt: u32,
    leapcnt: u32,
    timecnt: u32,
    typecnt: u32,
    charcnt: u32,
}

fn read_be_u32(buf: &[u8], pos: usize) -> Result<u32, TzifError> {
    let bytes = buf.get(pos..pos + 4).ok_or(TzifError::Truncated)?;
    Ok(u32::from_be_bytes(bytes.try_into().unwrap()))
}

fn read_be_i32(buf: &[u8], pos: usize) -> Result<i32, TzifError> {
    read_be_u32(buf, pos).map(|v| v as i32)
}

fn read_be_i64(buf: &[u8], pos: usize) -> Result<i64, TzifError> {
    let bytes = buf.get(pos..pos + 8).ok_or(TzifError::Truncated)?;
    Ok(i64::from_be_bytes(bytes.try_into().unwrap()))
}

fn parse_header(buf: &[u8], pos: usize) -> Result<(u8, Counts), TzifError> {
    if buf.len() < pos + HEADER_LEN {
        return Err(TzifError::Truncated);
    }
    if &buf[pos..pos + 4] != MAGIC {
        return Err(TzifError::BadMagic);
    }
    let version = buf[pos + 4];
    if version != 0 && version != b'2' && version != b'3' {
        return Err(TzifError::BadMagic);
    }
    let counts_pos = pos + 4 + 1 + 15;
    let counts = Counts {
        isutcnt: read_be_u32(buf, counts_pos)?,
        isstdcnt: read_be_u32(buf, counts_pos + 4)?,
        leapcnt: read_be_u32(buf, counts_pos + 8)?,
        timecnt: read_be_u32(buf, counts_pos + 12)?,
        typecnt: read_be_u32(buf, counts_pos + 16)?,
        charcnt: read_be_u32(buf, counts_pos + 20)?,
    };
    if counts.typecnt == 0 {
        return Err(TzifError::InconsistentCounts);
    }
    Ok((version, counts))
}

/// One local-time-type record: 4-byte BE signed offset, DST flag, abbreviation index.
#[derive(Clone, Copy)]
struct LocalTimeType {
    offset: i32,
}

fn parse_body(
    buf: &[u8],
    start: usize,
    counts: &Counts,
    wide: bool,
) -> Result<(Vec<(i64, i32)>, i32, usize), TzifError> {
    let time_size = if wide { 8 } else { 4 };
    let mut pos = start;

    let mut trans_times = Vec::with_capacity(counts.timecnt as usize);
    for _ in 0..counts.timecnt {
        let t = if wide {
            read_be_i64(buf, pos)?
        } else {
            read_be_i32(buf, pos)? as i64
        };
        // Clamp rather than reject: a transition outside our representable
        // range still produces correct results within it.
        trans_times.push(EpochSecs::clamp(t).get());
        pos += time_size;
    }

    let mut trans_types = Vec::with_capacity(counts.timecnt as usize);
    for _ in 0..counts.timecnt {
        let idx = *buf.get(pos).ok_or(TzifError::Truncated)?;
        if idx as u32 >= counts.typecnt {
            return Err(TzifError::InconsistentCounts);
        }
        trans_types.push(idx as usize);
        pos += 1;
    }

    let mut local_types = Vec::with_capacity(counts.typecnt as usize);
    for _ in 0..counts.typecnt {
        let offset = read_be_i32(buf, pos)?;
        if Offset::new(offset).is_none() {
            return Err(TzifError::OffsetOutOfRange);
        }
        // offset(4) + is_dst(1) + abbrind(1)
        pos += 4;
        let _is_dst = *buf.get(pos).ok_or(TzifError::Truncated)?;
        pos += 1;
        let _abbrind = *buf.get(pos).ok_or(TzifError::Truncated)?;
        pos += 1;
        local_types.push(LocalTimeType { offset });
    }

    pos += counts.charcnt as usize; // abbreviation string table

    // Leap-second records: consumed for correctness, not exposed.
    for _ in 0..counts.leapcnt {
        pos += time_size + 4;
    }
    // Standard/wall and UT/local indicators: consumed, not exposed.
    pos += counts.isstdcnt as usize;
    pos += counts.isutcnt as usize;

    if pos > buf.len() {
        return Err(TzifError::Truncated);
    }

    let initial_offset = local_types[0].offset;
    let mut transitions: Vec<(i64, i32)> = Vec::with_capacity(trans_times.len());
    for (t, ty) in trans_times.into_iter().zip(trans_types) {
        transitions.push((t, local_types[ty].offset));
    }
    // RFC 8536 requires strictly increasing transition times; tolerate ties by
    // keeping the first occurrence, since some historical files are sloppy.
    transitions.dedup_by_key(|(t, _)| *t);

    Ok((transitions, initial_offset, pos))
}

pub(crate) fn parse(buf: &[u8]) -> Result<TzifData, TzifError> {
    let (v1_version, v1_counts) = parse_header(buf, 0)?;
    let (v1_transitions, v1_initial, body_end) = parse_body(buf, HEADER_LEN, &v1_counts, false)?;

    if v1_version == 0 {
        return Ok(TzifData {
            transitions: v1_transitions,
            initial_offset: v1_initial,
            posix_tz: Vec::new(),
        });
    }

    // v2/v3: a second, 64-bit header+body follows immediately.
    let (_v2_version, v2_counts) = parse_header(buf, body_end)?;
    let (v2_transitions, v2_initial, v2_body_end) =
        parse_body(buf, body_end + HEADER_LEN, &v2_counts, true)?;

    let rest = buf.get(v2_body_end..).ok_or(TzifError::Truncated)?;
    let posix_tz = extract_posix_tz(rest);

    Ok(TzifData {
        transitions: v2_transitions,
        initial_offset: v2_initial,
        posix_tz,
    })
}

/// The POSIX tail is wrapped in newlines: `\n<rule>\n`.
fn extract_posix_tz(rest: &[u8]) -> Vec<u8> {
    if rest.first() != Some(&b'\n') {
        return Vec::new();
    }
    let body = &rest[1..];
    match body.iter().position(|&b| b == b'\n') {
        Some(end) => body[..end].to_vec(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_v1(transitions: &[(i32, i32)], initial_offset: i32) -> Vec<u8> {
        let mut types: Vec<i32> = vec![initial_offset];
        for &(_, off) in transitions {
            if !types.contains(&off) {
                types.push(off);
            }
        }
        let mut buf = Vec::new();
        buf.extend_from_slice(MAGIC);
        buf.push(0);
        buf.extend_from_slice(&[0u8; 15]);
        buf.extend_from_slice(&0u32.to_be_bytes()); // isutcnt
        buf.extend_from_slice(&0u32.to_be_bytes()); // isstdcnt
        buf.extend_from_slice(&0u32.to_be_bytes()); // leapcnt
        buf.extend_from_slice(&(transitions.len() as u32).to_be_bytes());
        buf.extend_from_slice(&(types.len() as u32).to_be_bytes());
        buf.extend_from_slice(&0u32.to_be_bytes()); // charcnt
        for &(t, _) in transitions {
            buf.extend_from_slice(&(t as i32).to_be_bytes());
        }
        for &(_, off) in transitions {
            let idx = types.iter().position(|&o| o == off).unwrap();
            buf.push(idx as u8);
        }
        for &off in &types {
            buf.extend_from_slice(&off.to_be_bytes());
            buf.push(0);
            buf.push(0);
        }
        buf
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = build_v1(&[], 0);
        buf[0] = b'X';
        assert_eq!(parse(&buf), Err(TzifError::BadMagic));
    }

    #[test]
    fn parses_v1_fixed_offset() {
        let buf = build_v1(&[], 3600);
        let data = parse(&buf).unwrap();
        assert_eq!(data.initial_offset, 3600);
        assert!(data.transitions.is_empty());
        assert!(data.posix_tz.is_empty());
    }

    #[test]
    fn parses_v1_with_transitions() {
        let buf = build_v1(&[(1_000_000, 7200), (2_000_000, 3600)], 0);
        let data = parse(&buf).unwrap();
        assert_eq!(data.transitions, vec![(1_000_000, 7200), (2_000_000, 3600)]);
    }

    #[test]
    fn rejects_truncated() {
        let buf = build_v1(&[(1, 3600)], 0);
        assert_eq!(parse(&buf[..buf.len() - 2]), Err(TzifError::Truncated));
    }

    #[test]
    fn rejects_offset_outside_the_range_offset_can_represent() {
        let buf = build_v1(&[], 90_000);
        assert_eq!(parse(&buf), Err(TzifError::OffsetOutOfRange));
    }

    /// A v2 buffer whose 64-bit transition times fall outside the range we can
    /// represent (as a widerange tzdata file like Pacific/Kiritimati's does for
    /// some historical zones): transitions clamp to `EpochSecs::MIN`/`MAX`
    /// rather than causing a parse failure.
    fn build_v2_wide(transitions: &[(i64, i32)], initial_offset: i32) -> Vec<u8> {
        let mut types: Vec<i32> = vec![initial_offset];
        for &(_, off) in transitions {
            if !types.contains(&off) {
                types.push(off);
            }
        }
        fn header(timecnt: u32, typecnt: u32) -> Vec<u8> {
            let mut h = Vec::new();
            h.extend_from_slice(MAGIC);
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
        buf.extend_from_slice(&initial_offset.to_be_bytes());
        buf.push(0);
        buf.push(0);
        // v2 (64-bit) section.
        buf.extend_from_slice(&header(transitions.len() as u32, types.len() as u32));
        for &(t, _) in transitions {
            buf.extend_from_slice(&t.to_be_bytes());
        }
        for &(_, off) in transitions {
            let idx = types.iter().position(|&o| o == off).unwrap();
            buf.push(idx as u8);
        }
        for &off in &types {
            buf.extend_from_slice(&off.to_be_bytes());
            buf.push(0);
            buf.push(0);
        }
        buf.extend_from_slice(b"\n\n"); // empty POSIX tail
        buf
    }

    #[test]
    fn clamps_widerange_transitions_to_representable_bounds() {
        let buf = build_v2_wide(&[(i64::MIN, 36_292), (i64::MAX, 39_600)], 0);
        let data = parse(&buf).unwrap();
        assert_eq!(
            data.transitions,
            vec![(EpochSecs::MIN.get(), 36_292), (EpochSecs::MAX.get(), 39_600)]
        );
    }
}
