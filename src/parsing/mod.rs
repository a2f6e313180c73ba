//! Textual parsing: the ISO 8601 "common" profile used by every value type's
//! `parse_common_iso`, plus the stricter RFC 3339 and more tolerant RFC 2822
//! profiles used at the `Instant`/`OffsetDateTime` boundary.

mod iso;
mod rfc2822;
mod rfc3339;

pub use iso::{
    parse_date_delta, parse_date_time_offset_zone, parse_datetime_delta, parse_offset, parse_plain_date,
    parse_plain_datetime, parse_plain_time, parse_time_delta,
};
pub use rfc2822::{parse_rfc2822_instant, parse_rfc2822_offset_datetime};
pub use rfc3339::{parse_rfc3339_instant, parse_rfc3339_offset_datetime};
