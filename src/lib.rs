//! `chronia` is a high-precision, time-zone-aware date and time library.
//!
//! It distinguishes four shapes of "a point in time":
//!
//! - [`PlainDateTime`]: a naive calendar date and time, with no offset or zone.
//! - [`OffsetDateTime`]: a date and time paired with a fixed UTC offset.
//! - [`ZonedDateTime`]: a date and time paired with an IANA [`Zone`], whose
//!   offset at that reading is cached and never silently re-resolved.
//! - [`SystemDateTime`]: an [`OffsetDateTime`] resolved once against the
//!   host's current time zone at construction.
//!
//! Plus the partial-date types [`YearMonth`] and [`MonthDay`], the delta types
//! in [`delta`], and [`Instant`], the zone-independent point on the UTC
//! timeline everything else is built from.
//!
//! Every operation that could silently skew across a daylight-saving
//! transition is gated: `OffsetDateTime`/`PlainDateTime` arithmetic that
//! carries a time component requires an explicit `ignore_dst: bool`, and
//! `ZonedDateTime` construction/date-arithmetic takes a
//! [`common::ambiguity::Disambiguate`] to resolve gaps and folds explicitly
//! rather than picking a default silently.
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::too_many_lines,
    clippy::cognitive_complexity,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,

    // Deliberate casts between the scalar newtypes and their plain integer
    // representations; every one is either range-checked beforehand or
    // operates on a value already known to fit.
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap,
)]

pub mod common;
pub mod date;
pub mod delta;
pub mod error;
pub mod instant;
pub mod month_day;
pub mod offset_datetime;
pub mod parsing;
pub mod pickle;
pub mod plain_datetime;
#[cfg(feature = "sys")]
pub mod system_datetime;
pub mod time;
pub(crate) mod tz;
pub mod year_month;
pub mod zone;
pub mod zoned_datetime;

pub use common::ambiguity::Disambiguate;
pub use common::round::{RoundMode, Unit};
pub use date::Date;
pub use delta::{DateDelta, DateTimeDelta, TimeDelta};
pub use error::{Error, Result};
pub use instant::Instant;
pub use month_day::MonthDay;
pub use offset_datetime::OffsetDateTime;
#[cfg(feature = "sys")]
pub use system_datetime::SystemDateTime;
pub use time::Time;
pub use year_month::YearMonth;
pub use zone::Zone;
pub use zoned_datetime::ZonedDateTime;
pub use plain_datetime::PlainDateTime;
