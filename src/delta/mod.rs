//! Delta algebra: `DateDelta` (calendar months+days), `TimeDelta` (signed
//! nanoseconds), and their composition `DateTimeDelta`.

mod date_delta;
mod datetime_delta;
mod time_delta;

pub use date_delta::DateDelta;
pub use datetime_delta::DateTimeDelta;
pub use time_delta::TimeDelta;
