//! Crate-wide error type.
//!
//! One flat enum rather than a `TemporalError`-style `(ErrorKind, Cow<'static, str>)`
//! pair: every failure mode here already carries the structured data a caller needs
//! (the offending field, the echoed input, the bounds), so a second indirection would
//! just duplicate what the variant already holds.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A numeric field, or the instant it implies, falls outside the representable window.
    ValueOutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    /// A string failed a grammar rule. `input` is echoed back, bounded to a reasonable length.
    InvalidFormat { what: &'static str, input: String },
    /// A civil time, offset, and zone were mutually inconsistent.
    InvalidOffsetForZone,
    /// A civil time falls in a fold and `disambiguate = Raise` was requested.
    AmbiguousTime,
    /// A civil time falls in a gap and `disambiguate = Raise` was requested.
    SkippedTime,
    /// The zone store could not resolve a key.
    TimeZoneNotFound { key: String },
    /// A zone key failed the key-validation grammar (distinct from "not found" so
    /// callers can tell a typo from a missing tzdata install).
    InvalidTzKey { key: String },
    /// A file existed at the resolved path but was not a TZif file, or the TZif
    /// bytes were structurally invalid.
    InvalidTzData { key: String, reason: &'static str },
    /// A usage error: an operation that could silently skew across a DST boundary
    /// was attempted without the explicit `ignore_dst` opt-in.
    ImplicitlyIgnoringDST { operation: &'static str },
    /// A delta was constructed (or would result) with mixed-sign components.
    MixedSignDelta,
    /// Division by a zero delta or a zero scalar.
    DivisionByZero,
    /// A rounding increment was zero, too large, or did not divide its enclosing unit.
    InvalidRoundingIncrement { increment: i64 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ValueOutOfRange { what, value, min, max } => write!(
                f,
                "{what} out of range: {value} (expected {min}..={max})"
            ),
            Error::InvalidFormat { what, input } => {
                write!(f, "invalid {what}: {}", truncate(input))
            }
            Error::InvalidOffsetForZone => {
                write!(f, "offset is not valid for the given zone at this civil time")
            }
            Error::AmbiguousTime => write!(f, "civil time is ambiguous (falls in a fold)"),
            Error::SkippedTime => write!(f, "civil time does not exist (falls in a gap)"),
            Error::TimeZoneNotFound { key } => write!(f, "time zone not found: {key}"),
            Error::InvalidTzKey { key } => write!(f, "invalid time zone key: {}", truncate(key)),
            Error::InvalidTzData { key, reason } => {
                write!(f, "invalid TZif data for {key}: {reason}")
            }
            Error::ImplicitlyIgnoringDST { operation } => write!(
                f,
                "{operation} may silently skew across a DST boundary; pass ignore_dst to opt in"
            ),
            Error::MixedSignDelta => write!(f, "delta components must share a sign"),
            Error::DivisionByZero => write!(f, "division by zero"),
            Error::InvalidRoundingIncrement { increment } => {
                write!(f, "invalid rounding increment: {increment}")
            }
        }
    }
}

impl std::error::Error for Error {}

fn truncate(s: &str) -> String {
    const LIMIT: usize = 200;
    if s.len() <= LIMIT {
        s.to_string()
    } else {
        format!("{}...", &s[..LIMIT])
    }
}
