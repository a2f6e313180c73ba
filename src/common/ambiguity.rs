//! Disambiguation and ambiguity-classification enums shared by the resolver,
//! the value types, and the arithmetic engine.

use super::scalar::Offset;
use crate::error::{Error, Result};

/// The caller's choice for resolving a civil time that falls in a gap or fold.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Disambiguate {
    /// Prefer the offset that was in effect before the transition (fold), or
    /// shift forward by the gap width (gap). Matches Temporal's "compatible".
    Compatible,
    Earlier,
    Later,
    Raise,
}

impl Disambiguate {
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "compatible" => Disambiguate::Compatible,
            "earlier" => Disambiguate::Earlier,
            "later" => Disambiguate::Later,
            "raise" => Disambiguate::Raise,
            _ => return None,
        })
    }
}

impl std::str::FromStr for Disambiguate {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| Error::InvalidFormat {
            what: "disambiguate",
            input: s.to_string(),
        })
    }
}

/// The result of classifying a civil (local) time against a zone's transitions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ambiguity {
    Unambiguous(Offset),
    /// A civil-time interval no instant maps to (spring-forward).
    /// `(before, after)`: the offsets in effect immediately before/after the gap.
    Gap(Offset, Offset),
    /// A civil-time interval two instants map to (fall-back).
    /// `(before, after)`: the offset from the earlier occurrence, then the later.
    Fold(Offset, Offset),
}

impl Ambiguity {
    /// Resolve this ambiguity into a single concrete offset, given the caller's
    /// disambiguation choice. Returns `None` for `Raise` on a non-unambiguous result
    /// (the caller maps that to `AmbiguousTime`/`SkippedTime`).
    pub fn resolve(self, disambiguate: Disambiguate) -> Result<ResolvedOffset> {
        match (self, disambiguate) {
            (Ambiguity::Unambiguous(off), _) => Ok(ResolvedOffset {
                offset: off,
                shifted: false,
            }),
            (Ambiguity::Fold(before, _after), Disambiguate::Earlier) => Ok(ResolvedOffset {
                offset: before,
                shifted: false,
            }),
            (Ambiguity::Fold(_before, after), Disambiguate::Later | Disambiguate::Compatible) => {
                Ok(ResolvedOffset {
                    offset: after,
                    shifted: false,
                })
            }
            (Ambiguity::Fold(..), Disambiguate::Raise) => Err(Error::AmbiguousTime),
            (Ambiguity::Gap(before, _after), Disambiguate::Earlier) => Ok(ResolvedOffset {
                offset: before,
                shifted: true,
            }),
            (Ambiguity::Gap(_before, after), Disambiguate::Later | Disambiguate::Compatible) => {
                Ok(ResolvedOffset {
                    offset: after,
                    shifted: true,
                })
            }
            (Ambiguity::Gap(..), Disambiguate::Raise) => Err(Error::SkippedTime),
        }
    }
}

/// The offset chosen by [`Ambiguity::resolve`], and whether the civil time had to be
/// shifted out of a gap (in which case the caller must re-derive the civil fields
/// from the shifted instant).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ResolvedOffset {
    pub offset: Offset,
    pub shifted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_resolution() {
        let a = Offset::new(7200).unwrap();
        let b = Offset::new(3600).unwrap();
        let amb = Ambiguity::Fold(a, b);
        assert_eq!(amb.resolve(Disambiguate::Earlier).unwrap().offset, a);
        assert_eq!(amb.resolve(Disambiguate::Later).unwrap().offset, b);
        assert_eq!(amb.resolve(Disambiguate::Compatible).unwrap().offset, b);
        assert!(amb.resolve(Disambiguate::Raise).is_err());
    }

    #[test]
    fn gap_resolution() {
        let a = Offset::new(3600).unwrap();
        let b = Offset::new(7200).unwrap();
        let amb = Ambiguity::Gap(a, b);
        assert!(amb.resolve(Disambiguate::Earlier).unwrap().shifted);
        assert!(amb.resolve(Disambiguate::Raise).is_err());
    }
}
