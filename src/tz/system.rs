//! System zone discovery, gated behind the `sys` feature: the host's current
//! zone name (via `iana-time-zone`) and reading TZif bytes out of the
//! platform's zoneinfo database.

use super::store::validate_key;
use crate::error::{Error, Result};
use std::path::PathBuf;

/// The IANA key the host believes it is currently configured for.
pub(crate) fn system_zone_name() -> Result<String> {
    iana_time_zone::get_timezone().map_err(|e| Error::TimeZoneNotFound {
        key: format!("<system: {e}>"),
    })
}

/// Reads the raw TZif bytes for `key`, trying each directory in `search_path`
/// in order and returning the first hit.
pub(crate) fn read_tzif(key: &str, search_path: &[PathBuf]) -> Result<Vec<u8>> {
    validate_key(key)?;
    for dir in search_path {
        if let Ok(bytes) = std::fs::read(dir.join(key)) {
            return Ok(bytes);
        }
    }
    Err(Error::TimeZoneNotFound { key: key.to_string() })
}

/// Current wall-clock time, as nanoseconds since the Unix epoch.
pub(crate) fn now_epoch_nanos() -> i128 {
    use web_time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_nanos() as i128
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_key_before_touching_disk() {
        assert!(read_tzif("../../etc/passwd", &[PathBuf::from("/usr/share/zoneinfo")]).is_err());
    }

    #[test]
    fn falls_through_search_path_in_order() {
        let dirs = vec![PathBuf::from("/nonexistent-a"), PathBuf::from("/nonexistent-b")];
        assert!(read_tzif("America/Denver", &dirs).is_err());
    }
}
