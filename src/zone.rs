//! The public handle to a time zone: a thin, cheaply-cloneable reference to a
//! transition table, resolved once through a process-wide cache.

use crate::common::scalar::Offset;
use crate::error::{Error, Result};
use crate::tz::store::TzStore;
use crate::tz::TimeZone;
use std::fmt;
use std::sync::{Arc, OnceLock};

#[cfg(feature = "sys")]
use parking_lot::Mutex;

fn global_store() -> &'static TzStore {
    static STORE: OnceLock<TzStore> = OnceLock::new();
    STORE.get_or_init(TzStore::new)
}

#[cfg(feature = "sys")]
fn system_zone_cache() -> &'static Mutex<Option<Zone>> {
    static CACHE: OnceLock<Mutex<Option<Zone>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(None))
}

#[derive(Debug, Clone)]
pub struct Zone(pub(crate) Arc<TimeZone>);

impl Zone {
    /// A zone with a single, permanent offset and no daylight-saving rule.
    pub fn fixed(offset_seconds: i32) -> Result<Self> {
        let offset = Offset::new(offset_seconds).ok_or(Error::ValueOutOfRange {
            what: "offset_seconds",
            value: offset_seconds as i64,
            min: Offset::MIN.get() as i64,
            max: Offset::MAX.get() as i64,
        })?;
        Ok(Self(Arc::new(TimeZone::fixed(offset))))
    }

    /// Loads (or returns the cached copy of) the zone identified by an IANA key,
    /// e.g. `"America/Chicago"`.
    pub fn load(key: &str) -> Result<Self> {
        let owned_key = key.to_string();
        let tz = global_store().get_or_load(key, move || {
            #[cfg(feature = "log")]
            log::debug!("loading time zone {owned_key} from disk");
            load_tzif(&owned_key)
        })?;
        Ok(Self(tz))
    }

    /// The host's current zone, per the platform's configuration. Cached after
    /// the first successful probe; see [`Zone::reset_system`].
    #[cfg(feature = "sys")]
    pub fn system() -> Result<Self> {
        if let Some(cached) = system_zone_cache().lock().clone() {
            return Ok(cached);
        }
        let zone = match crate::tz::system::system_zone_name().and_then(|key| Self::load(&key)) {
            Ok(zone) => zone,
            Err(_e) => {
                #[cfg(feature = "log")]
                log::warn!("failed to determine the system time zone ({_e}), falling back to UTC");
                Self::fixed(0)?
            }
        };
        *system_zone_cache().lock() = Some(zone.clone());
        Ok(zone)
    }

    /// Forces the next call to [`Zone::system`] to re-probe the host instead
    /// of returning the cached result.
    #[cfg(feature = "sys")]
    pub fn reset_system() {
        *system_zone_cache().lock() = None;
    }

    /// The canonical identifier this zone was loaded under, if any. `None` for
    /// a fixed-offset zone, which has no key in any zone database.
    pub fn key(&self) -> Option<&str> {
        self.0.key()
    }

    /// The offset in effect at the given instant.
    pub fn offset_for_instant(&self, instant: crate::instant::Instant) -> Offset {
        self.0.offset_for_instant(instant.timestamp())
    }

    pub(crate) fn inner(&self) -> &Arc<TimeZone> {
        &self.0
    }
}

impl PartialEq for Zone {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Zone {}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key().unwrap_or("<fixed offset>"))
    }
}

#[cfg(feature = "sys")]
fn load_tzif(key: &str) -> Result<TimeZone> {
    let bytes = crate::tz::system::read_tzif(key, &global_store().search_path())?;
    let tz = TimeZone::from_tzif_bytes(key, &bytes)?;
    #[cfg(feature = "log")]
    log::trace!("parsed {key} into {} transitions", tz.transition_count());
    Ok(tz)
}

#[cfg(not(feature = "sys"))]
fn load_tzif(key: &str) -> Result<TimeZone> {
    Err(Error::TimeZoneNotFound { key: key.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_zone_has_no_key() {
        let z = Zone::fixed(3600).unwrap();
        assert_eq!(z.key(), None);
    }

    #[test]
    fn rejects_out_of_range_offset() {
        assert!(Zone::fixed(100_000).is_err());
    }

    #[cfg(feature = "sys")]
    #[test]
    fn system_zone_is_cached_until_reset() {
        let first = Zone::system().unwrap();
        let second = Zone::system().unwrap();
        assert_eq!(first, second);
        Zone::reset_system();
        let third = Zone::system().unwrap();
        assert_eq!(first, third);
    }

    #[test]
    fn offset_for_instant_on_a_fixed_zone_is_constant() {
        let zone = Zone::fixed(-18000).unwrap();
        let a = crate::instant::Instant::from_timestamp(0).unwrap();
        let b = crate::instant::Instant::from_timestamp(1_700_000_000).unwrap();
        assert_eq!(zone.offset_for_instant(a).get(), -18000);
        assert_eq!(zone.offset_for_instant(b).get(), -18000);
    }
}
