//! Thread-safe zone cache: a weak-value map so a zone is freed once nothing
//! references it, backed by a small mutex-guarded LRU of strong references so
//! the handful of zones in active use don't get reloaded from disk on every
//! lookup.

use super::TimeZone;
use crate::error::{Error, Result};
use ahash::AHashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Weak};

const DEFAULT_CAPACITY: usize = 8;
const MAX_KEY_LEN: usize = 99;

pub(crate) struct TzStore {
    state: Mutex<State>,
    search_path: Mutex<Vec<PathBuf>>,
}

struct State {
    cache: AHashMap<String, Weak<TimeZone>>,
    lru: VecDeque<(String, Arc<TimeZone>)>,
    capacity: usize,
}

impl TzStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(State {
                cache: AHashMap::new(),
                lru: VecDeque::with_capacity(capacity),
                capacity,
            }),
            search_path: Mutex::new(vec![PathBuf::from("/usr/share/zoneinfo")]),
        }
    }

    #[cfg_attr(not(feature = "sys"), allow(dead_code))]
    pub fn with_search_path(paths: Vec<PathBuf>) -> Self {
        let store = Self::new();
        *store.search_path.lock() = paths;
        store
    }

    #[cfg_attr(not(feature = "sys"), allow(dead_code))]
    pub fn set_search_path(&self, paths: Vec<PathBuf>) {
        *self.search_path.lock() = paths;
    }

    #[cfg_attr(not(feature = "sys"), allow(dead_code))]
    pub fn search_path(&self) -> Vec<PathBuf> {
        self.search_path.lock().clone()
    }

    /// Returns the cached zone for `key`, or runs `loader` to build and cache
    /// a new one. `loader` is run without holding the internal lock.
    pub fn get_or_load<F>(&self, key: &str, loader: F) -> Result<Arc<TimeZone>>
    where
        F: FnOnce() -> Result<TimeZone>,
    {
        validate_key(key)?;

        {
            let mut state = self.state.lock();
            if let Some(weak) = state.cache.get(key) {
                if let Some(arc) = weak.upgrade() {
                    state.touch(key, arc.clone());
                    return Ok(arc);
                }
            }
        }

        let tz = Arc::new(loader()?);
        let mut state = self.state.lock();
        state.cache.insert(key.to_string(), Arc::downgrade(&tz));
        state.touch(key, tz.clone());
        Ok(tz)
    }

    /// Drops every cached strong reference. Zones still held by a live value
    /// remain reachable through it; the next lookup for any other key reloads.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.cache.clear();
        state.lru.clear();
    }

    #[cfg(test)]
    pub fn resident_count(&self) -> usize {
        self.state.lock().lru.len()
    }
}

impl State {
    fn touch(&mut self, key: &str, arc: Arc<TimeZone>) {
        self.lru.retain(|(k, _)| k != key);
        self.lru.push_front((key.to_string(), arc));
        while self.lru.len() > self.capacity {
            self.lru.pop_back();
        }
    }
}

impl Default for TzStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates a zone key: ASCII, 1-99 bytes, charset `[A-Za-z0-9_+\-./]`, no
/// `..`, `//`, or `/./` component, and no leading or trailing `/`, `.`, `-`,
/// or `+` on the key as a whole (a leading `-`/`+` would otherwise be
/// confusable with a POSIX offset sign).
pub(crate) fn validate_key(key: &str) -> Result<()> {
    let invalid = || Error::InvalidTzKey { key: key.to_string() };

    if key.is_empty() || key.len() > MAX_KEY_LEN || !key.is_ascii() {
        return Err(invalid());
    }
    let bytes = key.as_bytes();
    let first = bytes[0];
    if first == b'.' || first == b'-' || first == b'+' || first == b'/' {
        return Err(invalid());
    }
    if *bytes.last().unwrap() == b'/' {
        return Err(invalid());
    }
    let charset_ok = bytes
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'+' | b'-' | b'.' | b'/'));
    if !charset_ok {
        return Err(invalid());
    }
    if key.contains("..") || key.contains("//") || key.contains("/./") {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::scalar::Offset;

    #[test]
    fn rejects_traversal_and_bad_edges() {
        assert!(validate_key("America/../etc").is_err());
        assert!(validate_key("America//Denver").is_err());
        assert!(validate_key("/America/Denver").is_err());
        assert!(validate_key("America/Denver/").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key("-GMT").is_err());
    }

    #[test]
    fn accepts_ordinary_keys() {
        assert!(validate_key("America/Denver").is_ok());
        assert!(validate_key("Etc/GMT+5").is_ok());
        assert!(validate_key("UTC").is_ok());
    }

    #[test]
    fn caches_and_evicts_lru() {
        let store = TzStore::with_capacity(2);
        let mut loads = 0;
        for key in ["A", "B", "A", "C", "A"] {
            store
                .get_or_load(key, || {
                    loads += 1;
                    Ok(TimeZone::fixed(Offset::ZERO))
                })
                .unwrap();
        }
        assert!(store.resident_count() <= 2);
        assert_eq!(loads, 3);
    }

    #[test]
    fn clear_forces_a_reload() {
        let store = TzStore::new();
        let mut loads = 0;
        for _ in 0..2 {
            store.get_or_load("A", || {
                loads += 1;
                Ok(TimeZone::fixed(Offset::ZERO))
            })
            .unwrap();
        }
        assert_eq!(loads, 1);
        store.clear();
        store.get_or_load("A", || {
            loads += 1;
            Ok(TimeZone::fixed(Offset::ZERO))
        })
        .unwrap();
        assert_eq!(loads, 2);
    }

    #[test]
    fn search_path_defaults_and_overrides() {
        let store = TzStore::new();
        assert_eq!(store.search_path(), vec![PathBuf::from("/usr/share/zoneinfo")]);
        store.set_search_path(vec![PathBuf::from("/opt/tzdata")]);
        assert_eq!(store.search_path(), vec![PathBuf::from("/opt/tzdata")]);
    }
}
