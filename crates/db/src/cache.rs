//! Memoization of mass excess lookups
//!
//! The cache is an injected object rather than a global, so every
//! [NuclearDatabase](crate::NuclearDatabase) owns one and tests can swap in
//! their own. Keys carry a dataset identifier so that a rebuild only has to
//! clear the entries for its own database file.

// standard library
use std::collections::HashMap;

// external crates
use log::{debug, trace};
use parking_lot::Mutex;
use serde::Serialize;

// internal modules
use crate::derived::Prefer;

/// Identifier of a database artifact
pub type DatasetId = u64;

/// Everything a cached mass excess depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub dataset: DatasetId,
    pub z: u16,
    pub n: u16,
    pub prefer: Prefer,
}

impl CacheKey {
    pub fn new(dataset: DatasetId, z: u16, n: u16, prefer: Prefer) -> Self {
        Self {
            dataset,
            z,
            n,
            prefer,
        }
    }
}

/// Snapshot of cache usage
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}/{} entries, {} hits, {} misses, {} evictions ({:.1}% hit rate)",
            self.entries,
            self.capacity,
            self.hits,
            self.misses,
            self.evictions,
            100.0 * self.hit_rate()
        )
    }
}

/// Cache of mass excess lookups in keV
///
/// A cached `None` is a valid entry meaning neither source has the nuclide,
/// hence the nested option from [get()](MassCache::get).
pub trait MassCache: Send + Sync + std::fmt::Debug {
    /// Cached value, `None` on a miss
    fn get(&self, key: &CacheKey) -> Option<Option<f64>>;

    /// Store a value, evicting as needed
    fn put(&self, key: CacheKey, value: Option<f64>);

    /// Remove a single key, returns true if it was present
    fn evict(&self, key: &CacheKey) -> bool;

    /// Remove every entry belonging to a dataset
    fn clear(&self, dataset: DatasetId);

    /// Current usage
    fn stats(&self) -> CacheStats;
}

#[derive(Debug)]
struct Entry {
    value: Option<f64>,
    last_used: u64,
}

#[derive(Debug, Default)]
struct LruState {
    entries: HashMap<CacheKey, Entry>,
    clock: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl LruState {
    /// Drop the least recently used entry
    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| *key);

        if let Some(key) = oldest {
            trace!("Evicting Z={}, N={} ({})", key.z, key.n, key.prefer);
            self.entries.remove(&key);
            self.evictions += 1;
        }
    }
}

/// Bounded least recently used cache, safe to share between threads
///
/// Eviction scans for the oldest entry, which is fine for the few thousand
/// entries this is sized for.
///
/// ```rust
/// # use nmass_db::{CacheKey, LruMassCache, MassCache, Prefer};
/// let cache = LruMassCache::new(2);
/// let key = CacheKey::new(0, 26, 30, Prefer::Experimental);
///
/// assert_eq!(cache.get(&key), None);
/// cache.put(key, Some(-60607.8));
/// assert_eq!(cache.get(&key), Some(Some(-60607.8)));
/// ```
#[derive(Debug)]
pub struct LruMassCache {
    capacity: usize,
    state: Mutex<LruState>,
}

impl LruMassCache {
    /// Cache holding at most `capacity` entries
    ///
    /// A capacity of zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(LruState::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for LruMassCache {
    fn default() -> Self {
        Self::new(2000)
    }
}

impl MassCache for LruMassCache {
    fn get(&self, key: &CacheKey) -> Option<Option<f64>> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        state.clock += 1;
        let now = state.clock;

        match state.entries.get_mut(key) {
            Some(entry) => {
                entry.last_used = now;
                state.hits += 1;
                Some(entry.value)
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    fn put(&self, key: CacheKey, value: Option<f64>) {
        if self.capacity == 0 {
            return;
        }

        let mut state = self.state.lock();
        state.clock += 1;
        let last_used = state.clock;

        if !state.entries.contains_key(&key) {
            while state.entries.len() >= self.capacity {
                state.evict_oldest();
            }
        }
        state.entries.insert(key, Entry { value, last_used });
    }

    fn evict(&self, key: &CacheKey) -> bool {
        self.state.lock().entries.remove(key).is_some()
    }

    fn clear(&self, dataset: DatasetId) {
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|key, _| key.dataset != dataset);
        debug!(
            "Cleared {} cached values for dataset {dataset:016x}",
            before - state.entries.len()
        );
    }

    fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            entries: state.entries.len(),
            capacity: self.capacity,
            hits: state.hits,
            misses: state.misses,
            evictions: state.evictions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn key(z: u16, n: u16) -> CacheKey {
        CacheKey::new(1, z, n, Prefer::Experimental)
    }

    #[test]
    fn least_recent_goes_first() {
        let cache = LruMassCache::new(2);
        cache.put(key(26, 30), Some(-60607.8));
        cache.put(key(26, 31), Some(-60180.1));

        // touch Fe56 so Fe57 is the oldest
        assert!(cache.get(&key(26, 30)).is_some());
        cache.put(key(26, 32), None);

        assert_eq!(cache.get(&key(26, 31)), None);
        assert_eq!(cache.get(&key(26, 30)), Some(Some(-60607.8)));
        assert_eq!(cache.get(&key(26, 32)), Some(None));

        let stats = cache.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn overwrite_does_not_evict() {
        let cache = LruMassCache::new(1);
        cache.put(key(1, 0), Some(7288.97));
        cache.put(key(1, 0), Some(7288.971));
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.get(&key(1, 0)), Some(Some(7288.971)));
    }

    #[test]
    fn preference_is_part_of_the_key() {
        let cache = LruMassCache::new(4);
        cache.put(key(26, 30), Some(-60607.8));
        let theoretical = CacheKey::new(1, 26, 30, Prefer::Theoretical);
        assert_eq!(cache.get(&theoretical), None);
    }

    #[test]
    fn clear_is_per_dataset() {
        let cache = LruMassCache::new(8);
        cache.put(key(26, 30), Some(-60607.8));
        cache.put(CacheKey::new(2, 26, 30, Prefer::Experimental), Some(0.0));

        cache.clear(1);
        assert_eq!(cache.get(&key(26, 30)), None);
        assert!(cache.get(&CacheKey::new(2, 26, 30, Prefer::Experimental)).is_some());
    }

    #[test]
    fn single_key_eviction() {
        let cache = LruMassCache::new(8);
        cache.put(key(2, 2), Some(2424.9));
        assert!(cache.evict(&key(2, 2)));
        assert!(!cache.evict(&key(2, 2)));
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let cache = LruMassCache::new(0);
        cache.put(key(2, 2), Some(2424.9));
        assert_eq!(cache.stats().entries, 0);
        assert_eq!(cache.stats().hit_rate(), 0.0);
    }

    #[test]
    fn shared_between_threads() {
        let cache = Arc::new(LruMassCache::new(16));
        let handles = (0..4u16)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for n in 0..50u16 {
                        cache.put(key(t, n), Some(n as f64));
                        cache.get(&key(t, n));
                    }
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.entries, 16);
        assert_eq!(stats.evictions, 200 - 16);
    }
}
