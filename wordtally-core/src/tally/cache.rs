//! Time-bounded lookup cache for per-scope tables.
//!
//! Stopword and abbreviation tables are read on every message but change
//! rarely. [`LookupCache`] keeps each loaded table for a fixed TTL; callers
//! pass the current [`Instant`] so expiry is deterministic under test.

use std::collections::hash_map::Entry as MapEntry;
use std::hash::Hash;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tracing::trace;

#[derive(Debug, Clone)]
struct Entry<V> {
    loaded_at: Instant,
    value: V,
}

/// A keyed cache whose entries expire `ttl` after they were loaded.
#[derive(Debug, Clone)]
pub struct LookupCache<K, V> {
    ttl: Duration,
    entries: FxHashMap<K, Entry<V>>,
    hits: u64,
    misses: u64,
}

impl<K, V> LookupCache<K, V>
where
    K: Eq + Hash + std::fmt::Debug,
{
    /// Creates an empty cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: FxHashMap::default(),
            hits: 0,
            misses: 0,
        }
    }

    /// Entry lifetime.
    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value for `key`, calling `load` when the entry is
    /// missing or older than the TTL.
    ///
    /// A zero TTL disables caching: every call loads.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error. A failed load leaves any stale entry
    /// in place so the next call retries.
    pub fn get_or_load<F, E>(&mut self, key: K, now: Instant, load: F) -> Result<&V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        let ttl = self.ttl;
        match self.entries.entry(key) {
            MapEntry::Occupied(slot)
                if now.saturating_duration_since(slot.get().loaded_at) < ttl =>
            {
                self.hits += 1;
                Ok(&slot.into_mut().value)
            }
            MapEntry::Occupied(mut slot) => {
                self.misses += 1;
                trace!(target: "wordtally::cache", key = ?slot.key(), "reloading stale entry");
                let value = load(slot.key())?;
                *slot.get_mut() = Entry {
                    loaded_at: now,
                    value,
                };
                Ok(&slot.into_mut().value)
            }
            MapEntry::Vacant(slot) => {
                self.misses += 1;
                trace!(target: "wordtally::cache", key = ?slot.key(), "loading entry");
                let value = load(slot.key())?;
                Ok(&slot
                    .insert(Entry {
                        loaded_at: now,
                        value,
                    })
                    .value)
            }
        }
    }

    /// Drops the entry for `key`. Returns true if one was cached.
    pub fn invalidate(&mut self, key: &K) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            trace!(target: "wordtally::cache", ?key, "invalidated entry");
        }
        removed
    }

    /// Drops every entry older than the TTL and returns how many were dropped.
    ///
    /// Stale entries are otherwise only replaced when their key is read
    /// again; call this periodically so idle scopes release their tables.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.loaded_at) < ttl);

        let purged = before - self.entries.len();
        if purged > 0 {
            trace!(target: "wordtally::cache", purged, "purged expired entries");
        }
        purged
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entries, fresh or stale.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    #[inline]
    pub fn hit_stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn ok(v: u32) -> impl FnOnce(&u64) -> Result<u32, Infallible> {
        move |_| Ok(v)
    }

    #[test]
    fn loads_once_within_ttl() {
        let mut cache = LookupCache::new(Duration::from_secs(60));
        let t0 = Instant::now();

        assert_eq!(cache.get_or_load(1u64, t0, ok(10)), Ok(&10));
        assert_eq!(
            cache.get_or_load(1, t0 + Duration::from_secs(59), ok(20)),
            Ok(&10)
        );
        assert_eq!(cache.hit_stats(), (1, 1));
    }

    #[test]
    fn reloads_after_expiry() {
        let mut cache = LookupCache::new(Duration::from_secs(60));
        let t0 = Instant::now();

        cache.get_or_load(1u64, t0, ok(10)).unwrap();
        assert_eq!(
            cache.get_or_load(1, t0 + Duration::from_secs(60), ok(20)),
            Ok(&20)
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn zero_ttl_always_loads() {
        let mut cache = LookupCache::new(Duration::ZERO);
        let t0 = Instant::now();

        cache.get_or_load(1u64, t0, ok(1)).unwrap();
        assert_eq!(cache.get_or_load(1, t0, ok(2)), Ok(&2));
        assert_eq!(cache.hit_stats(), (0, 2));
    }

    #[test]
    fn failed_load_propagates_and_keeps_stale() {
        let mut cache = LookupCache::new(Duration::from_secs(1));
        let t0 = Instant::now();
        cache.get_or_load(1u64, t0, |_| Ok::<_, &str>(5)).unwrap();

        let later = t0 + Duration::from_secs(5);
        assert_eq!(cache.get_or_load(1, later, |_| Err("down")), Err("down"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_or_load(1, later, |_| Ok::<_, &str>(6)), Ok(&6));
    }

    #[test]
    fn purge_expired_releases_idle_keys() {
        let mut cache = LookupCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.get_or_load(1u64, t0, ok(1)).unwrap();
        cache.get_or_load(2u64, t0 + Duration::from_secs(30), ok(2)).unwrap();

        assert_eq!(cache.purge_expired(t0 + Duration::from_secs(59)), 0);
        assert_eq!(cache.purge_expired(t0 + Duration::from_secs(60)), 1);
        assert_eq!(cache.len(), 1);
        assert!(!cache.invalidate(&1));

        assert_eq!(cache.purge_expired(t0 + Duration::from_secs(120)), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_and_clear() {
        let mut cache = LookupCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.get_or_load(1u64, t0, ok(1)).unwrap();
        cache.get_or_load(2u64, t0, ok(2)).unwrap();

        assert!(cache.invalidate(&1));
        assert!(!cache.invalidate(&1));
        assert_eq!(cache.get_or_load(1, t0, ok(3)), Ok(&3));

        cache.clear();
        assert!(cache.is_empty());
    }
}
