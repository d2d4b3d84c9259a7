//! LRU-K admission filter.
//!
//! Two [`LruCore`]s in series: a **history** cache mapping keys to
//! pre-admission hit counts, and a **main** cache holding the values. A key
//! is only admitted into the main cache once it has been seen `k` times, so
//! a one-pass scan over cold keys churns the small history cache instead of
//! flushing the working set.
//!
//! ```text
//! insert(key, value)
//!   ├─ key resident in main?  → update value in place, refresh recency
//!   └─ else: history[key] += 1
//!        ├─ count < k   → value discarded, history remembers the touch
//!        └─ count == k  → drop history record, admit (key, value) to main
//!
//! get(key): history[key] += 1, then query main
//! ```
//!
//! The history cache is itself LRU-bounded: keys that never get warm fall
//! out of it on their own.

use std::fmt;
use std::hash::Hash;

use crate::error::ConfigError;
use crate::policy::lru::LruCore;
use crate::traits::{CoreCache, MutableCache};

/// Default promotion threshold: a key must be seen twice to be admitted.
pub const DEFAULT_K: u32 = 2;

/// Scan-resistant LRU with a hit-count admission filter.
///
/// # Example
///
/// ```
/// use polycache::policy::lru_k::LruKCache;
/// use polycache::traits::CoreCache;
///
/// let mut cache = LruKCache::new(4); // k = 2
///
/// // First sighting is filtered: the value is not admitted.
/// cache.insert(1, "cold");
/// assert_eq!(cache.get(&1), None);
///
/// // get(&1) above counted as the second sighting, so now it admits.
/// cache.insert(1, "warm");
/// assert_eq!(cache.get(&1), Some(&"warm"));
/// ```
pub struct LruKCache<K, V>
where
    K: Eq + Hash + Clone,
{
    main: LruCore<K, V>,
    history: LruCore<K, u32>,
    k: u32,
}

impl<K, V> LruKCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU-K cache with history capacity equal to the main
    /// capacity and the default threshold of [`DEFAULT_K`].
    pub fn new(capacity: usize) -> Self {
        Self::with_params(capacity, capacity, DEFAULT_K)
    }

    /// Creates an LRU-K cache with explicit history capacity and threshold.
    ///
    /// A threshold of 0 is coerced to 1 (every key admits on first touch);
    /// use [`try_with_params`](Self::try_with_params) to reject it instead.
    pub fn with_params(capacity: usize, history_capacity: usize, k: u32) -> Self {
        Self {
            main: LruCore::new(capacity),
            history: LruCore::new(history_capacity),
            k: k.max(1),
        }
    }

    /// Fallible constructor that rejects a zero threshold.
    pub fn try_with_params(
        capacity: usize,
        history_capacity: usize,
        k: u32,
    ) -> Result<Self, ConfigError> {
        if k == 0 {
            return Err(ConfigError::new("lru-k threshold must be at least 1"));
        }
        Ok(Self::with_params(capacity, history_capacity, k))
    }

    /// The admission threshold `k`.
    pub fn k_value(&self) -> u32 {
        self.k
    }

    /// Number of keys currently tracked by the history cache.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Pre-admission hit count recorded for `key`, if any.
    pub fn history_count(&self, key: &K) -> Option<u32> {
        self.history.peek(key).copied()
    }

    // Bumps the history count without promoting; returns the new count.
    fn record_touch(&mut self, key: &K) -> u32 {
        let count = self.history.get(key).copied().unwrap_or(0) + 1;
        self.history.insert(key.clone(), count);
        count
    }
}

impl<K, V> CoreCache<K, V> for LruKCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.main.contains(&key) {
            return self.main.insert(key, value);
        }

        let count = self.record_touch(&key);
        if count >= self.k {
            self.history.remove(&key);
            self.main.insert(key, value);
        }
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.record_touch(key);
        self.main.get(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.main.contains(key)
    }

    fn len(&self) -> usize {
        self.main.len()
    }

    fn capacity(&self) -> usize {
        self.main.capacity()
    }

    fn clear(&mut self) {
        self.main.clear();
        self.history.clear();
    }
}

impl<K, V> MutableCache<K, V> for LruKCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        self.history.remove(key);
        self.main.remove(key)
    }
}

impl<K, V> fmt::Debug for LruKCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruKCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("history_len", &self.history.len())
            .field("k", &self.k)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_keys_are_filtered() {
        let mut cache = LruKCache::new(4);
        cache.insert(1, "v");
        assert!(!cache.contains(&1));
        assert_eq!(cache.history_count(&1), Some(1));
    }

    #[test]
    fn second_touch_admits() {
        let mut cache = LruKCache::new(4);
        cache.insert(1, "first");
        cache.insert(1, "second");
        assert_eq!(cache.get(&1), Some(&"second"));
        // Admission clears the history record.
        assert_eq!(cache.history_count(&1), None);
    }

    #[test]
    fn get_counts_toward_admission() {
        let mut cache = LruKCache::new(4);
        assert_eq!(cache.get(&1), None); // touch 1
        cache.insert(1, "v"); // touch 2 → admit
        assert_eq!(cache.get(&1), Some(&"v"));
    }

    #[test]
    fn resident_keys_update_in_place() {
        let mut cache = LruKCache::new(4);
        cache.insert(1, "a");
        cache.insert(1, "b"); // admitted with "b"
        assert_eq!(cache.insert(1, "c"), Some("b"));
        assert_eq!(cache.get(&1), Some(&"c"));
    }

    #[test]
    fn higher_threshold_needs_more_touches() {
        let mut cache = LruKCache::with_params(4, 4, 3);
        cache.insert(1, "a");
        cache.insert(1, "a");
        assert!(!cache.contains(&1));
        cache.insert(1, "a");
        assert!(cache.contains(&1));
        assert_eq!(cache.k_value(), 3);
    }

    #[test]
    fn scan_does_not_flush_warm_keys() {
        // Main capacity 2. Warm up keys 1 and 2, then stream 20 cold keys:
        // none of them reach the threshold, so the residents survive.
        let mut cache = LruKCache::with_params(2, 8, 2);
        cache.insert(1, "one");
        cache.insert(1, "one");
        cache.insert(2, "two");
        cache.insert(2, "two");

        for cold in 100..120 {
            cache.insert(cold, "noise");
        }

        assert!(cache.contains(&1));
        assert!(cache.contains(&2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn history_is_bounded() {
        let mut cache: LruKCache<u32, &str> = LruKCache::with_params(2, 4, 2);
        for key in 0..10 {
            cache.insert(key, "v");
        }
        assert!(cache.history_len() <= 4);
    }

    #[test]
    fn remove_clears_both_caches() {
        let mut cache = LruKCache::new(4);
        cache.insert(1, "a");
        cache.insert(1, "a");
        assert_eq!(cache.remove(&1), Some("a"));
        assert_eq!(cache.history_count(&1), None);
        assert_eq!(cache.remove(&1), None);
    }

    #[test]
    fn try_with_params_rejects_zero_threshold() {
        let err = LruKCache::<u32, u32>::try_with_params(4, 4, 0).unwrap_err();
        assert!(err.to_string().contains("threshold"));
        assert!(LruKCache::<u32, u32>::try_with_params(4, 4, 2).is_ok());
    }

    #[test]
    fn zero_capacity_main_admits_nothing() {
        let mut cache = LruKCache::with_params(0, 4, 2);
        cache.insert(1, "a");
        cache.insert(1, "a");
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn clear_resets_history_too() {
        let mut cache = LruKCache::new(4);
        cache.insert(1, "a");
        cache.clear();
        assert_eq!(cache.history_count(&1), None);
        assert!(cache.is_empty());
    }
}
