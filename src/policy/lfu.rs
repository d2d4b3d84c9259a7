//! Least Frequently Used (LFU) replacement policy with frequency aging.
//!
//! Entries live in per-frequency bucket lists with a min-frequency pointer
//! (see [`FrequencyBuckets`]); the eviction victim is the oldest entry of
//! the lowest bucket. On top of that sits the aging rule: the cache tracks
//! the running sum of resident frequencies, and whenever the integer
//! average exceeds `max_avg`, every frequency is reduced by `max_avg / 2`
//! (floored at 1) and rebucketed.
//!
//! Without aging, a key that was hot last week keeps a towering counter
//! forever and newly hot keys can never displace it; the periodic halving
//! decays stale heat and also keeps the counters bounded.
//!
//! ```text
//! get(k) hit:  bucket[f] → bucket[f+1], min_freq fixed up, total += 1
//!              then: total / len > max_avg ?  → age_all(max_avg / 2)
//! insert new:  evict oldest of bucket[min_freq] if full (total -= its freq)
//!              entry starts in bucket[1], min_freq = 1, total += 1
//! ```

use std::fmt;
use std::hash::Hash;

use tracing::debug;

use crate::ds::freq_buckets::FrequencyBuckets;
use crate::error::ConfigError;
use crate::traits::{CoreCache, LfuCacheTrait, MutableCache};

#[cfg(feature = "metrics")]
use crate::metrics::CacheStats;

/// Default aging trigger: age once the mean resident frequency exceeds 10.
pub const DEFAULT_MAX_AVG: u64 = 10;

/// LFU cache core with average-frequency aging.
///
/// # Example
///
/// ```
/// use polycache::policy::lfu::LfuCore;
/// use polycache::traits::CoreCache;
///
/// let mut cache = LfuCore::new(2);
/// cache.insert(1, "a");
/// cache.insert(2, "b");
/// cache.get(&1);
/// cache.get(&1);
///
/// // 2 has the lower frequency, so it is the victim.
/// cache.insert(3, "c");
/// assert!(cache.contains(&1));
/// assert!(!cache.contains(&2));
/// ```
pub struct LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    buckets: FrequencyBuckets<K, V>,
    capacity: usize,
    max_avg: u64,
    freq_total: u64,
    #[cfg(feature = "metrics")]
    stats: CacheStats,
}

impl<K, V> LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LFU cache with the default aging trigger
    /// ([`DEFAULT_MAX_AVG`]).
    pub fn new(capacity: usize) -> Self {
        Self::with_max_avg(capacity, DEFAULT_MAX_AVG)
    }

    /// Creates an LFU cache that ages once the mean resident frequency
    /// exceeds `max_avg`.
    pub fn with_max_avg(capacity: usize, max_avg: u64) -> Self {
        Self {
            buckets: FrequencyBuckets::with_capacity(capacity),
            capacity,
            max_avg,
            freq_total: 0,
            #[cfg(feature = "metrics")]
            stats: CacheStats::default(),
        }
    }

    /// Fallible constructor that rejects a zero aging trigger.
    pub fn try_with_max_avg(capacity: usize, max_avg: u64) -> Result<Self, ConfigError> {
        if max_avg == 0 {
            return Err(ConfigError::new("lfu aging trigger must be at least 1"));
        }
        Ok(Self::with_max_avg(capacity, max_avg))
    }

    /// Current access frequency of `key`, if resident.
    pub fn frequency_of(&self, key: &K) -> Option<u64> {
        self.buckets.frequency(key)
    }

    /// Sum of all resident frequencies (the aging accumulator).
    pub fn frequency_total(&self) -> u64 {
        self.freq_total
    }

    #[cfg(feature = "metrics")]
    /// Snapshot of the operation counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // One access happened: bump the accumulator and age if the mean crossed
    // the trigger.
    fn on_access(&mut self) {
        self.freq_total += 1;
        self.maybe_age();
    }

    fn maybe_age(&mut self) {
        let len = self.buckets.len() as u64;
        if len == 0 {
            return;
        }
        if self.freq_total / len > self.max_avg {
            let decrement = self.max_avg / 2;
            let before = self.freq_total;
            self.freq_total = self.buckets.age_all(decrement);
            debug!(
                entries = len,
                decrement,
                freq_total_before = before,
                freq_total_after = self.freq_total,
                "lfu aging pass"
            );
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.buckets.len() <= self.capacity);
        let sum: u64 = self.buckets.iter().map(|(_, _, freq)| freq).sum();
        assert_eq!(sum, self.freq_total);
        for (_, _, freq) in self.buckets.iter() {
            assert!(freq >= 1);
        }
        self.buckets.debug_validate_invariants();
    }
}

impl<K, V> CoreCache<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.stats.record_insert_call();

        if self.buckets.contains(&key) {
            #[cfg(feature = "metrics")]
            self.stats.record_insert_update();

            let old = self.buckets.insert(key.clone(), value);
            // An update counts as an access, same as a hit on get.
            self.buckets.touch(&key);
            self.on_access();
            return old;
        }

        if self.capacity == 0 {
            return None;
        }

        #[cfg(feature = "metrics")]
        self.stats.record_insert_new();

        if self.buckets.len() >= self.capacity {
            if let Some((_, _, freq)) = self.buckets.pop_min() {
                self.freq_total -= freq;
                #[cfg(feature = "metrics")]
                self.stats.record_eviction();
            }
        }

        self.buckets.insert(key, value);
        self.on_access();
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        if self.buckets.touch(key).is_none() {
            #[cfg(feature = "metrics")]
            self.stats.record_get_miss();
            return None;
        }
        #[cfg(feature = "metrics")]
        self.stats.record_get_hit();

        self.on_access();
        self.buckets.get(key)
    }

    fn contains(&self, key: &K) -> bool {
        self.buckets.contains(key)
    }

    fn len(&self) -> usize {
        self.buckets.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.buckets.clear();
        self.freq_total = 0;
    }
}

impl<K, V> MutableCache<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let (value, freq) = self.buckets.remove(key)?;
        self.freq_total -= freq;
        Some(value)
    }
}

impl<K, V> LfuCacheTrait<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lfu(&mut self) -> Option<(K, V)> {
        let (key, value, freq) = self.buckets.pop_min()?;
        self.freq_total -= freq;
        Some((key, value))
    }

    fn peek_lfu(&self) -> Option<(&K, &V)> {
        self.buckets.peek_min().map(|(key, value, _)| (key, value))
    }

    fn frequency(&self, key: &K) -> Option<u64> {
        self.buckets.frequency(key)
    }
}

impl<K, V> fmt::Debug for LfuCore<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("max_avg", &self.max_avg)
            .field("freq_total", &self.freq_total)
            .finish_non_exhaustive()
    }
}
