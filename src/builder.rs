//! Unified cache builder over the closed set of policies.
//!
//! The policy cores are monomorphized on their concrete types everywhere
//! else in the crate; this module is the one dynamic boundary, for callers
//! (benchmark harnesses, config-driven setup) that pick a policy at
//! runtime. The [`Cache`] enum erases the policy behind a uniform
//! owned-value API.
//!
//! ## Example
//!
//! ```
//! use polycache::builder::{CacheBuilder, PolicyKind};
//!
//! let mut cache = CacheBuilder::new(100).build::<u64, String>(PolicyKind::Lru);
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some("hello".to_string()));
//! ```

use std::hash::Hash;

use crate::policy::arc::ArcCache;
use crate::policy::lfu::LfuCore;
use crate::policy::lru::LruCore;
use crate::policy::lru_k::LruKCache;
use crate::policy::sharded::{Sharded, ShardedLfu, ShardedLru};
use crate::traits::{CoreCache, MutableCache};

/// Selectable eviction policies.
#[derive(Debug, Clone)]
pub enum PolicyKind {
    /// Least Recently Used.
    Lru,
    /// LRU with a hit-count admission filter.
    LruK { history_capacity: usize, k: u32 },
    /// Least Frequently Used with average-frequency aging.
    Lfu { max_avg: u64 },
    /// Adaptive Replacement Cache.
    Arc { promotion_threshold: u32 },
    /// Hash-sharded LRU (0 shards ⇒ available parallelism).
    ShardedLru { shards: usize },
    /// Hash-sharded aging LFU.
    ShardedLfu { shards: usize, max_avg: u64 },
}

/// A cache with its policy chosen at runtime.
///
/// Values are returned by value (`V: Clone`) so the sharded variants fit
/// behind the same surface as the single-threaded cores.
pub struct Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    inner: Inner<K, V>,
}

enum Inner<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    Lru(LruCore<K, V>),
    LruK(LruKCache<K, V>),
    Lfu(LfuCore<K, V>),
    Arc(ArcCache<K, V>),
    ShardedLru(ShardedLru<K, V>),
    ShardedLfu(ShardedLfu<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Inserts a key-value pair; returns the previous value if the key was
    /// resident.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match &mut self.inner {
            Inner::Lru(cache) => cache.insert(key, value),
            Inner::LruK(cache) => cache.insert(key, value),
            Inner::Lfu(cache) => cache.insert(key, value),
            Inner::Arc(cache) => cache.insert(key, value),
            Inner::ShardedLru(cache) => cache.insert(key, value),
            Inner::ShardedLfu(cache) => cache.insert(key, value),
        }
    }

    /// Policy-counting lookup, returning the value by clone.
    pub fn get(&mut self, key: &K) -> Option<V> {
        match &mut self.inner {
            Inner::Lru(cache) => cache.get(key).cloned(),
            Inner::LruK(cache) => cache.get(key).cloned(),
            Inner::Lfu(cache) => cache.get(key).cloned(),
            Inner::Arc(cache) => cache.get(key).cloned(),
            Inner::ShardedLru(cache) => cache.get(key),
            Inner::ShardedLfu(cache) => cache.get(key),
        }
    }

    /// Existence probe with no bookkeeping side effects.
    pub fn contains(&self, key: &K) -> bool {
        match &self.inner {
            Inner::Lru(cache) => cache.contains(key),
            Inner::LruK(cache) => cache.contains(key),
            Inner::Lfu(cache) => cache.contains(key),
            Inner::Arc(cache) => cache.contains(key),
            Inner::ShardedLru(cache) => cache.contains(key),
            Inner::ShardedLfu(cache) => cache.contains(key),
        }
    }

    /// Removes `key`; no-op on absence.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        match &mut self.inner {
            Inner::Lru(cache) => cache.remove(key),
            Inner::LruK(cache) => cache.remove(key),
            Inner::Lfu(cache) => cache.remove(key),
            Inner::Arc(cache) => cache.remove(key),
            Inner::ShardedLru(cache) => cache.remove(key),
            Inner::ShardedLfu(cache) => cache.remove(key),
        }
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        match &self.inner {
            Inner::Lru(cache) => cache.len(),
            Inner::LruK(cache) => cache.len(),
            Inner::Lfu(cache) => cache.len(),
            Inner::Arc(cache) => cache.len(),
            Inner::ShardedLru(cache) => cache.len(),
            Inner::ShardedLfu(cache) => cache.len(),
        }
    }

    /// Returns `true` if no entry is resident.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        match &self.inner {
            Inner::Lru(cache) => cache.capacity(),
            Inner::LruK(cache) => cache.capacity(),
            Inner::Lfu(cache) => cache.capacity(),
            Inner::Arc(cache) => cache.capacity(),
            Inner::ShardedLru(cache) => cache.capacity(),
            Inner::ShardedLfu(cache) => cache.capacity(),
        }
    }

    /// Drops every resident entry.
    pub fn clear(&mut self) {
        match &mut self.inner {
            Inner::Lru(cache) => cache.clear(),
            Inner::LruK(cache) => cache.clear(),
            Inner::Lfu(cache) => cache.clear(),
            Inner::Arc(cache) => cache.clear(),
            Inner::ShardedLru(cache) => cache.purge(),
            Inner::ShardedLfu(cache) => cache.purge(),
        }
    }
}

/// Builder for runtime-selected caches.
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Starts a builder for a cache of `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a cache with the chosen policy.
    ///
    /// ```
    /// use polycache::builder::{CacheBuilder, PolicyKind};
    ///
    /// let lru_k = CacheBuilder::new(100)
    ///     .build::<u64, String>(PolicyKind::LruK { history_capacity: 100, k: 2 });
    /// assert_eq!(lru_k.capacity(), 100);
    ///
    /// let sharded = CacheBuilder::new(100)
    ///     .build::<u64, String>(PolicyKind::ShardedLru { shards: 4 });
    /// assert_eq!(sharded.capacity(), 100);
    /// ```
    pub fn build<K, V>(self, policy: PolicyKind) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        let inner = match policy {
            PolicyKind::Lru => Inner::Lru(LruCore::new(self.capacity)),
            PolicyKind::LruK {
                history_capacity,
                k,
            } => Inner::LruK(LruKCache::with_params(self.capacity, history_capacity, k)),
            PolicyKind::Lfu { max_avg } => {
                Inner::Lfu(LfuCore::with_max_avg(self.capacity, max_avg))
            },
            PolicyKind::Arc {
                promotion_threshold,
            } => Inner::Arc(ArcCache::with_threshold(self.capacity, promotion_threshold)),
            PolicyKind::ShardedLru { shards } => {
                Inner::ShardedLru(Sharded::lru(self.capacity, shards))
            },
            PolicyKind::ShardedLfu { shards, max_avg } => Inner::ShardedLfu(
                Sharded::lfu_with_max_avg(self.capacity, shards, max_avg),
            ),
        };
        Cache { inner }
    }
}
