//! Hash-partitioned wrapper: N independent inner policies, one mutex each.
//!
//! A single-policy cache serializes every caller behind one lock. The
//! sharded wrapper splits the key space across `N` inner policies chosen by
//! [`ShardSelector`]; an operation locks only the shard that owns its key,
//! so disjoint keys proceed in parallel. There is no cross-shard
//! coordination of any kind — the price is that each shard enforces its own
//! `ceil(total / N)` slice of the capacity, so per-key capacity sharing is
//! slightly imbalanced.
//!
//! ```text
//!             insert(k, v)
//!                  │
//!                  ▼
//!        shard = hash(seed, k) % N
//!                  │
//!   ┌──────────┬───┴──────┬──────────┐
//!   ▼          ▼          ▼          ▼
//! Mutex<C>  Mutex<C>   Mutex<C>   Mutex<C>
//!  shard 0   shard 1    shard 2    shard 3
//! ```
//!
//! The wrapper works over any [`MutableCache`]; `get` clones the value out
//! because a reference cannot outlive the shard lock.

use parking_lot::Mutex;
use std::hash::Hash;
use std::marker::PhantomData;

use tracing::debug;

use crate::ds::shard::ShardSelector;
use crate::policy::arc::ArcCache;
use crate::policy::lfu::LfuCore;
use crate::policy::lru::LruCore;
use crate::policy::lru_k::LruKCache;
use crate::traits::{ConcurrentCache, MutableCache};

/// Sharded LRU cache.
pub type ShardedLru<K, V> = Sharded<K, V, LruCore<K, V>>;
/// Sharded aging-LFU cache.
pub type ShardedLfu<K, V> = Sharded<K, V, LfuCore<K, V>>;
/// Sharded ARC cache.
pub type ShardedArc<K, V> = Sharded<K, V, ArcCache<K, V>>;
/// Sharded LRU-K cache.
pub type ShardedLruK<K, V> = Sharded<K, V, LruKCache<K, V>>;

/// Hash-partitioned concurrent wrapper around any [`MutableCache`].
///
/// # Example
///
/// ```
/// use polycache::policy::sharded::Sharded;
///
/// let cache = Sharded::lru(64, 4);
/// cache.insert(1, "one");
/// assert_eq!(cache.get(&1), Some("one"));
/// assert_eq!(cache.shard_count(), 4);
/// ```
pub struct Sharded<K, V, C> {
    shards: Vec<Mutex<C>>,
    selector: ShardSelector,
    capacity: usize,
    _marker: PhantomData<fn(K, V)>,
}

impl<K, V, C> Sharded<K, V, C>
where
    K: Eq + Hash,
    C: MutableCache<K, V>,
{
    /// Builds a sharded cache from an inner-policy constructor, which is
    /// called once per shard with the per-shard capacity
    /// (`ceil(total_capacity / N)`).
    ///
    /// A `shard_count` of 0 resolves to the machine's available
    /// parallelism.
    pub fn with_constructor(
        total_capacity: usize,
        shard_count: usize,
        mut build: impl FnMut(usize) -> C,
    ) -> Self {
        let shard_count = resolve_shard_count(shard_count);
        let per_shard = total_capacity.div_ceil(shard_count);
        let shards = (0..shard_count).map(|_| Mutex::new(build(per_shard))).collect();
        Self {
            shards,
            selector: ShardSelector::new(shard_count, 0),
            capacity: total_capacity,
            _marker: PhantomData,
        }
    }

    /// Inserts into the owning shard; returns the value it replaced.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        let shard = self.selector.shard_for_key(&key);
        self.shards[shard].lock().insert(key, value)
    }

    /// Looks up `key` in its owning shard, cloning the value out.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let shard = self.selector.shard_for_key(key);
        self.shards[shard].lock().get(key).cloned()
    }

    /// Removes `key` from its owning shard; no-op if absent.
    pub fn remove(&self, key: &K) -> Option<V> {
        let shard = self.selector.shard_for_key(key);
        self.shards[shard].lock().remove(key)
    }

    /// Returns `true` if `key` is resident in its owning shard.
    pub fn contains(&self, key: &K) -> bool {
        let shard = self.selector.shard_for_key(key);
        self.shards[shard].lock().contains(key)
    }

    /// Total residents across all shards.
    ///
    /// Shards are sampled one at a time; under concurrent mutation the sum
    /// is a point-in-time approximation.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    /// Returns `true` if every shard is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The configured total capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Capacity each shard enforces locally.
    pub fn shard_capacity(&self) -> usize {
        self.shards
            .first()
            .map(|shard| shard.lock().capacity())
            .unwrap_or(0)
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Shard index that owns `key`. Exposed for tests and debugging.
    pub fn shard_for(&self, key: &K) -> usize {
        self.selector.shard_for_key(key)
    }

    /// Drains every shard.
    pub fn purge(&self) {
        for shard in &self.shards {
            shard.lock().clear();
        }
        debug!(shards = self.shards.len(), "sharded cache purged");
    }
}

impl<K, V> Sharded<K, V, LruCore<K, V>>
where
    K: Eq + Hash + Clone,
{
    /// Sharded LRU with `total_capacity` split across `shard_count` shards
    /// (0 ⇒ available parallelism).
    pub fn lru(total_capacity: usize, shard_count: usize) -> Self {
        Self::with_constructor(total_capacity, shard_count, LruCore::new)
    }
}

impl<K, V> Sharded<K, V, LfuCore<K, V>>
where
    K: Eq + Hash + Clone,
{
    /// Sharded aging-LFU with the default aging trigger.
    pub fn lfu(total_capacity: usize, shard_count: usize) -> Self {
        Self::with_constructor(total_capacity, shard_count, LfuCore::new)
    }

    /// Sharded aging-LFU with an explicit aging trigger.
    pub fn lfu_with_max_avg(total_capacity: usize, shard_count: usize, max_avg: u64) -> Self {
        Self::with_constructor(total_capacity, shard_count, |capacity| {
            LfuCore::with_max_avg(capacity, max_avg)
        })
    }
}

impl<K, V> Sharded<K, V, ArcCache<K, V>>
where
    K: Eq + Hash + Clone,
{
    /// Sharded ARC with the default promotion threshold.
    pub fn arc(total_capacity: usize, shard_count: usize) -> Self {
        Self::with_constructor(total_capacity, shard_count, ArcCache::new)
    }
}

impl<K, V, C> ConcurrentCache for Sharded<K, V, C> where C: Send {}

impl<K, V, C> std::fmt::Debug for Sharded<K, V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sharded")
            .field("shards", &self.shards.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

fn resolve_shard_count(requested: usize) -> usize {
    if requested > 0 {
        return requested;
    }
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
