//! Least Recently Used (LRU) replacement policy.
//!
//! One recency list plus one hash index. Every hit splices the entry to the
//! MRU end; overflow evicts from the LRU end.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        LruCore<K, V> Layout                       │
//! │                                                                   │
//! │   index: FxHashMap<K, NodeId>     list: NodeList<LruEntry<K, V>>  │
//! │                                                                   │
//! │   ┌─────────┬─────────┐           front                back       │
//! │   │   Key   │ NodeId  │            MRU                  LRU       │
//! │   ├─────────┼─────────┤             │                    │        │
//! │   │ "page3" │  id_2   │────────►  [p3]  ◄──►  [p1] ◄──► [p2]      │
//! │   │ "page1" │  id_0   │                                  ▲        │
//! │   │ "page2" │  id_1   │                          evicted first    │
//! │   └─────────┴─────────┘                                           │
//! └───────────────────────────────────────────────────────────────────┘
//!
//! get("page2"): index lookup → splice id_1 to front → return &value
//! insert(new) at capacity: pop back, erase its key, push new at front
//! ```
//!
//! The list is threaded through an arena by stable handles, so a hit is two
//! hash lookups and a pointer-free splice; there are no reference cycles to
//! leak and no `unsafe`.
//!
//! ## Operations
//!
//! | Operation  | Time | Notes                              |
//! |------------|------|------------------------------------|
//! | `get`      | O(1) | refreshes recency                  |
//! | `insert`   | O(1) | may evict the LRU entry            |
//! | `remove`   | O(1) | arbitrary key removal              |
//! | `peek`     | O(1) | no recency update                  |
//! | `pop_lru`  | O(1) | explicit eviction                  |
//!
//! ## Thread safety
//!
//! `LruCore` is externally synchronized (`&mut self`). For concurrent use,
//! wrap it in [`Sharded`](crate::policy::sharded::Sharded), which holds one
//! mutex per shard.

use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

use crate::ds::arena::NodeId;
use crate::ds::list::NodeList;
use crate::traits::{CoreCache, LruCacheTrait, MutableCache};

#[cfg(feature = "metrics")]
use crate::metrics::CacheStats;

#[derive(Debug)]
struct LruEntry<K, V> {
    key: K,
    value: V,
}

/// LRU cache core: recency list + hash index.
///
/// # Example
///
/// ```
/// use polycache::policy::lru::LruCore;
/// use polycache::traits::CoreCache;
///
/// let mut cache = LruCore::new(2);
/// cache.insert(1, "one");
/// cache.insert(2, "two");
/// cache.get(&1);              // 1 is now MRU
/// cache.insert(3, "three");   // evicts 2, the LRU
///
/// assert!(cache.contains(&1));
/// assert!(!cache.contains(&2));
/// assert!(cache.contains(&3));
/// ```
pub struct LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, NodeId>,
    list: NodeList<LruEntry<K, V>>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    stats: CacheStats,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 creates a cache that discards every insert.
    pub fn new(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: NodeList::with_capacity(capacity),
            capacity,
            #[cfg(feature = "metrics")]
            stats: CacheStats::default(),
        }
    }

    /// Read-only lookup that does not refresh recency.
    ///
    /// ```
    /// use polycache::policy::lru::LruCore;
    /// use polycache::traits::CoreCache;
    ///
    /// let mut cache = LruCore::new(2);
    /// cache.insert(1, "a");
    /// cache.insert(2, "b");
    /// cache.peek(&1);             // 1 stays LRU
    /// cache.insert(3, "c");       // so 1 is the victim
    /// assert!(!cache.contains(&1));
    /// ```
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    #[cfg(feature = "metrics")]
    /// Snapshot of the operation counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.index.len(), self.list.len());
        assert!(self.list.len() <= self.capacity);
        for (key, &id) in &self.index {
            let entry = self.list.get(id).expect("indexed node missing from list");
            assert!(&entry.key == key);
        }
        self.list.debug_validate_invariants();
    }
}

impl<K, V> CoreCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.stats.record_insert_call();

        if let Some(&id) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.stats.record_insert_update();

            let old = self
                .list
                .get_mut(id)
                .map(|entry| std::mem::replace(&mut entry.value, value));
            self.list.move_to_front(id);
            return old;
        }

        if self.capacity == 0 {
            return None;
        }

        #[cfg(feature = "metrics")]
        self.stats.record_insert_new();

        if self.index.len() >= self.capacity {
            if let Some(evicted) = self.list.pop_back() {
                self.index.remove(&evicted.key);
                #[cfg(feature = "metrics")]
                self.stats.record_eviction();
            }
        }

        let id = self.list.push_front(LruEntry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let id = match self.index.get(key) {
            Some(&id) => id,
            None => {
                #[cfg(feature = "metrics")]
                self.stats.record_get_miss();
                return None;
            },
        };
        #[cfg(feature = "metrics")]
        self.stats.record_get_hit();

        self.list.move_to_front(id);
        self.list.get(id).map(|entry| &entry.value)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }
}

impl<K, V> MutableCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_back()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.list.move_to_front(id),
            None => false,
        }
    }
}

impl<K, V> fmt::Debug for LruCore<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// LRU cache with a default capacity of 16.
    fn default() -> Self {
        Self::new(16)
    }
}

impl<K, V> Extend<(K, V)> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
