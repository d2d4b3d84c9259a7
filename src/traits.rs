//! # Cache trait hierarchy
//!
//! One uniform contract the rest of the crate polymorphs over, plus
//! policy-appropriate extensions:
//!
//! ```text
//!                  ┌──────────────────────────────────────┐
//!                  │           CoreCache<K, V>            │
//!                  │                                      │
//!                  │  insert(&mut, K, V) → Option<V>      │
//!                  │  get(&mut, &K) → Option<&V>          │
//!                  │  contains / len / capacity / clear   │
//!                  └──────────────────┬───────────────────┘
//!                                     │
//!                  ┌──────────────────┴───────────────────┐
//!                  │          MutableCache<K, V>          │
//!                  │  remove(&K) → Option<V>              │
//!                  │  remove_batch(&[K])                  │
//!                  └───────┬──────────────────────┬───────┘
//!                          │                      │
//!                          ▼                      ▼
//!         ┌────────────────────────┐  ┌────────────────────────┐
//!         │  LruCacheTrait<K, V>   │  │  LfuCacheTrait<K, V>   │
//!         │  pop_lru / peek_lru    │  │  pop_lfu / peek_lfu    │
//!         │  touch(&K) → bool      │  │  frequency(&K) → u64   │
//!         └────────────────────────┘  └────────────────────────┘
//! ```
//!
//! Misses are `None`, never sentinel values; `insert` returns the value it
//! replaced. A zero-capacity cache silently discards inserts and always
//! misses — callers never see an error from the hot path.
//!
//! All cores take `&mut self` and are synchronized externally;
//! [`Sharded`](crate::policy::sharded::Sharded) supplies the mutex-per-shard
//! concurrent surface and carries the [`ConcurrentCache`] marker.

/// Core operations every cache policy supports.
///
/// # Example
///
/// ```
/// use polycache::traits::CoreCache;
/// use polycache::policy::lru::LruCore;
///
/// fn warm<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCore::new(16);
/// warm(&mut cache, &[(1, "one".into()), (2, "two".into())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts or updates, returning the previous value for an existing
    /// key. At capacity, the policy's victim is evicted first; with zero
    /// capacity the insert is silently discarded.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Policy-counting lookup. Updates the policy's bookkeeping (recency,
    /// frequency, promotion counters); `None` on a miss. Use
    /// [`contains`](Self::contains) to probe without side effects.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Existence probe with no bookkeeping side effects.
    fn contains(&self, key: &K) -> bool;

    /// Number of resident entries.
    fn len(&self) -> usize;

    /// Returns `true` if no entry is resident.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of resident entries.
    fn capacity(&self) -> usize;

    /// Drops every resident entry and all policy bookkeeping.
    fn clear(&mut self);
}

/// Caches that support arbitrary key removal.
///
/// Removal is best-effort: removing an absent key is a no-op that returns
/// `None`.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key`, returning its value if it was resident.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes several keys; results are in input order.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|key| self.remove(key)).collect()
    }
}

/// Recency-policy extensions.
///
/// # Example
///
/// ```
/// use polycache::traits::{CoreCache, LruCacheTrait};
/// use polycache::policy::lru::LruCore;
///
/// let mut cache = LruCore::new(4);
/// cache.insert(1, "first");
/// cache.insert(2, "second");
///
/// assert_eq!(cache.peek_lru(), Some((&1, &"first")));
/// assert!(cache.touch(&1)); // refresh without reading
/// assert_eq!(cache.pop_lru().map(|(k, _)| k), Some(2));
/// ```
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// The least recently used entry, left in place.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Refreshes recency without reading the value; `false` if absent.
    fn touch(&mut self, key: &K) -> bool;
}

/// Frequency-policy extensions.
///
/// # Example
///
/// ```
/// use polycache::traits::{CoreCache, LfuCacheTrait};
/// use polycache::policy::lfu::LfuCore;
///
/// let mut cache = LfuCore::new(4);
/// cache.insert(1, "a");
/// cache.get(&1);
/// assert_eq!(cache.frequency(&1), Some(2));
/// ```
pub trait LfuCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least frequently used entry (FIFO among
    /// ties).
    fn pop_lfu(&mut self) -> Option<(K, V)>;

    /// The least frequently used entry, left in place.
    fn peek_lfu(&self) -> Option<(&K, &V)>;

    /// Access frequency of `key`, if resident.
    fn frequency(&self, key: &K) -> Option<u64>;
}

/// Marker for cache surfaces that are safe to share across threads.
pub trait ConcurrentCache: Send + Sync {}
