//! Adaptive Replacement Cache (ARC).
//!
//! Splits the configured capacity between two resident halves and lets
//! ghost hits move the boundary:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                         ArcCache<K, V> Layout                        │
//! │                                                                      │
//! │   Recency half (seen once)          Frequency half (seen repeatedly) │
//! │   ┌────────────────────────┐        ┌────────────────────────────┐   │
//! │   │ resident LRU list      │ promote│ resident frequency buckets │   │
//! │   │ (entry carries hits)   │ ──────►│ (min-freq eviction)        │   │
//! │   │ capacity: p            │        │ capacity: c - p            │   │
//! │   └──────────┬─────────────┘        └──────────┬─────────────────┘   │
//! │              │ evict                           │ evict               │
//! │              ▼                                 ▼                     │
//! │   ┌────────────────────────┐        ┌────────────────────────────┐   │
//! │   │ ghost list (keys only) │        │ ghost list (keys only)     │   │
//! │   └────────────────────────┘        └────────────────────────────┘   │
//! │                                                                      │
//! │   ghost hit on the recency side  → p grows   (recency was starved)   │
//! │   ghost hit on the frequency side → p shrinks (frequency starved)    │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A ghost hit proves the corresponding half recently evicted something it
//! should have kept, so one slot of capacity is transferred from the other
//! half: the donor half first evicts a resident into its own ghost list if
//! it is full, then gives up the slot; if the donor is already at zero the
//! transfer is skipped. The step is ±1 per ghost hit, so the split
//! converges smoothly instead of oscillating. Rebalancing fires on reads
//! as well as writes — the access itself is the evidence.
//!
//! New keys enter the recency half. A resident recency entry whose hit
//! count reaches the promotion threshold (insert counts as the first hit)
//! *moves* into the frequency half. The two halves never share a key.
//!
//! ## Per-key state machine
//!
//! ```text
//! ABSENT ──insert──► RECENCY ──hits reach K──► FREQUENCY
//!    ▲                  │ evict                    │ evict
//!    │                  ▼                          ▼
//!    │              GHOST(rec) ──hit: p += 1──► RECENCY (via insert)
//!    │                  │
//!    └──overflow────GHOST(freq) ──hit: p -= 1─► RECENCY (via insert)
//! ```
//!
//! ## Thread safety
//!
//! `ArcCache` is externally synchronized (`&mut self`); use
//! [`Sharded`](crate::policy::sharded::Sharded) for concurrent access.

pub mod frequency;
pub mod recency;

use std::fmt;
use std::hash::Hash;

use tracing::trace;

use crate::error::{ConfigError, InvariantError};
use crate::traits::{CoreCache, MutableCache};

pub use frequency::FrequencyHalf;
pub use recency::RecencyHalf;

#[cfg(feature = "metrics")]
use crate::metrics::CacheStats;

/// Default promotion threshold: the second access promotes.
pub const DEFAULT_PROMOTION_THRESHOLD: u32 = 2;

/// Adaptive Replacement Cache composed of a recency half and a frequency
/// half that trade capacity on ghost hits.
///
/// # Example
///
/// ```
/// use polycache::policy::arc::ArcCache;
/// use polycache::traits::CoreCache;
///
/// let mut cache = ArcCache::new(4);
/// cache.insert("page", 1);
/// assert_eq!(cache.recency_len(), 1);
///
/// // Second sighting promotes into the frequency half.
/// cache.get(&"page");
/// assert_eq!(cache.recency_len(), 0);
/// assert_eq!(cache.frequency_len(), 1);
/// ```
pub struct ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    recency: RecencyHalf<K, V>,
    frequency: FrequencyHalf<K, V>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    stats: CacheStats,
}

impl<K, V> ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an ARC cache with the default promotion threshold
    /// ([`DEFAULT_PROMOTION_THRESHOLD`]).
    pub fn new(capacity: usize) -> Self {
        Self::with_threshold(capacity, DEFAULT_PROMOTION_THRESHOLD)
    }

    /// Creates an ARC cache with an explicit promotion threshold.
    ///
    /// The initial split gives the recency half `capacity - capacity / 2`
    /// slots and the frequency half the rest, so a capacity-1 cache still
    /// admits. Each ghost list can hold up to `capacity` keys. A threshold
    /// of 0 is coerced to 1.
    pub fn with_threshold(capacity: usize, promotion_threshold: u32) -> Self {
        let frequency_capacity = capacity / 2;
        let recency_capacity = capacity - frequency_capacity;
        Self {
            recency: RecencyHalf::new(recency_capacity, capacity, promotion_threshold.max(1)),
            frequency: FrequencyHalf::new(frequency_capacity, capacity),
            capacity,
            #[cfg(feature = "metrics")]
            stats: CacheStats::default(),
        }
    }

    /// Fallible constructor that rejects a zero promotion threshold.
    pub fn try_with_threshold(
        capacity: usize,
        promotion_threshold: u32,
    ) -> Result<Self, ConfigError> {
        if promotion_threshold == 0 {
            return Err(ConfigError::new("arc promotion threshold must be at least 1"));
        }
        Ok(Self::with_threshold(capacity, promotion_threshold))
    }

    /// Residents of the recency half.
    pub fn recency_len(&self) -> usize {
        self.recency.len()
    }

    /// Residents of the frequency half.
    pub fn frequency_len(&self) -> usize {
        self.frequency.len()
    }

    /// Current capacity share of the recency half (the adaptive target).
    pub fn recency_capacity(&self) -> usize {
        self.recency.capacity()
    }

    /// Current capacity share of the frequency half.
    pub fn frequency_capacity(&self) -> usize {
        self.frequency.capacity()
    }

    /// Keys tracked by the recency half's ghost list.
    pub fn recency_ghost_len(&self) -> usize {
        self.recency.ghost_len()
    }

    /// Keys tracked by the frequency half's ghost list.
    pub fn frequency_ghost_len(&self) -> usize {
        self.frequency.ghost_len()
    }

    #[cfg(feature = "metrics")]
    /// Snapshot of the operation counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // Probes both ghost lists for `key`. A hit consumes the ghost record
    // and transfers one slot of capacity toward the half that lost the key,
    // provided the donor half can still give one up.
    fn check_ghosts(&mut self, key: &K) -> bool {
        if self.recency.check_ghost(key) {
            if self.frequency.decrease_capacity() {
                self.recency.increase_capacity();
                trace!(
                    recency_capacity = self.recency.capacity(),
                    frequency_capacity = self.frequency.capacity(),
                    "arc rebalance toward recency"
                );
            }
            return true;
        }
        if self.frequency.check_ghost(key) {
            if self.recency.decrease_capacity() {
                self.frequency.increase_capacity();
                trace!(
                    recency_capacity = self.recency.capacity(),
                    frequency_capacity = self.frequency.capacity(),
                    "arc rebalance toward frequency"
                );
            }
            return true;
        }
        false
    }

    /// Cheap structural self-check for tests and debugging tools.
    ///
    /// The full deep walk lives in `debug_validate_invariants` (debug
    /// builds only, panics); this form stays available in release builds
    /// and reports the first contradiction it finds.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.recency.capacity() + self.frequency.capacity() != self.capacity {
            return Err(InvariantError::new(format!(
                "half capacities {} + {} do not sum to the configured {}",
                self.recency.capacity(),
                self.frequency.capacity(),
                self.capacity
            )));
        }
        if self.recency.len() + self.frequency.len() > self.capacity {
            return Err(InvariantError::new("resident entries exceed capacity"));
        }
        if self.recency.len() > self.recency.capacity() {
            return Err(InvariantError::new("recency half exceeds its capacity"));
        }
        if self.frequency.len() > self.frequency.capacity() {
            return Err(InvariantError::new("frequency half exceeds its capacity"));
        }
        Ok(())
    }

}

impl<K, V> ArcCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(
            self.recency.capacity() + self.frequency.capacity(),
            self.capacity,
            "half capacities must sum to the configured total"
        );
        assert!(self.recency.len() + self.frequency.len() <= self.capacity);
        assert!(self.recency.ghost_len() <= self.capacity);
        assert!(self.frequency.ghost_len() <= self.capacity);

        for key in self.recency.keys() {
            assert!(
                !self.frequency.contains(key),
                "key resident in both halves"
            );
        }
        for key in self.frequency.keys() {
            assert!(!self.recency.contains(key), "key resident in both halves");
        }
        self.recency.debug_validate_invariants();
        self.frequency.debug_validate_invariants();
    }
}

impl<K, V> CoreCache<K, V> for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.stats.record_insert_call();

        self.check_ghosts(&key);

        if self.recency.contains(&key) {
            #[cfg(feature = "metrics")]
            self.stats.record_insert_update();
            return self.recency.insert(key, value);
        }
        if self.frequency.contains(&key) {
            #[cfg(feature = "metrics")]
            self.stats.record_insert_update();
            return self.frequency.insert(key, value);
        }

        #[cfg(feature = "metrics")]
        self.stats.record_insert_new();

        // New keys (ghost or cold) always materialize in the recency half;
        // the ghost check above has already moved the capacity boundary.
        self.recency.insert(key, value)
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        // A ghost hit cannot return a value, but the access is still
        // evidence: rebalance before reporting the miss.
        self.check_ghosts(key);

        match self.recency.hit(key) {
            Some(promote) => {
                #[cfg(feature = "metrics")]
                self.stats.record_get_hit();

                if promote && self.frequency.capacity() > 0 {
                    if let Some(value) = self.recency.take(key) {
                        self.frequency.insert(key.clone(), value);
                    }
                    return self.frequency.get(key);
                }
                self.recency.value(key)
            },
            None => {
                #[cfg(feature = "metrics")]
                {
                    if self.frequency.contains(key) {
                        self.stats.record_get_hit();
                    } else {
                        self.stats.record_get_miss();
                    }
                }
                self.frequency.get(key)
            },
        }
    }

    fn contains(&self, key: &K) -> bool {
        self.recency.contains(key) || self.frequency.contains(key)
    }

    fn len(&self) -> usize {
        self.recency.len() + self.frequency.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        let frequency_capacity = self.capacity / 2;
        self.recency.reset(self.capacity - frequency_capacity);
        self.frequency.reset(frequency_capacity);
    }
}

impl<K, V> MutableCache<K, V> for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        // Scrub ghost records without rebalancing: an explicit removal says
        // nothing about either half being undersized.
        self.recency.check_ghost(key);
        self.frequency.check_ghost(key);

        match self.recency.take(key) {
            Some(value) => Some(value),
            None => self.frequency.take(key),
        }
    }
}

impl<K, V> fmt::Debug for ArcCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCache")
            .field("capacity", &self.capacity)
            .field("recency_len", &self.recency.len())
            .field("recency_capacity", &self.recency.capacity())
            .field("frequency_len", &self.frequency.len())
            .field("frequency_capacity", &self.frequency.capacity())
            .field("recency_ghosts", &self.recency.ghost_len())
            .field("frequency_ghosts", &self.frequency.ghost_len())
            .finish_non_exhaustive()
    }
}
