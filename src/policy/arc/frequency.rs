//! Frequency half of the adaptive cache: resident frequency buckets +
//! ghost list.
//!
//! Entries promoted out of the recency half land here and are ranked by
//! access frequency; the eviction victim is the oldest entry of the lowest
//! bucket, and its key is remembered in the ghost list.

use std::hash::Hash;

use crate::ds::freq_buckets::FrequencyBuckets;
use crate::ds::ghost::GhostList;

/// Resident frequency-bucketed store, plus a ghost list of evicted keys.
#[derive(Debug)]
pub struct FrequencyHalf<K, V>
where
    K: Eq + Hash + Clone,
{
    buckets: FrequencyBuckets<K, V>,
    ghost: GhostList<K>,
    capacity: usize,
}

impl<K, V> FrequencyHalf<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize, ghost_capacity: usize) -> Self {
        Self {
            buckets: FrequencyBuckets::with_capacity(capacity),
            ghost: GhostList::new(ghost_capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ghost_len(&self) -> usize {
        self.ghost.len()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.buckets.contains(key)
    }

    /// Current frequency of a resident key.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.buckets.frequency(key)
    }

    /// Inserts at frequency 1, or updates a resident key in place (which
    /// also counts as an access). A full half evicts its least-frequent
    /// entry into the ghost list first; zero capacity discards.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.buckets.contains(&key) {
            let old = self.buckets.insert(key.clone(), value);
            self.buckets.touch(&key);
            return old;
        }

        if self.capacity == 0 {
            return None;
        }
        if self.buckets.len() >= self.capacity {
            self.evict_least_frequent();
        }
        self.buckets.insert(key, value);
        None
    }

    /// Frequency-counting lookup.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.buckets.touch(key)?;
        self.buckets.get(key)
    }

    /// Removes a resident entry without recording a ghost.
    pub fn take(&mut self, key: &K) -> Option<V> {
        self.buckets.remove(key).map(|(value, _)| value)
    }

    /// Consumes a ghost hit for `key`; `true` if the key was tracked.
    pub fn check_ghost(&mut self, key: &K) -> bool {
        self.ghost.take(key)
    }

    /// Grants this half one more slot of resident capacity.
    pub fn increase_capacity(&mut self) {
        self.capacity += 1;
    }

    /// Gives up one slot of resident capacity, evicting the least-frequent
    /// entry into the ghost list if the half is currently full. Refuses
    /// (returns `false`) when the capacity is already 0.
    pub fn decrease_capacity(&mut self) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.buckets.len() >= self.capacity {
            self.evict_least_frequent();
        }
        self.capacity -= 1;
        true
    }

    /// Clears all state and re-arms with a fresh capacity.
    pub fn reset(&mut self, capacity: usize) {
        self.buckets.clear();
        self.ghost.clear();
        self.capacity = capacity;
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> {
        self.buckets.iter().map(|(key, _, _)| key)
    }

    fn evict_least_frequent(&mut self) {
        if let Some((key, _, _)) = self.buckets.pop_min() {
            self.ghost.record(key);
        }
    }
}

impl<K, V> FrequencyHalf<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.buckets.len() <= self.capacity);
        self.buckets.debug_validate_invariants();
        self.ghost.debug_validate_invariants();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_frequent_is_evicted_to_ghost() {
        let mut half = FrequencyHalf::new(2, 4);
        half.insert(1, "a");
        half.insert(2, "b");
        half.get(&2); // freq 2

        half.insert(3, "c"); // evicts 1
        assert!(!half.contains(&1));
        assert!(half.check_ghost(&1));
        assert!(half.contains(&2));
    }

    #[test]
    fn get_counts_frequency() {
        let mut half = FrequencyHalf::new(4, 4);
        half.insert(1, "a");
        assert_eq!(half.frequency(&1), Some(1));
        assert_eq!(half.get(&1), Some(&"a"));
        assert_eq!(half.frequency(&1), Some(2));
        assert_eq!(half.get(&99), None);
    }

    #[test]
    fn update_counts_as_access() {
        let mut half = FrequencyHalf::new(4, 4);
        half.insert(1, "a");
        assert_eq!(half.insert(1, "b"), Some("a"));
        assert_eq!(half.frequency(&1), Some(2));
    }

    #[test]
    fn capacity_transfer_evicts_when_full() {
        let mut half = FrequencyHalf::new(1, 4);
        half.insert(1, "a");

        assert!(half.decrease_capacity());
        assert_eq!(half.capacity(), 0);
        assert!(half.is_empty());
        assert_eq!(half.ghost_len(), 1);
        assert!(!half.decrease_capacity());
    }

    #[test]
    fn zero_capacity_discards() {
        let mut half = FrequencyHalf::new(0, 0);
        half.insert(1, "a");
        assert!(half.is_empty());
    }

    #[test]
    fn take_skips_ghost() {
        let mut half = FrequencyHalf::new(2, 4);
        half.insert(1, "a");
        assert_eq!(half.take(&1), Some("a"));
        assert!(!half.check_ghost(&1));
    }
}
