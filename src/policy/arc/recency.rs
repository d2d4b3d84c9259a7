//! Recency half of the adaptive cache: resident LRU list + ghost list.
//!
//! Keys seen once live here. Each resident entry carries a hit count; the
//! composite promotes an entry into the frequency half once the count
//! reaches the promotion threshold. Evicted keys are remembered in the
//! ghost list so that a later access can prove this half was undersized.

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::arena::NodeId;
use crate::ds::ghost::GhostList;
use crate::ds::list::NodeList;

#[derive(Debug)]
struct RecencyEntry<K, V> {
    key: K,
    value: V,
    hits: u32,
}

/// Resident LRU list with hit counts, plus a ghost list of evicted keys.
#[derive(Debug)]
pub struct RecencyHalf<K, V>
where
    K: Eq + Hash + Clone,
{
    index: FxHashMap<K, NodeId>,
    list: NodeList<RecencyEntry<K, V>>,
    ghost: GhostList<K>,
    capacity: usize,
    promote_at: u32,
}

impl<K, V> RecencyHalf<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize, ghost_capacity: usize, promote_at: u32) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            list: NodeList::with_capacity(capacity),
            ghost: GhostList::new(ghost_capacity),
            capacity,
            promote_at,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ghost_len(&self) -> usize {
        self.ghost.len()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts or updates. A full half evicts its LRU entry into the ghost
    /// list first; a zero-capacity half discards the insert.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
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
        if self.index.len() >= self.capacity {
            self.evict_lru();
        }

        let id = self.list.push_front(RecencyEntry {
            key: key.clone(),
            value,
            hits: 1,
        });
        self.index.insert(key, id);
        None
    }

    /// Registers a hit: splices the entry to MRU, bumps its count, and
    /// reports whether the count has reached the promotion threshold.
    pub fn hit(&mut self, key: &K) -> Option<bool> {
        let id = *self.index.get(key)?;
        self.list.move_to_front(id);
        let hits = self.list.get_mut(id).map(|entry| {
            entry.hits = entry.hits.saturating_add(1);
            entry.hits
        })?;
        Some(hits >= self.promote_at)
    }

    /// Value of a resident key, without touching recency or hit counts.
    pub fn value(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    /// Removes a resident entry without recording a ghost. Used for
    /// promotion into the frequency half and for explicit removal.
    pub fn take(&mut self, key: &K) -> Option<V> {
        let id = self.index.remove(key)?;
        self.list.remove(id).map(|entry| entry.value)
    }

    /// Consumes a ghost hit for `key`; `true` if the key was tracked.
    pub fn check_ghost(&mut self, key: &K) -> bool {
        self.ghost.take(key)
    }

    /// Grants this half one more slot of resident capacity.
    pub fn increase_capacity(&mut self) {
        self.capacity += 1;
    }

    /// Gives up one slot of resident capacity, evicting the LRU entry into
    /// the ghost list if the half is currently full. Refuses (returns
    /// `false`) when the capacity is already 0.
    pub fn decrease_capacity(&mut self) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.index.len() >= self.capacity {
            self.evict_lru();
        }
        self.capacity -= 1;
        true
    }

    /// Clears all state and re-arms with a fresh capacity.
    pub fn reset(&mut self, capacity: usize) {
        self.index.clear();
        self.list.clear();
        self.ghost.clear();
        self.capacity = capacity;
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> {
        self.list.iter().map(|entry| &entry.key)
    }

    fn evict_lru(&mut self) {
        if let Some(entry) = self.list.pop_back() {
            self.index.remove(&entry.key);
            self.ghost.record(entry.key);
        }
    }
}

impl<K, V> RecencyHalf<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.index.len(), self.list.len());
        assert!(self.list.len() <= self.capacity);
        self.list.debug_validate_invariants();
        self.ghost.debug_validate_invariants();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eviction_records_ghost() {
        let mut half = RecencyHalf::new(2, 4, 2);
        half.insert(1, "a");
        half.insert(2, "b");
        half.insert(3, "c");

        assert!(!half.contains(&1));
        assert!(half.check_ghost(&1));
        assert!(!half.check_ghost(&1)); // consumed
        assert_eq!(half.len(), 2);
    }

    #[test]
    fn hit_reports_promotion_at_threshold() {
        let mut half = RecencyHalf::new(4, 4, 2);
        half.insert(1, "a");
        // Insert counts as the first sighting; the first hit reaches 2.
        assert_eq!(half.hit(&1), Some(true));
        assert_eq!(half.hit(&99), None);

        let mut high = RecencyHalf::new(4, 4, 3);
        high.insert(1, "a");
        assert_eq!(high.hit(&1), Some(false));
        assert_eq!(high.hit(&1), Some(true));
    }

    #[test]
    fn take_skips_ghost() {
        let mut half = RecencyHalf::new(2, 4, 2);
        half.insert(1, "a");
        assert_eq!(half.take(&1), Some("a"));
        assert!(!half.check_ghost(&1));
        assert!(half.is_empty());
    }

    #[test]
    fn decrease_capacity_evicts_when_full() {
        let mut half = RecencyHalf::new(2, 4, 2);
        half.insert(1, "a");
        half.insert(2, "b");

        assert!(half.decrease_capacity());
        assert_eq!(half.capacity(), 1);
        assert_eq!(half.len(), 1);
        assert_eq!(half.ghost_len(), 1);

        assert!(half.decrease_capacity());
        assert_eq!(half.capacity(), 0);
        assert!(half.is_empty());

        assert!(!half.decrease_capacity());
        half.increase_capacity();
        assert_eq!(half.capacity(), 1);
        half.debug_validate_invariants();
    }

    #[test]
    fn zero_capacity_discards() {
        let mut half = RecencyHalf::new(0, 0, 2);
        half.insert(1, "a");
        assert!(half.is_empty());
        assert_eq!(half.value(&1), None);
    }

    #[test]
    fn update_moves_to_front_without_count() {
        let mut half = RecencyHalf::new(2, 4, 2);
        half.insert(1, "a");
        half.insert(2, "b");
        assert_eq!(half.insert(1, "a2"), Some("a"));
        half.insert(3, "c"); // evicts 2, not 1
        assert!(half.contains(&1));
        assert!(!half.contains(&2));
    }
}
