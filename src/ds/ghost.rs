//! Bounded key-only recency list for evicted keys.
//!
//! Adaptive policies keep one of these per resident list: when an entry is
//! evicted its key is recorded here, and a later access to that key (a
//! "ghost hit") proves the resident list was undersized. Values are never
//! stored.
//!
//! ```text
//!   index: FxHashMap<K, NodeId>      list: NodeList<K>
//!
//!   "a" -> id_0                      front [a] <-> [b] <-> [c] back
//!   "b" -> id_1                        MRU                  LRU
//!   "c" -> id_2
//!
//!   record(d) at capacity 3: pop "c" from the back, push "d" at the front.
//!   record(a): splice "a" back to the front.
//! ```
//!
//! A capacity of 0 makes every operation a no-op, which is how policies with
//! no ghost tracking disable it.

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::ds::arena::NodeId;
use crate::ds::list::NodeList;

/// Bounded recency list of keys with O(1) record, lookup, and take.
#[derive(Debug)]
pub struct GhostList<K> {
    list: NodeList<K>,
    index: FxHashMap<K, NodeId>,
    capacity: usize,
}

impl<K> GhostList<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a ghost list tracking at most `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        Self {
            list: NodeList::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns `true` if `key` is tracked. This is the ghost-hit probe.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Records `key` as most recently evicted. An already-tracked key is
    /// spliced to the MRU position; at capacity the LRU key is dropped.
    pub fn record(&mut self, key: K) {
        if self.capacity == 0 {
            return;
        }
        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_front(id);
            return;
        }
        if self.list.len() >= self.capacity {
            if let Some(oldest) = self.list.pop_back() {
                self.index.remove(&oldest);
            }
        }
        let id = self.list.push_front(key.clone());
        self.index.insert(key, id);
    }

    /// Consumes a ghost hit: removes `key` and reports whether it was
    /// present.
    pub fn take(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(id) => {
                self.list.remove(id);
                true
            },
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.index.clear();
    }
}

impl<K> GhostList<K>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.list.len(), self.index.len());
        assert!(self.list.len() <= self.capacity);
        for key in self.list.iter() {
            let id = self.index.get(key).expect("listed key missing from index");
            assert_eq!(self.list.get(*id), Some(key));
        }
        self.list.debug_validate_invariants();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_evicts_least_recent_past_capacity() {
        let mut ghost = GhostList::new(2);
        ghost.record("a");
        ghost.record("b");
        ghost.record("c");

        assert!(!ghost.contains(&"a"));
        assert!(ghost.contains(&"b"));
        assert!(ghost.contains(&"c"));
        assert_eq!(ghost.len(), 2);
        ghost.debug_validate_invariants();
    }

    #[test]
    fn re_record_promotes_to_mru() {
        let mut ghost = GhostList::new(2);
        ghost.record("a");
        ghost.record("b");
        ghost.record("a"); // a is now MRU
        ghost.record("c"); // evicts b, the LRU

        assert!(ghost.contains(&"a"));
        assert!(!ghost.contains(&"b"));
        assert!(ghost.contains(&"c"));
    }

    #[test]
    fn take_consumes_the_hit() {
        let mut ghost = GhostList::new(4);
        ghost.record("a");
        assert!(ghost.take(&"a"));
        assert!(!ghost.take(&"a"));
        assert!(ghost.is_empty());
        ghost.debug_validate_invariants();
    }

    #[test]
    fn zero_capacity_tracks_nothing() {
        let mut ghost = GhostList::new(0);
        ghost.record("a");
        assert!(!ghost.contains(&"a"));
        assert!(ghost.is_empty());
    }

    #[test]
    fn clear_resets_state() {
        let mut ghost = GhostList::new(4);
        ghost.record("a");
        ghost.record("b");
        ghost.clear();
        assert!(ghost.is_empty());
        assert!(!ghost.contains(&"a"));
        ghost.debug_validate_invariants();
    }
}
