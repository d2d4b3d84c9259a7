//! Deterministic key→shard routing.
//!
//! Every sharded structure in the crate picks the owning shard the same
//! way: hash the key with the crate's usual [`FxHasher`], fold in the
//! selector's seed, run the result through a 64-bit finisher, and take it
//! modulo the shard count. The same `(key, seed, shards)` triple always
//! lands on the same shard, and distinct seeds decorrelate the mapping
//! when two sharded structures would otherwise collide on the same hot
//! keys.
//!
//! FxHash is fast but leaves its low bits poorly mixed, and the low bits
//! are exactly what a modulo consumes; the splitmix64 finishing step
//! spreads them before the reduction.

use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// Seeded key→shard mapper.
///
/// # Example
///
/// ```
/// use polycache::ds::ShardSelector;
///
/// let selector = ShardSelector::new(4, 0);
/// let shard = selector.shard_for_key(&"user:42");
/// assert!(shard < 4);
/// // Deterministic: the same key maps to the same shard.
/// assert_eq!(selector.shard_for_key(&"user:42"), shard);
/// ```
#[derive(Debug, PartialEq, Eq)]
pub struct ShardSelector {
    shards: usize,
    seed: u64,
}

// splitmix64 finisher (Vigna). One full avalanche round is enough to make
// every input bit reach the low bits the modulo looks at.
fn finish(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

impl ShardSelector {
    /// Creates a selector for `shards` shards (clamped to at least 1) with
    /// the given seed.
    pub fn new(shards: usize, seed: u64) -> Self {
        Self {
            shards: shards.max(1),
            seed,
        }
    }

    /// Number of shards keys are routed across.
    pub fn shard_count(&self) -> usize {
        self.shards
    }

    /// Maps `key` to a shard index in `[0, shards)`.
    pub fn shard_for_key<K: Hash>(&self, key: &K) -> usize {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        (finish(hasher.finish() ^ self.seed) % self.shards as u64) as usize
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The mapping is a pure function of (key, seed, shards).
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_deterministic(
            shard_count in 1usize..64,
            seed in any::<u64>(),
            keys in prop::collection::vec(any::<u32>(), 0..50)
        ) {
            let selector = ShardSelector::new(shard_count, seed);
            let first: Vec<_> = keys.iter().map(|k| selector.shard_for_key(k)).collect();
            let second: Vec<_> = keys.iter().map(|k| selector.shard_for_key(k)).collect();
            prop_assert_eq!(first, second);
        }

        /// Every result is a valid shard index.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_in_range(
            shard_count in 1usize..128,
            seed in any::<u64>(),
            key in any::<u64>()
        ) {
            let selector = ShardSelector::new(shard_count, seed);
            prop_assert!(selector.shard_for_key(&key) < shard_count);
        }

        /// Enough distinct keys reach more than one shard.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_keys_spread(
            shard_count in 2usize..16,
            seed in any::<u64>(),
            keys in prop::collection::hash_set(any::<u32>(), 40..100)
        ) {
            let selector = ShardSelector::new(shard_count, seed);
            let used: std::collections::HashSet<_> =
                keys.iter().map(|k| selector.shard_for_key(k)).collect();
            prop_assert!(used.len() > 1);
        }

        /// A single shard swallows everything.
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_single_shard_is_zero(
            seed in any::<u64>(),
            keys in prop::collection::vec(any::<u32>(), 0..30)
        ) {
            let selector = ShardSelector::new(1, seed);
            for key in keys {
                prop_assert_eq!(selector.shard_for_key(&key), 0);
            }
        }
    }
}
