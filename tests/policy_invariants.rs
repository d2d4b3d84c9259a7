// ==============================================
// CROSS-POLICY INVARIANT TESTS (integration)
// ==============================================
//
// Laws every policy must satisfy regardless of its eviction strategy.
// Policy-specific behavior lives in each policy's own unit tests; these
// span the whole closed set.

use polycache::policy::arc::ArcCache;
use polycache::policy::lfu::LfuCore;
use polycache::policy::lru::LruCore;
use polycache::policy::lru_k::LruKCache;
use polycache::traits::{CoreCache, MutableCache};

// Fresh instances of every policy at capacity 3. LRU-K uses k = 1 here so
// that insert admits immediately and the shared laws apply unchanged; its
// admission filtering is covered by its own tests.
fn policies() -> Vec<(&'static str, Box<dyn MutableCache<u64, String>>)> {
    vec![
        ("lru", Box::new(LruCore::new(3))),
        ("lru_k", Box::new(LruKCache::with_params(3, 8, 1))),
        ("lfu", Box::new(LfuCore::new(3))),
        ("arc", Box::new(ArcCache::new(3))),
    ]
}

fn zero_capacity_policies() -> Vec<(&'static str, Box<dyn MutableCache<u64, String>>)> {
    vec![
        ("lru", Box::new(LruCore::new(0))),
        ("lru_k", Box::new(LruKCache::with_params(0, 8, 1))),
        ("lfu", Box::new(LfuCore::new(0))),
        ("arc", Box::new(ArcCache::new(0))),
    ]
}

#[test]
fn put_then_get_round_trips() {
    for (name, mut cache) in policies() {
        cache.insert(1, "v".to_string());
        assert_eq!(cache.get(&1), Some(&"v".to_string()), "{name}");
    }
}

#[test]
fn second_put_wins() {
    for (name, mut cache) in policies() {
        cache.insert(1, "v1".to_string());
        cache.insert(1, "v2".to_string());
        assert_eq!(cache.get(&1), Some(&"v2".to_string()), "{name}");
        assert_eq!(cache.len(), 1, "{name}");
    }
}

#[test]
fn capacity_zero_is_honored() {
    for (name, mut cache) in zero_capacity_policies() {
        assert_eq!(cache.capacity(), 0, "{name}");
        cache.insert(1, "v".to_string());
        assert_eq!(cache.len(), 0, "{name} with capacity=0 should reject inserts");
        assert_eq!(cache.get(&1), None, "{name}");
    }
}

#[test]
fn remove_absent_is_silent() {
    for (name, mut cache) in policies() {
        assert_eq!(cache.remove(&42), None, "{name}");
        cache.insert(1, "v".to_string());
        assert_eq!(cache.remove(&1), Some("v".to_string()), "{name}");
        assert_eq!(cache.remove(&1), None, "{name}");
    }
}

#[test]
fn eviction_storm_never_corrupts_survivors() {
    // Fill, then drive capacity-many waves of unrelated keys through the
    // cache. Whatever gets evicted, the entries the policy reports as
    // resident must still resolve to their own values.
    for (name, mut cache) in policies() {
        for key in 0..200u64 {
            cache.insert(key, format!("value-{key}"));
            assert!(cache.len() <= cache.capacity(), "{name} overflowed");
        }
        for key in 0..200u64 {
            if cache.contains(&key) {
                assert_eq!(
                    cache.get(&key),
                    Some(&format!("value-{key}")),
                    "{name} corrupted a survivor"
                );
            }
        }
        assert!(cache.len() <= cache.capacity(), "{name} overflowed");
    }
}

#[test]
fn clear_resets_to_empty_and_reusable() {
    for (name, mut cache) in policies() {
        for key in 0..10u64 {
            cache.insert(key, "x".to_string());
        }
        cache.clear();
        assert!(cache.is_empty(), "{name}");

        cache.insert(7, "fresh".to_string());
        assert_eq!(cache.get(&7), Some(&"fresh".to_string()), "{name}");
    }
}
