//! Operation counters, compiled in behind the `metrics` cargo feature.
//!
//! Each policy core embeds a [`CacheStats`] and bumps it inline; the cost
//! is a handful of integer increments per operation, paid only when the
//! feature is enabled. Policies expose a `stats()` accessor returning a
//! clone, so a snapshot is stable while the cache keeps moving.
//!
//! The counter set is the same for every policy: call/hit/miss totals for
//! `get`, new/update totals for `insert`, and evictions.

/// Flat operation counters shared by all policy cores.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_new: u64,
    pub insert_updates: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Hit fraction of all `get` calls, or 0.0 before the first call.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }

    #[inline]
    pub(crate) fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    #[inline]
    pub(crate) fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    #[inline]
    pub(crate) fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    #[inline]
    pub(crate) fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    #[inline]
    pub(crate) fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    #[inline]
    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}
