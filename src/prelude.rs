pub use crate::builder::{Cache, CacheBuilder, PolicyKind};
pub use crate::ds::{FrequencyBuckets, GhostList, NodeArena, NodeId, NodeList, ShardSelector};
pub use crate::policy::arc::ArcCache;
pub use crate::policy::lfu::LfuCore;
pub use crate::policy::lru::LruCore;
pub use crate::policy::lru_k::LruKCache;
pub use crate::policy::sharded::{Sharded, ShardedArc, ShardedLfu, ShardedLru, ShardedLruK};
pub use crate::traits::{ConcurrentCache, CoreCache, LfuCacheTrait, LruCacheTrait, MutableCache};

#[cfg(feature = "metrics")]
pub use crate::metrics::CacheStats;
