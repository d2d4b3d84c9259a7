pub mod arena;
pub mod freq_buckets;
pub mod ghost;
pub mod list;
pub mod shard;

pub use arena::{NodeArena, NodeId};
pub use freq_buckets::FrequencyBuckets;
pub use ghost::GhostList;
pub use list::NodeList;
pub use shard::ShardSelector;
