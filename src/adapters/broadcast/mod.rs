//! Broadcast channel adapters.
//!
//! - `InMemoryBroadcastChannel` - In-process rooms, one per topic
//! - `RedisBroadcastChannel` - Redis PUB/SUB for multi-process deployments

mod in_memory;
mod redis;

pub use in_memory::InMemoryBroadcastChannel;
pub use self::redis::RedisBroadcastChannel;
