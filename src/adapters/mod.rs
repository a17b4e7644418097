//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `broadcast` - Broadcast channels (in-memory, Redis pub/sub)
//! - `storage` - Screen snapshot and saved session stores (file, in-memory)
//! - `catalog` - Media catalog (Supabase, in-memory)
//! - `generation` - Image generators (Runware, mock, disabled)
//! - `http` - REST API
//! - `websocket` - Live display connections

pub mod broadcast;
pub mod catalog;
pub mod generation;
pub mod http;
pub mod storage;
pub mod websocket;

pub use broadcast::{InMemoryBroadcastChannel, RedisBroadcastChannel};
pub use storage::{FileSessionStore, FileSnapshotStore, InMemorySessionStore, InMemorySnapshotStore};
