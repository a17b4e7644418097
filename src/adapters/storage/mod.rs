//! Storage Adapters
//!
//! Local durability for the screen snapshot and for saved sessions.
//!
//! ## Available Adapters
//!
//! - **FileSnapshotStore** - Screen list as one YAML file
//! - **InMemorySnapshotStore** - Screen list in memory (testing/development)
//! - **FileSessionStore** - One YAML file per saved session
//! - **InMemorySessionStore** - Saved sessions in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileSnapshotStore, FileSessionStore};
//!
//! let snapshots = FileSnapshotStore::new("./data/screens.yaml");
//! let sessions = FileSessionStore::new("./data/sessions");
//! ```

mod file_session_store;
mod file_snapshot_store;
mod in_memory_session_store;
mod in_memory_snapshot_store;

pub use file_session_store::FileSessionStore;
pub use file_snapshot_store::FileSnapshotStore;
pub use in_memory_session_store::InMemorySessionStore;
pub use in_memory_snapshot_store::InMemorySnapshotStore;
