//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Broadcast Ports
//!
//! - `BroadcastChannel` - Per-topic publish/subscribe of screen content
//! - `Subscription` - Stream handle with guaranteed release
//!
//! ## State Ports
//!
//! - `ScreenSnapshotSource` - Read API used by display clients to bootstrap
//! - `ScreenSnapshotStore` - Local durability of the screen set
//! - `SessionStore` - Named saved sessions
//!
//! ## Collaborator Ports
//!
//! - `MediaCatalog` - Uploaded media listing, upload and deletion
//! - `ImageGenerator` - AI image generation

mod broadcast_channel;
mod image_generator;
mod media_catalog;
mod session_store;
mod snapshot_source;
mod snapshot_store;

pub use broadcast_channel::{BroadcastChannel, ChannelError, PublishReceipt, Subscription};
pub use image_generator::{GenerationError, GenerationStream, ImageGenerator};
pub use media_catalog::{CatalogError, MediaCatalog};
pub use session_store::{SessionStore, SessionStoreError};
pub use snapshot_source::ScreenSnapshotSource;
pub use snapshot_store::{ScreenSnapshotStore, SnapshotStoreError};
