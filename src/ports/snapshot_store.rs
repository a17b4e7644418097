//! ScreenSnapshotStore port - local durability for the screen set.

use async_trait::async_trait;

use crate::domain::screen::Screen;

/// Errors that can occur while persisting the screen snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotStoreError {
    #[error("Failed to serialize snapshot: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize snapshot: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for saving and reloading the ordered screen list.
#[async_trait]
pub trait ScreenSnapshotStore: Send + Sync {
    /// Overwrite the stored snapshot with `screens`.
    async fn save(&self, screens: &[Screen]) -> Result<(), SnapshotStoreError>;

    /// Load the stored snapshot. Empty when nothing has been saved yet.
    async fn load(&self) -> Result<Vec<Screen>, SnapshotStoreError>;
}
