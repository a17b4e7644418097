//! In-memory screen snapshot store (testing/development).

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::screen::Screen;
use crate::ports::{ScreenSnapshotStore, SnapshotStoreError};

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    screens: RwLock<Vec<Screen>>,
    saves: RwLock<usize>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `screens`, as if saved by a previous run.
    pub fn with_screens(screens: Vec<Screen>) -> Self {
        Self {
            screens: RwLock::new(screens),
            saves: RwLock::new(0),
        }
    }

    /// Number of saves since creation (for test assertions).
    pub async fn save_count(&self) -> usize {
        *self.saves.read().await
    }
}

#[async_trait]
impl ScreenSnapshotStore for InMemorySnapshotStore {
    async fn save(&self, screens: &[Screen]) -> Result<(), SnapshotStoreError> {
        *self.screens.write().await = screens.to_vec();
        *self.saves.write().await += 1;
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Screen>, SnapshotStoreError> {
        Ok(self.screens.read().await.clone())
    }
}
