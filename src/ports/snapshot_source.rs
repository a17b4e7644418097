//! ScreenSnapshotSource port - read API over the screen registry.

use async_trait::async_trait;

use crate::domain::screen::Screen;

/// Read-only view of the current screen set, in insertion order.
///
/// Display clients bootstrap from this before relying on live events.
#[async_trait]
pub trait ScreenSnapshotSource: Send + Sync {
    async fn snapshot(&self) -> Vec<Screen>;
}
