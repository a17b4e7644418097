//! ControllerCoordinator - the only writer path for screen state.
//!
//! Every mutation runs in the same order:
//!
//! 1. mutate the registry (abort on failure, nothing is published)
//! 2. persist the snapshot (failures are logged, never returned)
//! 3. publish the full assignment on the screen's topic
//!
//! A display that re-fetches the snapshot therefore never sees a broadcast
//! for content the registry does not have. A failed publish leaves the
//! registry change in place; it is reported in [`BroadcastOutcome`].
//!
//! Mutations hold a single write guard across all three steps. Concurrent
//! requests are applied, persisted and published in the same order, so the
//! last write wins in the registry, on disk and on every display.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::domain::broadcast::BroadcastEvent;
use crate::domain::foundation::ScreenId;
use crate::domain::media::{GeneratedImage, MediaItem, GENERATED_IMAGE_TITLE};
use crate::domain::screen::{
    ContentAssignment, ContentType, ContentUpdate, Screen, ScreenRegistry, TransformRequest,
};
use crate::ports::{BroadcastChannel, ScreenSnapshotStore};

use super::errors::{ControlError, Missing};

/// What happened to the broadcast half of a content change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BroadcastOutcome {
    /// Sent; `receivers` may be zero.
    Delivered { receivers: usize },
    /// Nothing to send (screen has no content).
    Skipped,
    /// The registry was updated but the send failed.
    Failed { reason: String },
}

impl BroadcastOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, BroadcastOutcome::Failed { .. })
    }

    /// The transient warning to surface, if any.
    pub fn warning(&self) -> Option<ControlError> {
        match self {
            BroadcastOutcome::Failed { reason } => {
                Some(ControlError::ChannelUnavailable(reason.clone()))
            }
            _ => None,
        }
    }
}

/// Result of a content mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentChange {
    pub screen_id: ScreenId,
    /// The screen's assignment after the change; `None` if it has none.
    pub content: Option<ContentAssignment>,
    pub broadcast: BroadcastOutcome,
}

/// Counts from a whole-set replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReplaceReport {
    pub screens: usize,
    pub republished: usize,
    pub failed: usize,
}

pub struct ControllerCoordinator {
    registry: Arc<ScreenRegistry>,
    channel: Arc<dyn BroadcastChannel>,
    store: Arc<dyn ScreenSnapshotStore>,
    write: Mutex<()>,
}

impl ControllerCoordinator {
    pub fn new(
        registry: Arc<ScreenRegistry>,
        channel: Arc<dyn BroadcastChannel>,
        store: Arc<dyn ScreenSnapshotStore>,
    ) -> Self {
        Self {
            registry,
            channel,
            store,
            write: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &Arc<ScreenRegistry> {
        &self.registry
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Screen set
    // ═══════════════════════════════════════════════════════════════════════

    /// Loads the persisted snapshot into the registry. Nothing is published.
    pub async fn restore(&self) -> Result<usize, ControlError> {
        let _write = self.write.lock().await;
        let screens = self.store.load().await?;
        let count = screens.len();
        self.registry.replace_all(screens).await;
        tracing::info!(screens = count, "Screen set restored from snapshot");
        Ok(count)
    }

    pub async fn add_screen(&self, name: Option<String>) -> Result<Screen, ControlError> {
        let _write = self.write.lock().await;
        let screen = self.registry.add_screen(name).await?;
        self.persist().await;
        tracing::info!(screen_id = %screen.id(), name = %screen.name(), "Screen added");
        Ok(screen)
    }

    /// Idempotent. Returns whether a screen was actually removed.
    ///
    /// Open displays of a removed screen are not notified and keep showing
    /// their last content.
    pub async fn remove_screen(&self, id: &ScreenId) -> bool {
        let _write = self.write.lock().await;
        let removed = self.registry.remove_screen(id).await;
        if removed {
            self.persist().await;
            tracing::info!(screen_id = %id, "Screen removed");
        } else {
            tracing::debug!(screen_id = %id, "Remove of absent screen ignored");
        }
        removed
    }

    pub async fn rename_screen(&self, id: &ScreenId, name: String) -> Result<Screen, ControlError> {
        let _write = self.write.lock().await;
        let screen = self.registry.rename_screen(id, name).await?;
        self.persist().await;
        Ok(screen)
    }

    pub async fn select_screen(&self, id: &ScreenId) -> Result<Screen, ControlError> {
        Ok(self.registry.select_screen(id).await?)
    }

    pub async fn selected(&self) -> Option<Screen> {
        self.registry.selected().await
    }

    pub async fn snapshot(&self) -> Vec<Screen> {
        self.registry.snapshot().await
    }

    /// Swaps in a whole screen set and republishes every screen that has
    /// content, so open displays follow.
    pub async fn replace_all(&self, screens: Vec<Screen>) -> ReplaceReport {
        let _write = self.write.lock().await;
        self.registry.replace_all(screens).await;
        self.persist().await;

        let snapshot = self.registry.snapshot().await;
        let mut report = ReplaceReport {
            screens: snapshot.len(),
            ..ReplaceReport::default()
        };
        for screen in snapshot {
            let Some(content) = screen.current_content() else {
                continue;
            };
            match self.publish(screen.id(), content.clone()).await {
                BroadcastOutcome::Failed { .. } => report.failed += 1,
                _ => report.republished += 1,
            }
        }

        tracing::info!(
            screens = report.screens,
            republished = report.republished,
            failed = report.failed,
            "Screen set replaced"
        );
        report
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Content
    // ═══════════════════════════════════════════════════════════════════════

    /// Shows a catalog item on a screen with the default transform.
    pub async fn assign_media(
        &self,
        item: &MediaItem,
        screen_id: &ScreenId,
    ) -> Result<ContentChange, ControlError> {
        self.assign_content(screen_id, item.to_content_assignment())
            .await
    }

    /// Shows a freshly generated image on a screen.
    pub async fn assign_generated_image(
        &self,
        image: &GeneratedImage,
        screen_id: &ScreenId,
    ) -> Result<ContentChange, ControlError> {
        let content =
            ContentAssignment::new(ContentType::Image, GENERATED_IMAGE_TITLE, image.image_url.clone());
        self.assign_content(screen_id, content).await
    }

    /// Replaces a screen's content wholesale.
    pub async fn assign_content(
        &self,
        screen_id: &ScreenId,
        content: ContentAssignment,
    ) -> Result<ContentChange, ControlError> {
        let update = ContentUpdate::replace_with(&content);
        let _write = self.write.lock().await;
        let stored = self.registry.update_content(screen_id, &update).await?;
        self.persist().await;

        let broadcast = self.publish(screen_id, stored.clone()).await;
        Ok(ContentChange {
            screen_id: screen_id.clone(),
            content: Some(stored),
            broadcast,
        })
    }

    /// Changes rotation, scale or background of the current content.
    ///
    /// A screen without content is left untouched and nothing is published.
    pub async fn adjust_transform(
        &self,
        screen_id: &ScreenId,
        request: &TransformRequest,
    ) -> Result<ContentChange, ControlError> {
        let update = request.validate()?;
        let _write = self.write.lock().await;
        self.apply_transform(screen_id, update).await
    }

    /// Quick rotate by `delta` degrees (e.g. ±90), wrapping into [0, 360).
    pub async fn rotate_by(
        &self,
        screen_id: &ScreenId,
        delta: f64,
    ) -> Result<ContentChange, ControlError> {
        let _write = self.write.lock().await;
        let screen = self.live_screen(screen_id).await?;
        let Some(current) = screen.current_content() else {
            return Ok(Self::skipped(screen_id));
        };
        let update = ContentUpdate {
            rotation: Some(current.rotation().rotated_by(delta)?),
            ..ContentUpdate::default()
        };
        self.apply_transform(screen_id, update).await
    }

    /// Callers hold the write guard.
    async fn apply_transform(
        &self,
        screen_id: &ScreenId,
        update: ContentUpdate,
    ) -> Result<ContentChange, ControlError> {
        debug_assert!(update.is_transform_only());

        let screen = self.live_screen(screen_id).await?;
        if !screen.has_content() {
            tracing::debug!(screen_id = %screen_id, "Transform on empty screen skipped");
            return Ok(Self::skipped(screen_id));
        }
        if update.is_empty() {
            return Ok(ContentChange {
                screen_id: screen_id.clone(),
                content: screen.current_content().cloned(),
                broadcast: BroadcastOutcome::Skipped,
            });
        }

        let stored = self.registry.update_content(screen_id, &update).await?;
        self.persist().await;

        let broadcast = self.publish(screen_id, stored.clone()).await;
        Ok(ContentChange {
            screen_id: screen_id.clone(),
            content: Some(stored),
            broadcast,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Helpers
    // ═══════════════════════════════════════════════════════════════════════

    async fn live_screen(&self, screen_id: &ScreenId) -> Result<Screen, ControlError> {
        self.registry
            .get(screen_id)
            .await
            .ok_or_else(|| ControlError::NotFound(Missing::Screen(screen_id.clone())))
    }

    fn skipped(screen_id: &ScreenId) -> ContentChange {
        ContentChange {
            screen_id: screen_id.clone(),
            content: None,
            broadcast: BroadcastOutcome::Skipped,
        }
    }

    async fn publish(&self, screen_id: &ScreenId, content: ContentAssignment) -> BroadcastOutcome {
        let event = BroadcastEvent::new(screen_id.clone(), content);
        match self.channel.publish(&event).await {
            Ok(receipt) => {
                tracing::debug!(
                    screen_id = %screen_id,
                    receivers = receipt.receivers,
                    "Content broadcast"
                );
                BroadcastOutcome::Delivered {
                    receivers: receipt.receivers,
                }
            }
            Err(e) => {
                tracing::warn!(screen_id = %screen_id, error = %e, "Content broadcast failed");
                BroadcastOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn persist(&self) {
        let screens = self.registry.snapshot().await;
        if let Err(e) = self.store.save(&screens).await {
            tracing::warn!(error = %e, "Failed to persist screen snapshot");
        }
    }
}
