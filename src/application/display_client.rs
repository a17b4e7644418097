//! DisplayClient - keeps one screen's rendered content in sync.
//!
//! The render state is a `watch` cell holding the last known
//! [`ContentAssignment`]. It only ever moves forward by wholesale
//! replacement:
//!
//! 1. bootstrap from the registry snapshot
//! 2. subscribe to the screen's topic
//! 3. read the snapshot once more, so anything published between steps 1
//!    and 2 is picked up
//! 4. drop events already queued up to the last one equal to the snapshot
//!    content, so the display never steps back to older content
//! 5. replace the render state with every later event, in arrival order
//!
//! When the subscription drops, the client waits, rebootstraps and
//! resubscribes. The rendered content stays on screen during the gap.
//! A screen that disappears from the registry keeps its last content.

use std::sync::Arc;
use std::time::Duration;

use futures::{FutureExt, StreamExt};
use tokio::sync::watch;

use crate::domain::broadcast::{BroadcastEvent, Topic};
use crate::domain::foundation::ScreenId;
use crate::domain::screen::ContentAssignment;
use crate::ports::{BroadcastChannel, ScreenSnapshotSource, Subscription};

/// Reconnect timing for a display client.
#[derive(Debug, Clone, Copy)]
pub struct DisplayClientConfig {
    pub reconnect_delay: Duration,
    pub max_reconnect_delay: Duration,
}

impl Default for DisplayClientConfig {
    fn default() -> Self {
        Self {
            reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(30),
        }
    }
}

enum PumpEnd {
    Shutdown,
    Dropped,
}

pub struct DisplayClient {
    screen_id: ScreenId,
    topic: Topic,
    source: Arc<dyn ScreenSnapshotSource>,
    channel: Arc<dyn BroadcastChannel>,
    config: DisplayClientConfig,
    render: watch::Sender<Option<ContentAssignment>>,
}

impl DisplayClient {
    pub fn new(
        screen_id: ScreenId,
        source: Arc<dyn ScreenSnapshotSource>,
        channel: Arc<dyn BroadcastChannel>,
        config: DisplayClientConfig,
    ) -> Self {
        let (render, _) = watch::channel(None);
        Self {
            topic: Topic::for_screen(&screen_id),
            screen_id,
            source,
            channel,
            config,
            render,
        }
    }

    pub fn screen_id(&self) -> &ScreenId {
        &self.screen_id
    }

    /// Receiver notified on every render change.
    pub fn watch(&self) -> watch::Receiver<Option<ContentAssignment>> {
        self.render.subscribe()
    }

    /// What is currently rendered.
    pub fn current(&self) -> Option<ContentAssignment> {
        self.render.borrow().clone()
    }

    /// Renders the registry's content for this screen, if it has any.
    ///
    /// Returns whether content was found. Absent screens or empty content
    /// leave the render state unchanged.
    pub async fn bootstrap(&self) -> bool {
        let snapshot = self.source.snapshot().await;
        let content = snapshot
            .into_iter()
            .find(|screen| screen.id() == &self.screen_id)
            .and_then(|screen| screen.current_content().cloned());

        match content {
            Some(content) => {
                // Rebootstraps usually find what is already rendered.
                self.render.send_if_modified(|rendered| {
                    if rendered.as_ref() == Some(&content) {
                        return false;
                    }
                    *rendered = Some(content);
                    true
                });
                true
            }
            None => {
                tracing::debug!(screen_id = %self.screen_id, "Bootstrap found no content");
                false
            }
        }
    }

    /// Replaces the render state with the event's content. Events for other
    /// screens are ignored.
    pub fn apply(&self, event: &BroadcastEvent) -> bool {
        if event.screen_id != self.screen_id {
            tracing::warn!(
                screen_id = %self.screen_id,
                event_screen_id = %event.screen_id,
                "Ignoring event for another screen"
            );
            return false;
        }
        self.render.send_replace(Some(event.content.clone()));
        true
    }

    /// Attaches and keeps the render state current until `shutdown` flips to
    /// `true`. Transport failures are logged and retried, never returned.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut delay = self.config.reconnect_delay;

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.bootstrap().await;

            let subscribed = tokio::select! {
                result = self.channel.subscribe(&self.topic) => result,
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            };

            match subscribed {
                Ok(mut subscription) => {
                    delay = self.config.reconnect_delay;
                    let rebootstrapped = self.bootstrap().await;
                    tracing::debug!(screen_id = %self.screen_id, "Display attached");

                    let end = if self.catch_up(&mut subscription, rebootstrapped) {
                        self.pump(subscription, &mut shutdown).await
                    } else {
                        PumpEnd::Dropped
                    };
                    match end {
                        PumpEnd::Shutdown => break,
                        PumpEnd::Dropped => {
                            tracing::warn!(
                                screen_id = %self.screen_id,
                                retry_in = ?delay,
                                "Display subscription dropped"
                            );
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        screen_id = %self.screen_id,
                        retry_in = ?delay,
                        error = %e,
                        "Display subscribe failed"
                    );
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            delay = (delay * 2).min(self.config.max_reconnect_delay);
        }

        tracing::debug!(screen_id = %self.screen_id, "Display detached");
    }

    /// Applies events that queued while the snapshot was read.
    ///
    /// Everything up to the last queued event equal to the rebootstrapped
    /// content is already reflected by the render state and is skipped.
    /// Returns `false` if the subscription ended.
    fn catch_up(&self, subscription: &mut Subscription, rebootstrapped: bool) -> bool {
        let mut queued = Vec::new();
        let open = loop {
            match subscription.next().now_or_never() {
                Some(Some(event)) => queued.push(event),
                Some(None) => break false,
                None => break true,
            }
        };

        let start = match self.current() {
            Some(rendered) if rebootstrapped => queued
                .iter()
                .rposition(|event| event.content == rendered)
                .map_or(0, |last| last + 1),
            _ => 0,
        };
        if start > 0 {
            tracing::trace!(screen_id = %self.screen_id, skipped = start, "Skipped queued events");
        }
        for event in &queued[start..] {
            self.apply(event);
        }
        open
    }

    async fn pump(
        &self,
        mut subscription: Subscription,
        shutdown: &mut watch::Receiver<bool>,
    ) -> PumpEnd {
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        subscription.unsubscribe();
                        return PumpEnd::Shutdown;
                    }
                }
                event = subscription.next() => match event {
                    Some(event) => {
                        self.apply(&event);
                    }
                    None => return PumpEnd::Dropped,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::broadcast::InMemoryBroadcastChannel;
    use crate::domain::screen::{ContentType, ContentUpdate, ScreenRegistry};

    fn content(title: &str) -> ContentAssignment {
        ContentAssignment::new(ContentType::Image, title, format!("http://x/{}.png", title))
    }

    fn fast() -> DisplayClientConfig {
        DisplayClientConfig {
            reconnect_delay: Duration::from_millis(10),
            max_reconnect_delay: Duration::from_millis(40),
        }
    }

    async fn registry_with_screen() -> (Arc<ScreenRegistry>, ScreenId) {
        let registry = Arc::new(ScreenRegistry::new());
        let screen = registry.add_screen(None).await.unwrap();
        (registry, screen.id().clone())
    }

    async fn wait_for(
        rx: &mut watch::Receiver<Option<ContentAssignment>>,
        title: &str,
    ) -> ContentAssignment {
        let wanted = title.to_string();
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if let Some(c) = rx.borrow_and_update().clone() {
                    if c.title() == wanted {
                        return c;
                    }
                }
                if rx.changed().await.is_err() {
                    panic!("render state closed");
                }
            }
        })
        .await
        .expect("timed out waiting for render state")
    }

    #[tokio::test]
    async fn bootstrap_renders_registry_content() {
        let (registry, id) = registry_with_screen().await;
        registry
            .update_content(&id, &ContentUpdate::replace_with(&content("A")))
            .await
            .unwrap();
        let client = DisplayClient::new(
            id,
            registry,
            Arc::new(InMemoryBroadcastChannel::new()),
            fast(),
        );

        assert!(client.bootstrap().await);
        assert_eq!(client.current().unwrap().title(), "A");
    }

    #[tokio::test]
    async fn bootstrap_of_missing_screen_keeps_stale_content() {
        let (registry, id) = registry_with_screen().await;
        let client = DisplayClient::new(
            id.clone(),
            registry.clone(),
            Arc::new(InMemoryBroadcastChannel::new()),
            fast(),
        );
        client.apply(&BroadcastEvent::new(id.clone(), content("old")));

        registry.remove_screen(&id).await;

        assert!(!client.bootstrap().await);
        assert_eq!(client.current().unwrap().title(), "old");
    }

    #[tokio::test]
    async fn apply_ignores_other_screens() {
        let (registry, id) = registry_with_screen().await;
        let client = DisplayClient::new(
            id,
            registry,
            Arc::new(InMemoryBroadcastChannel::new()),
            fast(),
        );

        let other = BroadcastEvent::new(ScreenId::new("other").unwrap(), content("X"));
        assert!(!client.apply(&other));
        assert!(client.current().is_none());
    }

    async fn queue(channel: &InMemoryBroadcastChannel, id: &ScreenId, titles: &[&str]) {
        for title in titles {
            channel
                .publish(&BroadcastEvent::new(id.clone(), content(title)))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn catch_up_skips_events_older_than_snapshot() {
        let (registry, id) = registry_with_screen().await;
        let channel = InMemoryBroadcastChannel::new();
        let mut subscription = channel.subscribe(&Topic::for_screen(&id)).await.unwrap();
        queue(&channel, &id, &["C1", "C2"]).await;
        registry
            .update_content(&id, &ContentUpdate::replace_with(&content("C2")))
            .await
            .unwrap();
        let client = DisplayClient::new(id, registry, Arc::new(channel), fast());
        let mut render = client.watch();

        assert!(client.bootstrap().await);
        let _ = render.borrow_and_update();
        assert!(client.catch_up(&mut subscription, true));

        assert!(!render.has_changed().unwrap());
        assert_eq!(client.current().unwrap().title(), "C2");
    }

    #[tokio::test]
    async fn catch_up_applies_events_newer_than_snapshot() {
        let (registry, id) = registry_with_screen().await;
        let channel = InMemoryBroadcastChannel::new();
        let mut subscription = channel.subscribe(&Topic::for_screen(&id)).await.unwrap();
        queue(&channel, &id, &["C1", "C2", "C3"]).await;
        registry
            .update_content(&id, &ContentUpdate::replace_with(&content("C2")))
            .await
            .unwrap();
        let client = DisplayClient::new(id, registry, Arc::new(channel), fast());

        assert!(client.bootstrap().await);
        assert!(client.catch_up(&mut subscription, true));

        assert_eq!(client.current().unwrap().title(), "C3");
    }

    #[tokio::test]
    async fn catch_up_without_snapshot_content_applies_everything() {
        let (registry, id) = registry_with_screen().await;
        let channel = InMemoryBroadcastChannel::new();
        let mut subscription = channel.subscribe(&Topic::for_screen(&id)).await.unwrap();
        queue(&channel, &id, &["C1", "C2"]).await;
        let client = DisplayClient::new(id, registry, Arc::new(channel), fast());

        assert!(!client.bootstrap().await);
        assert!(client.catch_up(&mut subscription, false));

        assert_eq!(client.current().unwrap().title(), "C2");
    }

    #[tokio::test]
    async fn run_follows_live_events_and_stops_on_shutdown() {
        let (registry, id) = registry_with_screen().await;
        let channel = InMemoryBroadcastChannel::new();
        let client = Arc::new(DisplayClient::new(
            id.clone(),
            registry,
            Arc::new(channel.clone()),
            fast(),
        ));
        let mut render = client.watch();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let runner = {
            let client = client.clone();
            tokio::spawn(async move { client.run(shutdown_rx).await })
        };

        let topic = Topic::for_screen(&id);
        while channel.subscriber_count(&topic) == 0 {
            tokio::task::yield_now().await;
        }
        channel
            .publish(&BroadcastEvent::new(id.clone(), content("live")))
            .await
            .unwrap();
        wait_for(&mut render, "live").await;

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(2), runner)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(channel.subscriber_count(&topic), 0);
    }

    #[tokio::test]
    async fn run_recovers_after_transport_outage() {
        let (registry, id) = registry_with_screen().await;
        let channel = InMemoryBroadcastChannel::new();
        let client = Arc::new(DisplayClient::new(
            id.clone(),
            registry.clone(),
            Arc::new(channel.clone()),
            fast(),
        ));
        let mut render = client.watch();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let runner = {
            let client = client.clone();
            tokio::spawn(async move { client.run(shutdown_rx).await })
        };
        let topic = Topic::for_screen(&id);
        while channel.subscriber_count(&topic) == 0 {
            tokio::task::yield_now().await;
        }

        channel.disconnect();
        // Written while the display was cut off; picked up by rebootstrap.
        registry
            .update_content(&id, &ContentUpdate::replace_with(&content("missed")))
            .await
            .unwrap();
        channel.reconnect();

        wait_for(&mut render, "missed").await;

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(2), runner)
            .await
            .unwrap()
            .unwrap();
    }
}
