//! BroadcastChannel port - per-topic, best-effort fan-out of screen content.
//!
//! A channel is not a log. Events published to a topic reach only the
//! subscriptions registered at publish time; late subscribers bootstrap
//! from the registry snapshot instead.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::stream::{BoxStream, Stream};

use crate::domain::broadcast::{BroadcastEvent, Topic};

/// Errors surfaced by a broadcast transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// The transport is down or did not acknowledge within its bound.
    #[error("Broadcast channel unavailable: {0}")]
    Unavailable(String),

    /// The event could not be encoded for the wire.
    #[error("Failed to encode broadcast event: {0}")]
    Encoding(String),
}

/// Result of a successful send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishReceipt {
    /// Subscribers the transport handed the event to. Zero is still a
    /// successful send.
    pub receivers: usize,
}

/// Port for publishing to and subscribing on screen topics.
///
/// Events from one publisher to one topic are delivered to a continuously
/// connected subscriber in publish order.
#[async_trait]
pub trait BroadcastChannel: Send + Sync {
    /// Send `event` to every subscriber currently registered on its topic.
    ///
    /// # Errors
    ///
    /// `ChannelError::Unavailable` if the transport is down or did not
    /// acknowledge in time.
    async fn publish(&self, event: &BroadcastEvent) -> Result<PublishReceipt, ChannelError>;

    /// Register interest in `topic`. Returns once the registration is live.
    async fn subscribe(&self, topic: &Topic) -> Result<Subscription, ChannelError>;
}

type ReleaseFn = Box<dyn FnOnce() + Send + Sync>;

/// Live registration on one topic.
///
/// Yields events in arrival order. The stream ending means the transport
/// dropped the registration; callers resubscribe. Releasing happens exactly
/// once, either through [`Subscription::unsubscribe`] or on drop.
pub struct Subscription {
    topic: Topic,
    events: BoxStream<'static, BroadcastEvent>,
    release: Option<ReleaseFn>,
}

impl Subscription {
    /// Wraps a transport stream. `release` runs when the handle is released.
    pub fn new(
        topic: Topic,
        events: BoxStream<'static, BroadcastEvent>,
        release: impl FnOnce() + Send + Sync + 'static,
    ) -> Self {
        Self {
            topic,
            events,
            release: Some(Box::new(release)),
        }
    }

    /// A subscription whose transport releases on stream drop.
    pub fn from_stream(topic: Topic, events: BoxStream<'static, BroadcastEvent>) -> Self {
        Self {
            topic,
            events,
            release: None,
        }
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Release the registration. No further events are delivered.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Stream for Subscription {
    type Item = BroadcastEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.as_mut().poll_next(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("released", &self.release.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ScreenId;
    use futures::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn topic() -> Topic {
        Topic::for_screen(&ScreenId::new("s1").unwrap())
    }

    #[test]
    fn unsubscribe_releases_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let sub = Subscription::new(topic(), futures::stream::empty().boxed(), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        sub.unsubscribe();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_releases() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        {
            let _sub = Subscription::new(topic(), futures::stream::empty().boxed(), move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn yields_inner_stream_items() {
        use crate::domain::screen::{ContentAssignment, ContentType};

        let id = ScreenId::new("s1").unwrap();
        let event = BroadcastEvent::new(
            id,
            ContentAssignment::new(ContentType::Image, "A", "http://x/a.png"),
        );
        let mut sub = Subscription::from_stream(
            topic(),
            futures::stream::iter(vec![event.clone()]).boxed(),
        );

        assert_eq!(sub.next().await, Some(event));
        assert_eq!(sub.next().await, None);
    }
}
