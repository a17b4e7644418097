//! In-process broadcast channel.
//!
//! Rooms are keyed by topic. Each subscriber gets its own unbounded queue,
//! so a slow display never loses events to a lagging ring buffer.
//!
//! ```text
//! Topic: screen:a      Topic: screen:b
//! ├── subscriber-1     └── subscriber-3
//! └── subscriber-2
//! ```
//!
//! Publishing to a topic with no room is a successful send to nobody.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::broadcast::{BroadcastEvent, Topic};
use crate::ports::{BroadcastChannel, ChannelError, PublishReceipt, Subscription};

type Room = HashMap<Uuid, mpsc::UnboundedSender<BroadcastEvent>>;

struct Rooms {
    topics: HashMap<Topic, Room>,
    connected: bool,
}

/// Broadcast channel backed by in-process queues.
///
/// Locks are held only for map updates and never across an await, so the
/// release path in `Drop` can take them synchronously.
#[derive(Clone)]
pub struct InMemoryBroadcastChannel {
    rooms: Arc<Mutex<Rooms>>,
}

impl InMemoryBroadcastChannel {
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(Mutex::new(Rooms {
                topics: HashMap::new(),
                connected: true,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Rooms> {
        lock_rooms(&self.rooms)
    }

    /// Number of live subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.lock().topics.get(topic).map(HashMap::len).unwrap_or(0)
    }

    /// Number of topics with at least one subscriber.
    pub fn topic_count(&self) -> usize {
        self.lock().topics.len()
    }

    // === Outage simulation ===

    /// Take the transport down. Live subscriptions end and further
    /// publish/subscribe calls fail until [`reconnect`](Self::reconnect).
    pub fn disconnect(&self) {
        let mut rooms = self.lock();
        rooms.connected = false;
        rooms.topics.clear();
        tracing::warn!("In-memory broadcast channel disconnected");
    }

    /// Bring the transport back up.
    pub fn reconnect(&self) {
        self.lock().connected = true;
        tracing::info!("In-memory broadcast channel reconnected");
    }

    pub fn is_connected(&self) -> bool {
        self.lock().connected
    }
}

impl Default for InMemoryBroadcastChannel {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_rooms(rooms: &Mutex<Rooms>) -> MutexGuard<'_, Rooms> {
    // A panic while holding the lock cannot leave the maps half-updated.
    rooms.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn release(rooms: &Weak<Mutex<Rooms>>, topic: &Topic, subscriber: Uuid) {
    let Some(rooms) = rooms.upgrade() else {
        return;
    };
    let mut rooms = lock_rooms(&rooms);
    if let Some(room) = rooms.topics.get_mut(topic) {
        room.remove(&subscriber);
        if room.is_empty() {
            rooms.topics.remove(topic);
        }
    }
    tracing::debug!(topic = %topic, subscriber = %subscriber, "Subscription released");
}

#[async_trait]
impl BroadcastChannel for InMemoryBroadcastChannel {
    async fn publish(&self, event: &BroadcastEvent) -> Result<PublishReceipt, ChannelError> {
        let topic = event.topic();
        let mut rooms = self.lock();
        if !rooms.connected {
            return Err(ChannelError::Unavailable(
                "in-memory transport is disconnected".to_string(),
            ));
        }

        let mut receivers = 0;
        if let Some(room) = rooms.topics.get_mut(&topic) {
            room.retain(|_, sender| {
                let delivered = sender.send(event.clone()).is_ok();
                receivers += usize::from(delivered);
                delivered
            });
            if room.is_empty() {
                rooms.topics.remove(&topic);
            }
        }

        tracing::trace!(topic = %topic, receivers, "Event published");
        Ok(PublishReceipt { receivers })
    }

    async fn subscribe(&self, topic: &Topic) -> Result<Subscription, ChannelError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscriber = Uuid::new_v4();
        {
            let mut rooms = self.lock();
            if !rooms.connected {
                return Err(ChannelError::Unavailable(
                    "in-memory transport is disconnected".to_string(),
                ));
            }
            rooms
                .topics
                .entry(topic.clone())
                .or_default()
                .insert(subscriber, tx);
        }

        let events = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        })
        .boxed();

        let weak = Arc::downgrade(&self.rooms);
        let release_topic = topic.clone();
        tracing::debug!(topic = %topic, subscriber = %subscriber, "Subscription registered");
        Ok(Subscription::new(topic.clone(), events, move || {
            release(&weak, &release_topic, subscriber)
        }))
    }
}
