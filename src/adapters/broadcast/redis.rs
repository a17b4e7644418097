//! Redis PUB/SUB broadcast channel.
//!
//! Publishing reuses one long-lived multiplexed connection, re-created on the
//! next publish after a failure. Every subscription owns a dedicated pub/sub
//! connection; dropping the subscription drops the connection, which
//! unsubscribes server-side.
//!
//! Channel names are `<prefix><topic>`, e.g. `signage:screen:<id>`. Payloads
//! are JSON-encoded [`BroadcastEvent`]s.

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use redis::aio::{MultiplexedConnection, PubSub};
use redis::AsyncCommands;
use tokio::sync::Mutex;

use crate::config::{BroadcastConfig, RedisConfig};
use crate::domain::broadcast::{BroadcastEvent, Topic};
use crate::ports::{BroadcastChannel, ChannelError, PublishReceipt, Subscription};

/// Broadcast channel backed by Redis PUB/SUB.
pub struct RedisBroadcastChannel {
    client: redis::Client,
    /// Held for the whole publish so events leave in call order.
    publisher: Mutex<Option<MultiplexedConnection>>,
    channel_prefix: String,
    connect_timeout: Duration,
    publish_timeout: Duration,
    reconnect_delay: Duration,
    max_reconnect_delay: Duration,
}

impl RedisBroadcastChannel {
    /// Create a channel. No connection is opened until first use.
    ///
    /// # Errors
    ///
    /// `ChannelError::Unavailable` if the URL cannot be parsed.
    pub fn new(redis: &RedisConfig, broadcast: &BroadcastConfig) -> Result<Self, ChannelError> {
        let client = redis::Client::open(redis.url.as_str())
            .map_err(|e| ChannelError::Unavailable(format!("invalid redis url: {}", e)))?;

        Ok(Self {
            client,
            publisher: Mutex::new(None),
            channel_prefix: redis.channel_prefix.clone(),
            connect_timeout: redis.timeout(),
            publish_timeout: broadcast.publish_timeout(),
            reconnect_delay: broadcast.reconnect_delay(),
            max_reconnect_delay: broadcast.max_reconnect_delay(),
        })
    }

    fn channel_name(&self, topic: &Topic) -> String {
        format!("{}{}", self.channel_prefix, topic)
    }

    async fn publish_on(
        &self,
        slot: &mut Option<MultiplexedConnection>,
        channel: &str,
        payload: &str,
    ) -> redis::RedisResult<i64> {
        if slot.is_none() {
            *slot = Some(self.client.get_multiplexed_tokio_connection().await?);
        }
        match slot.as_mut() {
            Some(conn) => conn.publish(channel, payload).await,
            None => Err(redis::RedisError::from((
                redis::ErrorKind::IoError,
                "publisher connection missing",
            ))),
        }
    }

    async fn open_pubsub(&self, channel: &str) -> Result<PubSub, ChannelError> {
        let connect = async {
            let conn = self.client.get_async_connection().await?;
            let mut pubsub = conn.into_pubsub();
            pubsub.subscribe(channel).await?;
            Ok::<_, redis::RedisError>(pubsub)
        };

        match tokio::time::timeout(self.connect_timeout, connect).await {
            Ok(Ok(pubsub)) => Ok(pubsub),
            Ok(Err(e)) => Err(ChannelError::Unavailable(e.to_string())),
            Err(_) => Err(ChannelError::Unavailable(format!(
                "subscribe not acknowledged within {:?}",
                self.connect_timeout
            ))),
        }
    }
}

#[async_trait]
impl BroadcastChannel for RedisBroadcastChannel {
    async fn publish(&self, event: &BroadcastEvent) -> Result<PublishReceipt, ChannelError> {
        let topic = event.topic();
        let channel = self.channel_name(&topic);
        let payload =
            serde_json::to_string(event).map_err(|e| ChannelError::Encoding(e.to_string()))?;

        let mut slot = self.publisher.lock().await;
        let result =
            tokio::time::timeout(self.publish_timeout, self.publish_on(&mut slot, &channel, &payload))
                .await;

        match result {
            Ok(Ok(receivers)) => {
                tracing::debug!(topic = %topic, receivers, "Event published to Redis");
                Ok(PublishReceipt {
                    receivers: usize::try_from(receivers).unwrap_or(0),
                })
            }
            Ok(Err(e)) => {
                *slot = None;
                tracing::warn!(topic = %topic, error = %e, "Redis publish failed");
                Err(ChannelError::Unavailable(e.to_string()))
            }
            Err(_) => {
                *slot = None;
                tracing::warn!(topic = %topic, timeout = ?self.publish_timeout, "Redis publish timed out");
                Err(ChannelError::Unavailable(format!(
                    "publish not acknowledged within {:?}",
                    self.publish_timeout
                )))
            }
        }
    }

    /// Retries the connect handshake with exponential backoff until it
    /// succeeds. Cancel the returned future to give up.
    async fn subscribe(&self, topic: &Topic) -> Result<Subscription, ChannelError> {
        let channel = self.channel_name(topic);
        let mut delay = self.reconnect_delay;
        let mut attempt: u32 = 0;

        let pubsub = loop {
            match self.open_pubsub(&channel).await {
                Ok(pubsub) => break pubsub,
                Err(e) => {
                    attempt += 1;
                    tracing::warn!(
                        topic = %topic,
                        attempt,
                        retry_in = ?delay,
                        error = %e,
                        "Redis subscribe failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(self.max_reconnect_delay);
                }
            }
        };

        tracing::debug!(topic = %topic, channel = %channel, "Redis subscription registered");

        let log_topic = topic.clone();
        let events = pubsub
            .into_on_message()
            .filter_map(move |msg| {
                let decoded = msg
                    .get_payload::<String>()
                    .map_err(|e| e.to_string())
                    .and_then(|raw| {
                        serde_json::from_str::<BroadcastEvent>(&raw).map_err(|e| e.to_string())
                    });
                let event = match decoded {
                    Ok(event) => Some(event),
                    Err(error) => {
                        tracing::warn!(topic = %log_topic, error = %error, "Dropping undecodable broadcast payload");
                        None
                    }
                };
                futures::future::ready(event)
            })
            .boxed();

        Ok(Subscription::from_stream(topic.clone(), events))
    }
}
