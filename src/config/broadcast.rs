//! Broadcast transport configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Broadcast channel configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastConfig {
    /// Which transport carries screen events
    #[serde(default)]
    pub transport: BroadcastTransport,

    /// Bound on waiting for the transport to acknowledge a publish
    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_ms: u64,

    /// First delay before resubscribing after a dropped subscription
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,

    /// Upper bound for the doubling reconnect delay
    #[serde(default = "default_max_reconnect_delay")]
    pub max_reconnect_delay_ms: u64,
}

/// Broadcast transport type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastTransport {
    #[default]
    Memory,
    Redis,
}

impl BroadcastConfig {
    pub fn publish_timeout(&self) -> Duration {
        Duration::from_millis(self.publish_timeout_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn max_reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.max_reconnect_delay_ms)
    }

    /// Validate broadcast configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.publish_timeout_ms == 0 {
            return Err(ValidationError::InvalidBroadcastTiming(
                "publish_timeout_ms must be positive",
            ));
        }
        if self.reconnect_delay_ms == 0 {
            return Err(ValidationError::InvalidBroadcastTiming(
                "reconnect_delay_ms must be positive",
            ));
        }
        if self.max_reconnect_delay_ms < self.reconnect_delay_ms {
            return Err(ValidationError::InvalidBroadcastTiming(
                "max_reconnect_delay_ms is below reconnect_delay_ms",
            ));
        }
        Ok(())
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            transport: BroadcastTransport::default(),
            publish_timeout_ms: default_publish_timeout(),
            reconnect_delay_ms: default_reconnect_delay(),
            max_reconnect_delay_ms: default_max_reconnect_delay(),
        }
    }
}

fn default_publish_timeout() -> u64 {
    2_000
}

fn default_reconnect_delay() -> u64 {
    1_000
}

fn default_max_reconnect_delay() -> u64 {
    30_000
}
