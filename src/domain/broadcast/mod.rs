//! Broadcast domain types: topics and content-update events.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ScreenId, Timestamp};
use crate::domain::screen::ContentAssignment;

/// Routing key of the broadcast channel. One topic per screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic(String);

impl Topic {
    const SCREEN_PREFIX: &'static str = "screen:";

    /// Stable topic for a screen.
    pub fn for_screen(screen_id: &ScreenId) -> Self {
        Self(format!("{}{}", Self::SCREEN_PREFIX, screen_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A content update delivered to display clients.
///
/// Always carries the full assignment, never a diff. `published_at` is
/// informational; ordering is publish order on the originating connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastEvent {
    pub screen_id: ScreenId,
    pub content: ContentAssignment,
    pub published_at: Timestamp,
}

impl BroadcastEvent {
    pub fn new(screen_id: ScreenId, content: ContentAssignment) -> Self {
        Self {
            screen_id,
            content,
            published_at: Timestamp::now(),
        }
    }

    /// Topic this event belongs on.
    pub fn topic(&self) -> Topic {
        Topic::for_screen(&self.screen_id)
    }
}
