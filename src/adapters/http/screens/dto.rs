//! HTTP DTOs for screen endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::error::WarningResponse;
use crate::application::{BroadcastOutcome, ContentChange};
use crate::domain::media::GeneratedImage;
use crate::domain::screen::{ContentAssignment, ContentType, Screen};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to add a screen. Omitting the name yields `Tela <n>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateScreenRequest {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenameScreenRequest {
    pub name: String,
}

/// What to show on a screen, tagged by `source`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum AssignContentRequest {
    /// An item already in the media catalog.
    Catalog {
        #[serde(rename = "mediaItemId")]
        media_item_id: String,
    },
    /// Arbitrary media by URL.
    Inline {
        #[serde(rename = "type")]
        content_type: ContentType,
        #[serde(default)]
        title: String,
        url: String,
    },
    /// A result returned by `POST /api/generations`.
    Generated(GeneratedImage),
}

#[derive(Debug, Clone, Deserialize)]
pub struct RotateRequest {
    pub degrees: f64,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenResponse {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub current_content: Option<ContentAssignment>,
}

impl From<Screen> for ScreenResponse {
    fn from(screen: Screen) -> Self {
        Self {
            id: screen.id().to_string(),
            name: screen.name().to_string(),
            is_active: screen.is_active(),
            current_content: screen.current_content().cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenListResponse {
    pub screens: Vec<ScreenResponse>,
    pub selected_id: Option<String>,
}

/// Result of a content mutation. `warning` is set when the screen was
/// updated but displays could not be notified.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentChangeResponse {
    pub screen_id: String,
    pub content: Option<ContentAssignment>,
    pub broadcast: BroadcastOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<WarningResponse>,
}

impl From<ContentChange> for ContentChangeResponse {
    fn from(change: ContentChange) -> Self {
        Self {
            screen_id: change.screen_id.to_string(),
            warning: change.broadcast.warning().map(WarningResponse::from),
            content: change.content,
            broadcast: change.broadcast,
        }
    }
}
