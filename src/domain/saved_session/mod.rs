//! Saved sessions: named snapshots of the full screen configuration.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SavedSessionId, Timestamp, ValidationError};
use crate::domain::screen::Screen;

/// Maximum session name length in characters.
pub const MAX_SESSION_NAME_LENGTH: usize = 200;

/// A named copy of every screen and its content at the time of saving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    id: SavedSessionId,
    name: String,
    screens: Vec<Screen>,
    created_at: Timestamp,
}

impl SavedSession {
    /// Captures `screens` under a new id.
    pub fn capture(name: impl Into<String>, screens: Vec<Screen>) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let len = name.chars().count();
        if len > MAX_SESSION_NAME_LENGTH {
            return Err(ValidationError::out_of_range(
                "name",
                1.0,
                MAX_SESSION_NAME_LENGTH as f64,
                len as f64,
            ));
        }
        Ok(Self {
            id: SavedSessionId::new(),
            name,
            screens,
            created_at: Timestamp::now(),
        })
    }

    pub fn id(&self) -> &SavedSessionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn into_screens(self) -> Vec<Screen> {
        self.screens
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }
}

/// Listing entry without the screen payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSessionSummary {
    pub id: SavedSessionId,
    pub name: String,
    pub screen_count: usize,
    pub created_at: Timestamp,
}

impl From<&SavedSession> for SavedSessionSummary {
    fn from(session: &SavedSession) -> Self {
        Self {
            id: session.id,
            name: session.name.clone(),
            screen_count: session.screens.len(),
            created_at: session.created_at,
        }
    }
}
