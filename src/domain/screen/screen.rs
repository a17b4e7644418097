//! Screen entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ScreenId, ValidationError};

use super::content::ContentAssignment;

/// Maximum length for a screen name.
pub const MAX_NAME_LENGTH: usize = 200;

/// A named display target holding at most one current content assignment.
///
/// Serialized camelCase; this is also the persisted snapshot layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    id: ScreenId,
    name: String,
    #[serde(default = "default_active")]
    is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_content: Option<ContentAssignment>,
}

fn default_active() -> bool {
    true
}

impl Screen {
    /// Creates an active screen with no content.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the name is blank
    /// - `OutOfRange` if the name is longer than [`MAX_NAME_LENGTH`]
    pub fn new(id: ScreenId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = Self::validate_name(name.into())?;
        Ok(Self {
            id,
            name,
            is_active: true,
            current_content: None,
        })
    }

    /// Reconstitute a screen from persistence (no validation).
    pub fn reconstitute(
        id: ScreenId,
        name: String,
        is_active: bool,
        current_content: Option<ContentAssignment>,
    ) -> Self {
        Self {
            id,
            name,
            is_active,
            current_content,
        }
    }

    /// Default label for the screen created at `position` (1-based).
    pub fn default_name(position: usize) -> String {
        format!("Tela {}", position)
    }

    pub fn id(&self) -> &ScreenId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn current_content(&self) -> Option<&ContentAssignment> {
        self.current_content.as_ref()
    }

    pub fn has_content(&self) -> bool {
        self.current_content.is_some()
    }

    pub(super) fn rename(&mut self, name: String) -> Result<(), ValidationError> {
        self.name = Self::validate_name(name)?;
        Ok(())
    }

    /// Swaps the whole assignment in one move.
    pub(super) fn replace_content(&mut self, content: ContentAssignment) {
        self.current_content = Some(content);
    }

    fn validate_name(name: String) -> Result<String, ValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        let len = trimmed.chars().count();
        if len > MAX_NAME_LENGTH {
            return Err(ValidationError::out_of_range(
                "name",
                1.0,
                MAX_NAME_LENGTH as f64,
                len as f64,
            ));
        }
        Ok(trimmed.to_string())
    }
}
