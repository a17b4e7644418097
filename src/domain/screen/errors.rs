//! Screen-specific error types.

use crate::domain::foundation::{ErrorCode, ScreenId, ValidationError};

/// Errors raised by the screen registry.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenError {
    /// No live screen has this id.
    NotFound(ScreenId),
    /// Input failed validation.
    ValidationFailed(ValidationError),
}

impl ScreenError {
    pub fn not_found(id: ScreenId) -> Self {
        ScreenError::NotFound(id)
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ScreenError::NotFound(_) => ErrorCode::ScreenNotFound,
            ScreenError::ValidationFailed(_) => ErrorCode::ValidationFailed,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ScreenError::NotFound(id) => format!("Screen not found: {}", id),
            ScreenError::ValidationFailed(err) => err.to_string(),
        }
    }
}

impl std::fmt::Display for ScreenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ScreenError {}

impl From<ValidationError> for ScreenError {
    fn from(err: ValidationError) -> Self {
        ScreenError::ValidationFailed(err)
    }
}
