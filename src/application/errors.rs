//! User-facing error taxonomy.
//!
//! Every failure from the registry, the broadcast channel, the stores and
//! the external collaborators is converted into a [`ControlError`] before it
//! reaches the HTTP layer. No raw transport error crosses this boundary.

use std::fmt;

use thiserror::Error;

use crate::domain::foundation::{
    ErrorCode, MediaItemId, SavedSessionId, ScreenId, ValidationError,
};
use crate::domain::screen::ScreenError;
use crate::ports::{
    CatalogError, ChannelError, GenerationError, SessionStoreError, SnapshotStoreError,
};

/// What a `NotFound` refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Screen(ScreenId),
    MediaItem(MediaItemId),
    Session(SavedSessionId),
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Screen(id) => write!(f, "screen {}", id),
            Missing::MediaItem(id) => write!(f, "media item {}", id),
            Missing::Session(id) => write!(f, "session {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    /// Referenced id is not live. Recoverable; removals treat it as success.
    #[error("Not found: {0}")]
    NotFound(Missing),

    /// Broadcast transport down or slow. Transient.
    #[error("Broadcast channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// Media catalog or image generator returned an error.
    #[error("Upstream service failed: {0}")]
    UpstreamFailure(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage failed: {0}")]
    Storage(String),
}

impl ControlError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ControlError::NotFound(Missing::Screen(_)) => ErrorCode::ScreenNotFound,
            ControlError::NotFound(Missing::MediaItem(_)) => ErrorCode::MediaItemNotFound,
            ControlError::NotFound(Missing::Session(_)) => ErrorCode::SessionNotFound,
            ControlError::ChannelUnavailable(_) => ErrorCode::ChannelUnavailable,
            ControlError::UpstreamFailure(_) => ErrorCode::UpstreamFailure,
            ControlError::Validation(_) => ErrorCode::ValidationFailed,
            ControlError::Storage(_) => ErrorCode::StorageError,
        }
    }

    /// Worth retrying automatically.
    pub fn is_transient(&self) -> bool {
        matches!(self, ControlError::ChannelUnavailable(_))
    }
}

impl From<ScreenError> for ControlError {
    fn from(err: ScreenError) -> Self {
        match err {
            ScreenError::NotFound(id) => ControlError::NotFound(Missing::Screen(id)),
            ScreenError::ValidationFailed(e) => ControlError::Validation(e),
        }
    }
}

impl From<ChannelError> for ControlError {
    fn from(err: ChannelError) -> Self {
        ControlError::ChannelUnavailable(err.to_string())
    }
}

impl From<CatalogError> for ControlError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => ControlError::NotFound(Missing::MediaItem(id)),
            other => ControlError::UpstreamFailure(other.to_string()),
        }
    }
}

impl From<GenerationError> for ControlError {
    fn from(err: GenerationError) -> Self {
        ControlError::UpstreamFailure(err.to_string())
    }
}

impl From<SessionStoreError> for ControlError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => ControlError::NotFound(Missing::Session(id)),
            other => ControlError::Storage(other.to_string()),
        }
    }
}

impl From<SnapshotStoreError> for ControlError {
    fn from(err: SnapshotStoreError) -> Self {
        ControlError::Storage(err.to_string())
    }
}
