//! SessionStore port - named saved sessions.

use async_trait::async_trait;

use crate::domain::foundation::SavedSessionId;
use crate::domain::saved_session::{SavedSession, SavedSessionSummary};

/// Errors that can occur during session storage operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(SavedSessionId),

    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert or overwrite a session.
    async fn save(&self, session: &SavedSession) -> Result<(), SessionStoreError>;

    /// All sessions, newest first.
    async fn list(&self) -> Result<Vec<SavedSessionSummary>, SessionStoreError>;

    /// Load one session.
    ///
    /// # Errors
    ///
    /// `SessionStoreError::NotFound` if no session has this id.
    async fn get(&self, id: &SavedSessionId) -> Result<SavedSession, SessionStoreError>;

    /// Delete a session. Returns `false` if it did not exist.
    async fn delete(&self, id: &SavedSessionId) -> Result<bool, SessionStoreError>;
}
