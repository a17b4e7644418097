//! In-memory saved session store (testing/development).

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::SavedSessionId;
use crate::domain::saved_session::{SavedSession, SavedSessionSummary};
use crate::ports::{SessionStore, SessionStoreError};

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SavedSessionId, SavedSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, session: &SavedSession) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .await
            .insert(*session.id(), session.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SavedSessionSummary>, SessionStoreError> {
        let sessions = self.sessions.read().await;
        let mut summaries: Vec<_> = sessions.values().map(SavedSessionSummary::from).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn get(&self, id: &SavedSessionId) -> Result<SavedSession, SessionStoreError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(SessionStoreError::NotFound(*id))
    }

    async fn delete(&self, id: &SavedSessionId) -> Result<bool, SessionStoreError> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }
}
