//! SessionManager - save, list, load and delete named screen configurations.

use std::sync::Arc;

use crate::domain::foundation::SavedSessionId;
use crate::domain::saved_session::{SavedSession, SavedSessionSummary};
use crate::ports::SessionStore;

use crate::application::coordinator::{ControllerCoordinator, ReplaceReport};
use crate::application::errors::ControlError;

pub struct SessionManager {
    coordinator: Arc<ControllerCoordinator>,
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    pub fn new(coordinator: Arc<ControllerCoordinator>, store: Arc<dyn SessionStore>) -> Self {
        Self { coordinator, store }
    }

    /// Saves the current screen set under `name`.
    pub async fn save_current(&self, name: String) -> Result<SavedSessionSummary, ControlError> {
        let screens = self.coordinator.snapshot().await;
        let session = SavedSession::capture(name, screens)?;
        self.store.save(&session).await?;

        tracing::info!(
            session_id = %session.id(),
            name = %session.name(),
            screens = session.screens().len(),
            "Session saved"
        );
        Ok(SavedSessionSummary::from(&session))
    }

    /// Sessions, newest first.
    pub async fn list(&self) -> Result<Vec<SavedSessionSummary>, ControlError> {
        Ok(self.store.list().await?)
    }

    /// Replaces the screen set with the saved one and republishes it.
    pub async fn load(&self, id: &SavedSessionId) -> Result<ReplaceReport, ControlError> {
        let session = self.store.get(id).await?;
        tracing::info!(session_id = %id, name = %session.name(), "Loading session");
        Ok(self.coordinator.replace_all(session.into_screens()).await)
    }

    /// Clears the screen set.
    pub async fn start_new(&self) -> ReplaceReport {
        self.coordinator.replace_all(Vec::new()).await
    }

    /// Deleting an unknown session succeeds.
    pub async fn delete(&self, id: &SavedSessionId) -> Result<(), ControlError> {
        if !self.store.delete(id).await? {
            tracing::debug!(session_id = %id, "Delete of absent session ignored");
        }
        Ok(())
    }
}
