//! File-based saved session store.
//!
//! One YAML file per session, named `<session id>.yaml`.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::SavedSessionId;
use crate::domain::saved_session::{SavedSession, SavedSessionSummary};
use crate::ports::{SessionStore, SessionStoreError};

/// YAML file storage for saved sessions
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    /// Create a store rooted at `base_path` (e.g. `./data/sessions`)
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn session_path(&self, id: &SavedSessionId) -> PathBuf {
        self.base_path.join(format!("{}.yaml", id))
    }

    async fn read_session(&self, path: &Path) -> Result<SavedSession, SessionStoreError> {
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?;
        serde_yaml::from_str(&yaml)
            .map_err(|e| SessionStoreError::DeserializationFailed(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(&self, session: &SavedSession) -> Result<(), SessionStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?;

        let yaml = serde_yaml::to_string(session)
            .map_err(|e| SessionStoreError::SerializationFailed(e.to_string()))?;

        fs::write(self.session_path(session.id()), yaml)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<SavedSessionSummary>, SessionStoreError> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SessionStoreError::IoError(e.to_string())),
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            match self.read_session(&path).await {
                Ok(session) => summaries.push(SavedSessionSummary::from(&session)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable session file");
                }
            }
        }

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn get(&self, id: &SavedSessionId) -> Result<SavedSession, SessionStoreError> {
        let path = self.session_path(id);
        if !path.exists() {
            return Err(SessionStoreError::NotFound(*id));
        }
        self.read_session(&path).await
    }

    async fn delete(&self, id: &SavedSessionId) -> Result<bool, SessionStoreError> {
        match fs::remove_file(self.session_path(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SessionStoreError::IoError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ScreenId;
    use crate::domain::screen::Screen;
    use tempfile::TempDir;

    fn session(name: &str) -> SavedSession {
        let screens = vec![Screen::new(ScreenId::new("s1").unwrap(), "Screen 1").unwrap()];
        SavedSession::capture(name, screens).unwrap()
    }

    #[tokio::test]
    async fn save_and_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());
        let saved = session("Lobby");

        store.save(&saved).await.unwrap();

        assert_eq!(store.get(saved.id()).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn list_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("sessions"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_is_newest_first_and_skips_junk() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());
        let first = session("First");
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = session("Second");
        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::write(dir.path().join("broken.yaml"), "{oops").unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();

        assert_eq!(names, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn get_unknown_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());
        let result = store.get(&SavedSessionId::new()).await;
        assert!(matches!(result, Err(SessionStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());
        let saved = session("Lobby");
        store.save(&saved).await.unwrap();

        assert!(store.delete(saved.id()).await.unwrap());
        assert!(!store.delete(saved.id()).await.unwrap());
    }
}
