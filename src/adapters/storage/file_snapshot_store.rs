//! File-based screen snapshot store.
//!
//! Keeps the ordered screen list as a single YAML document. Each write goes
//! to its own sibling temp file and is renamed into place, so a crash
//! mid-write leaves the previous snapshot intact and concurrent saves never
//! share a temp file.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::domain::screen::Screen;
use crate::ports::{ScreenSnapshotStore, SnapshotStoreError};

/// YAML file storage for the screen snapshot
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store writing to `path` (e.g. `./data/screens.yaml`)
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path
            .with_extension(format!("yaml.{}.tmp", Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl ScreenSnapshotStore for FileSnapshotStore {
    async fn save(&self, screens: &[Screen]) -> Result<(), SnapshotStoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SnapshotStoreError::IoError(e.to_string()))?;
        }

        let yaml = serde_yaml::to_string(screens)
            .map_err(|e| SnapshotStoreError::SerializationFailed(e.to_string()))?;

        let temp = self.temp_path();
        if let Err(e) = fs::write(&temp, yaml).await {
            let _ = fs::remove_file(&temp).await;
            return Err(SnapshotStoreError::IoError(e.to_string()));
        }
        if let Err(e) = fs::rename(&temp, &self.path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(SnapshotStoreError::IoError(e.to_string()));
        }

        tracing::trace!(path = %self.path.display(), screens = screens.len(), "Snapshot saved");
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Screen>, SnapshotStoreError> {
        let yaml = match fs::read_to_string(&self.path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(SnapshotStoreError::IoError(e.to_string())),
        };

        if yaml.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_yaml::from_str(&yaml)
            .map_err(|e| SnapshotStoreError::DeserializationFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ScreenId;
    use crate::domain::screen::{
        BackgroundColor, ContentAssignment, ContentType, Rotation, Scale,
    };
    use std::sync::Arc;
    use tempfile::TempDir;

    fn sample_screen() -> Screen {
        let content = ContentAssignment::new(ContentType::Image, "T", "http://x/y.png")
            .with_rotation(Rotation::new(90.0).unwrap())
            .with_scale(Scale::new(1.5).unwrap())
            .with_background_color(BackgroundColor::new("#111111").unwrap());
        Screen::reconstitute(
            ScreenId::new("s1").unwrap(),
            "Tela 1".to_string(),
            true,
            Some(content),
        )
    }

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("screens.yaml"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_reproduces_screens() {
        let dir = TempDir::new().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nested/screens.yaml"));
        let screens = vec![
            sample_screen(),
            Screen::new(ScreenId::new("s2").unwrap(), "Tela 2").unwrap(),
        ];

        store.save(&screens).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, screens);
        assert_eq!(leftover_files(dir.path().join("nested")), vec!["screens.yaml"]);
    }

    fn leftover_files(dir: impl AsRef<Path>) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_saves_all_succeed() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(FileSnapshotStore::new(dir.path().join("screens.yaml")));

        for _ in 0..20 {
            let saves: Vec<_> = (0..8)
                .map(|n| {
                    let store = store.clone();
                    tokio::spawn(async move {
                        let screen =
                            Screen::new(ScreenId::new(format!("s{}", n)).unwrap(), "Tela 1")
                                .unwrap();
                        store.save(&[screen]).await
                    })
                })
                .collect();
            for save in saves {
                save.await.unwrap().unwrap();
            }
        }

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(leftover_files(dir.path()), vec!["screens.yaml"]);
    }

    #[tokio::test]
    async fn missing_optional_fields_get_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("screens.yaml");
        std::fs::write(
            &path,
            "- id: s1\n  name: Tela 1\n  currentContent:\n    url: http://x/a.png\n",
        )
        .unwrap();

        let loaded = FileSnapshotStore::new(&path).load().await.unwrap();
        let content = loaded[0].current_content().unwrap();

        assert!(loaded[0].is_active());
        assert_eq!(content.content_type(), ContentType::Image);
        assert_eq!(content.title(), "");
        assert_eq!(content.rotation().degrees(), 0.0);
        assert_eq!(content.scale().value(), 1.0);
        assert_eq!(content.background_color().as_str(), "#000000");
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("screens.yaml");
        std::fs::write(&path, "{not: [valid").unwrap();

        let result = FileSnapshotStore::new(&path).load().await;
        assert!(matches!(result, Err(SnapshotStoreError::DeserializationFailed(_))));
    }
}
