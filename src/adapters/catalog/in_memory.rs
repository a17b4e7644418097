//! In-memory media catalog.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{MediaItemId, Timestamp};
use crate::domain::media::{MediaItem, NewMediaItem};
use crate::ports::{CatalogError, MediaCatalog};

#[derive(Default)]
struct CatalogState {
    items: Vec<MediaItem>,
    files: HashMap<String, Bytes>,
}

/// Catalog kept in process memory. Public URLs are `<base_url>/<path>`.
pub struct InMemoryMediaCatalog {
    base_url: String,
    state: RwLock<CatalogState>,
}

impl InMemoryMediaCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            state: RwLock::new(CatalogState::default()),
        }
    }

    /// Insert a ready-made item (test fixtures).
    pub async fn insert(&self, item: MediaItem) {
        self.state.write().await.items.push(item);
    }

    /// Whether a file is stored at `path`.
    pub async fn has_file(&self, path: &str) -> bool {
        self.state.read().await.files.contains_key(path)
    }
}

impl Default for InMemoryMediaCatalog {
    fn default() -> Self {
        Self::new("http://localhost:8080/files")
    }
}

#[async_trait]
impl MediaCatalog for InMemoryMediaCatalog {
    async fn list_media_items(&self) -> Result<Vec<MediaItem>, CatalogError> {
        let mut items = self.state.read().await.items.clone();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    fn resolve_public_url(&self, storage_path: &str) -> String {
        format!("{}/{}", self.base_url, storage_path.trim_start_matches('/'))
    }

    async fn delete_media_item(&self, id: &MediaItemId) -> Result<(), CatalogError> {
        let mut state = self.state.write().await;
        let index = state
            .items
            .iter()
            .position(|item| &item.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        let item = state.items.remove(index);
        state.files.remove(&item.file_path);
        Ok(())
    }

    async fn upload_file(
        &self,
        bytes: Bytes,
        destination_path: &str,
        _mime_type: &str,
    ) -> Result<String, CatalogError> {
        self.state
            .write()
            .await
            .files
            .insert(destination_path.to_string(), bytes);
        Ok(destination_path.to_string())
    }

    async fn create_media_item(&self, item: NewMediaItem) -> Result<MediaItem, CatalogError> {
        let created = MediaItem {
            id: MediaItemId::generate(),
            url: self.resolve_public_url(&item.file_path),
            title: item.title,
            media_type: item.media_type,
            file_path: item.file_path,
            size: item.size,
            created_at: Timestamp::now(),
        };
        self.state.write().await.items.push(created.clone());
        Ok(created)
    }
}
