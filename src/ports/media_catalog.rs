//! MediaCatalog port - external store of uploaded media.
//!
//! Treated as already correct: callers check for an error signal and do not
//! retry.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::foundation::MediaItemId;
use crate::domain::media::{MediaItem, NewMediaItem};

/// Errors returned by a media catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Media item not found: {0}")]
    NotFound(MediaItemId),

    #[error("Catalog request failed: {0}")]
    Upstream(String),

    #[error("Unexpected catalog response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait MediaCatalog: Send + Sync {
    /// All items, newest first, with public URLs resolved.
    async fn list_media_items(&self) -> Result<Vec<MediaItem>, CatalogError>;

    /// Public URL for a storage path.
    fn resolve_public_url(&self, storage_path: &str) -> String;

    /// Delete a catalog row.
    async fn delete_media_item(&self, id: &MediaItemId) -> Result<(), CatalogError>;

    /// Store file bytes at `destination_path`. Returns the stored path.
    async fn upload_file(
        &self,
        bytes: Bytes,
        destination_path: &str,
        mime_type: &str,
    ) -> Result<String, CatalogError>;

    /// Insert the catalog row for an uploaded file.
    async fn create_media_item(&self, item: NewMediaItem) -> Result<MediaItem, CatalogError>;
}
