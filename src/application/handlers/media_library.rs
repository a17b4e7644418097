//! MediaLibrary - catalog operations used by the controller.

use std::sync::Arc;

use bytes::Bytes;

use crate::domain::foundation::{MediaItemId, ValidationError};
use crate::domain::media::{upload_path, MediaItem, NewMediaItem};
use crate::domain::screen::ContentType;
use crate::ports::{CatalogError, MediaCatalog};

use crate::application::errors::{ControlError, Missing};

/// Command to upload a file into the catalog.
#[derive(Debug, Clone)]
pub struct UploadMediaCommand {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
    /// Defaults to the file name.
    pub title: Option<String>,
}

pub struct MediaLibrary {
    catalog: Arc<dyn MediaCatalog>,
}

impl MediaLibrary {
    pub fn new(catalog: Arc<dyn MediaCatalog>) -> Self {
        Self { catalog }
    }

    /// All items, newest first.
    pub async fn list(&self) -> Result<Vec<MediaItem>, ControlError> {
        Ok(self.catalog.list_media_items().await?)
    }

    pub async fn find(&self, id: &MediaItemId) -> Result<MediaItem, ControlError> {
        self.catalog
            .list_media_items()
            .await?
            .into_iter()
            .find(|item| &item.id == id)
            .ok_or_else(|| ControlError::NotFound(Missing::MediaItem(id.clone())))
    }

    /// Deletes an item. Deleting an unknown item succeeds.
    pub async fn delete(&self, id: &MediaItemId) -> Result<(), ControlError> {
        match self.catalog.delete_media_item(id).await {
            Ok(()) => Ok(()),
            Err(CatalogError::NotFound(_)) => {
                tracing::debug!(media_id = %id, "Delete of absent media item ignored");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Stores the file under `<type>s/<uuid>-<file name>` and records it.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty file, blank name, or a MIME type that is
    ///   neither `image/*` nor `video/*`
    /// - `UpstreamFailure` if the catalog rejects the upload or the insert
    pub async fn upload(&self, cmd: UploadMediaCommand) -> Result<MediaItem, ControlError> {
        let file_name = cmd.file_name.trim().to_string();
        if file_name.is_empty() {
            return Err(ValidationError::empty_field("file_name").into());
        }
        if cmd.bytes.is_empty() {
            return Err(ValidationError::empty_field("file").into());
        }
        let media_type = ContentType::from_mime(&cmd.mime_type).ok_or_else(|| {
            ValidationError::invalid_format("mime_type", "only image/* and video/* are accepted")
        })?;

        let path = upload_path(media_type, &file_name);
        let size = cmd.bytes.len() as u64;
        let stored_path = self
            .catalog
            .upload_file(cmd.bytes, &path, &cmd.mime_type)
            .await?;

        let title = cmd
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or(file_name);
        let item = self
            .catalog
            .create_media_item(NewMediaItem {
                title,
                media_type,
                file_path: stored_path,
                size,
            })
            .await?;

        tracing::info!(media_id = %item.id, path = %item.file_path, size, "Media uploaded");
        Ok(item)
    }
}
