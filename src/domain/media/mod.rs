//! Media domain module.
//!
//! Catalog entries ([`MediaItem`]) and AI image generation requests/results.
//! The catalog itself lives behind the [`MediaCatalog`](crate::ports::MediaCatalog)
//! port; this module only holds the values that cross it.

mod generation;

pub use generation::{
    GeneratedImage, GenerationParams, GenerationRequest, OutputFormat, DEFAULT_MODEL,
    MAX_PROMPT_LENGTH, MAX_RESULTS,
};

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MediaItemId, Timestamp};
use crate::domain::screen::{ContentAssignment, ContentType};

/// Title given to AI generated images assigned to a screen.
pub const GENERATED_IMAGE_TITLE: &str = "AI generated image";

/// A stored media file known to the catalog, with its public URL resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: MediaItemId,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: ContentType,
    pub file_path: String,
    pub size: u64,
    pub created_at: Timestamp,
    pub url: String,
}

impl MediaItem {
    /// Fresh assignment for this item with the default transform.
    pub fn to_content_assignment(&self) -> ContentAssignment {
        ContentAssignment::new(self.media_type, self.title.clone(), self.url.clone())
    }
}

/// Catalog row to insert after a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMediaItem {
    pub title: String,
    pub media_type: ContentType,
    pub file_path: String,
    pub size: u64,
}

/// Storage path for an upload: `<type>s/<uuid>-<file name>`.
pub fn upload_path(media_type: ContentType, file_name: &str) -> String {
    let file_name: String = file_name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}s/{}-{}", media_type.as_str(), uuid::Uuid::new_v4(), file_name)
}
