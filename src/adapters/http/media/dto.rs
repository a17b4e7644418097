//! HTTP DTOs for media endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::media::MediaItem;

/// Query string for `POST /api/media`; the file itself is the raw body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMediaQuery {
    pub file_name: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MediaListResponse {
    pub items: Vec<MediaItem>,
    pub total: usize,
}

impl From<Vec<MediaItem>> for MediaListResponse {
    fn from(items: Vec<MediaItem>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_query_title_is_optional() {
        let query: UploadMediaQuery =
            serde_json::from_value(serde_json::json!({"fileName": "a.png"})).unwrap();
        assert_eq!(query.file_name, "a.png");
        assert!(query.title.is_none());
    }
}
