//! HTTP handlers for media endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;

use crate::adapters::http::error::{handle_control_error, invalid_id};
use crate::application::{MediaLibrary, UploadMediaCommand};
use crate::domain::foundation::MediaItemId;

use super::dto::{MediaListResponse, UploadMediaQuery};

#[derive(Clone)]
pub struct MediaHandlers {
    library: Arc<MediaLibrary>,
}

impl MediaHandlers {
    pub fn new(library: Arc<MediaLibrary>) -> Self {
        Self { library }
    }
}

/// GET /api/media - Catalog items, newest first
pub async fn list_media(State(handlers): State<MediaHandlers>) -> Response {
    match handlers.library.list().await {
        Ok(items) => (StatusCode::OK, Json(MediaListResponse::from(items))).into_response(),
        Err(e) => handle_control_error(e),
    }
}

/// POST /api/media?fileName=..&title=.. - Upload the request body
pub async fn upload_media(
    State(handlers): State<MediaHandlers>,
    Query(query): Query<UploadMediaQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let cmd = UploadMediaCommand {
        file_name: query.file_name,
        mime_type,
        bytes: body,
        title: query.title,
    };

    match handlers.library.upload(cmd).await {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => handle_control_error(e),
    }
}

/// DELETE /api/media/:id - Delete a catalog item and its file
pub async fn delete_media(
    State(handlers): State<MediaHandlers>,
    Path(media_id): Path<String>,
) -> Response {
    let Ok(media_id) = media_id.parse::<MediaItemId>() else {
        return invalid_id("media item");
    };

    match handlers.library.delete(&media_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_control_error(e),
    }
}
