//! HTTP routes for media endpoints.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};

use super::handlers::{delete_media, list_media, upload_media, MediaHandlers};

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Creates the media router, mounted at `/api/media`.
pub fn media_routes(handlers: MediaHandlers) -> Router {
    Router::new()
        .route("/", get(list_media).post(upload_media))
        .route("/:id", delete(delete_media))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(handlers)
}
