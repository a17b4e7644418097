//! HTTP handlers for screen endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{handle_control_error, invalid_id};
use crate::application::{ContentChange, ControlError, ControllerCoordinator, MediaLibrary};
use crate::domain::foundation::{MediaItemId, ScreenId, ValidationError};
use crate::domain::screen::{ContentAssignment, TransformRequest};

use super::dto::{
    AssignContentRequest, ContentChangeResponse, CreateScreenRequest, RenameScreenRequest,
    RotateRequest, ScreenListResponse, ScreenResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ScreenHandlers {
    coordinator: Arc<ControllerCoordinator>,
    media: Arc<MediaLibrary>,
}

impl ScreenHandlers {
    pub fn new(coordinator: Arc<ControllerCoordinator>, media: Arc<MediaLibrary>) -> Self {
        Self { coordinator, media }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/screens - Registry snapshot plus the selected screen
pub async fn list_screens(State(handlers): State<ScreenHandlers>) -> Response {
    let screens = handlers.coordinator.snapshot().await;
    let selected_id = handlers
        .coordinator
        .selected()
        .await
        .map(|screen| screen.id().to_string());

    let response = ScreenListResponse {
        screens: screens.into_iter().map(ScreenResponse::from).collect(),
        selected_id,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// POST /api/screens - Add a screen
pub async fn create_screen(
    State(handlers): State<ScreenHandlers>,
    body: Option<Json<CreateScreenRequest>>,
) -> Response {
    let req = body.map(|Json(req)| req).unwrap_or_default();

    match handlers.coordinator.add_screen(req.name).await {
        Ok(screen) => (StatusCode::CREATED, Json(ScreenResponse::from(screen))).into_response(),
        Err(e) => handle_control_error(e),
    }
}

/// PATCH /api/screens/:id - Rename a screen
pub async fn rename_screen(
    State(handlers): State<ScreenHandlers>,
    Path(screen_id): Path<String>,
    Json(req): Json<RenameScreenRequest>,
) -> Response {
    let Ok(screen_id) = screen_id.parse::<ScreenId>() else {
        return invalid_id("screen");
    };

    match handlers.coordinator.rename_screen(&screen_id, req.name).await {
        Ok(screen) => (StatusCode::OK, Json(ScreenResponse::from(screen))).into_response(),
        Err(e) => handle_control_error(e),
    }
}

/// DELETE /api/screens/:id - Remove a screen (idempotent)
pub async fn delete_screen(
    State(handlers): State<ScreenHandlers>,
    Path(screen_id): Path<String>,
) -> Response {
    if let Ok(screen_id) = screen_id.parse::<ScreenId>() {
        handlers.coordinator.remove_screen(&screen_id).await;
    }
    StatusCode::NO_CONTENT.into_response()
}

/// POST /api/screens/:id/select - Make a screen the editing target
pub async fn select_screen(
    State(handlers): State<ScreenHandlers>,
    Path(screen_id): Path<String>,
) -> Response {
    let Ok(screen_id) = screen_id.parse::<ScreenId>() else {
        return invalid_id("screen");
    };

    match handlers.coordinator.select_screen(&screen_id).await {
        Ok(screen) => (StatusCode::OK, Json(ScreenResponse::from(screen))).into_response(),
        Err(e) => handle_control_error(e),
    }
}

/// PUT /api/screens/:id/content - Show media on a screen
pub async fn assign_content(
    State(handlers): State<ScreenHandlers>,
    Path(screen_id): Path<String>,
    Json(req): Json<AssignContentRequest>,
) -> Response {
    let Ok(screen_id) = screen_id.parse::<ScreenId>() else {
        return invalid_id("screen");
    };

    let result = match req {
        AssignContentRequest::Catalog { media_item_id } => {
            assign_catalog_item(&handlers, &screen_id, media_item_id).await
        }
        AssignContentRequest::Inline {
            content_type,
            title,
            url,
        } => {
            if url.trim().is_empty() {
                Err(ValidationError::empty_field("url").into())
            } else {
                let content = ContentAssignment::new(content_type, title, url);
                handlers.coordinator.assign_content(&screen_id, content).await
            }
        }
        AssignContentRequest::Generated(image) => {
            handlers
                .coordinator
                .assign_generated_image(&image, &screen_id)
                .await
        }
    };

    content_change_response(result)
}

/// PATCH /api/screens/:id/transform - Adjust rotation, scale or background
pub async fn adjust_transform(
    State(handlers): State<ScreenHandlers>,
    Path(screen_id): Path<String>,
    Json(req): Json<TransformRequest>,
) -> Response {
    let Ok(screen_id) = screen_id.parse::<ScreenId>() else {
        return invalid_id("screen");
    };

    content_change_response(handlers.coordinator.adjust_transform(&screen_id, &req).await)
}

/// POST /api/screens/:id/rotate - Rotate by a delta (e.g. 90 or -90)
pub async fn rotate_screen(
    State(handlers): State<ScreenHandlers>,
    Path(screen_id): Path<String>,
    Json(req): Json<RotateRequest>,
) -> Response {
    let Ok(screen_id) = screen_id.parse::<ScreenId>() else {
        return invalid_id("screen");
    };

    content_change_response(handlers.coordinator.rotate_by(&screen_id, req.degrees).await)
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

async fn assign_catalog_item(
    handlers: &ScreenHandlers,
    screen_id: &ScreenId,
    media_item_id: String,
) -> Result<ContentChange, ControlError> {
    let media_item_id = MediaItemId::new(media_item_id)?;
    let item = handlers.media.find(&media_item_id).await?;
    handlers.coordinator.assign_media(&item, screen_id).await
}

/// A failed broadcast still answers 200; the response carries a warning.
fn content_change_response(
    result: Result<ContentChange, ControlError>,
) -> Response {
    match result {
        Ok(change) => {
            if let Some(warning) = change.broadcast.warning() {
                tracing::warn!(screen_id = %change.screen_id, "Content saved but not broadcast: {}", warning);
            }
            (StatusCode::OK, Json(ContentChangeResponse::from(change))).into_response()
        }
        Err(e) => handle_control_error(e),
    }
}
