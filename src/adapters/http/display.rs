//! Bootstrap snapshot for a single display.
//!
//! Displays call `GET /display/:screen_id` to render before (or instead
//! of) opening the live socket.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::application::{ControlError, Missing};
use crate::domain::foundation::ScreenId;
use crate::domain::screen::ContentAssignment;
use crate::ports::ScreenSnapshotSource;

use super::error::{handle_control_error, invalid_id};

#[derive(Clone)]
pub struct DisplayHandlers {
    source: Arc<dyn ScreenSnapshotSource>,
}

impl DisplayHandlers {
    pub fn new(source: Arc<dyn ScreenSnapshotSource>) -> Self {
        Self { source }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySnapshotResponse {
    pub screen_id: String,
    pub name: String,
    pub content: Option<ContentAssignment>,
}

/// GET /display/:screen_id - The registry's view of one screen
pub async fn get_display_snapshot(
    State(handlers): State<DisplayHandlers>,
    Path(screen_id): Path<String>,
) -> Response {
    let Ok(screen_id) = screen_id.parse::<ScreenId>() else {
        return invalid_id("screen");
    };

    let screen = handlers
        .source
        .snapshot()
        .await
        .into_iter()
        .find(|screen| screen.id() == &screen_id);

    match screen {
        Some(screen) => {
            let response = DisplaySnapshotResponse {
                screen_id: screen.id().to_string(),
                name: screen.name().to_string(),
                content: screen.current_content().cloned(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        None => handle_control_error(ControlError::NotFound(Missing::Screen(screen_id))),
    }
}

/// Creates the display snapshot router, mounted at `/display`.
pub fn display_routes(handlers: DisplayHandlers) -> Router {
    Router::new()
        .route("/:screen_id", get(get_display_snapshot))
        .with_state(handlers)
}
