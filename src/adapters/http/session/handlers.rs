//! HTTP handlers for saved session endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{handle_control_error, invalid_id};
use crate::application::SessionManager;
use crate::domain::foundation::SavedSessionId;

use super::dto::{
    LoadSessionResponse, SaveSessionRequest, SessionListResponse, SessionSummaryResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    manager: Arc<SessionManager>,
}

impl SessionHandlers {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/sessions - List saved sessions, newest first
pub async fn list_sessions(State(handlers): State<SessionHandlers>) -> Response {
    match handlers.manager.list().await {
        Ok(summaries) => {
            (StatusCode::OK, Json(SessionListResponse::from(summaries))).into_response()
        }
        Err(e) => handle_control_error(e),
    }
}

/// POST /api/sessions - Save the current screen set
pub async fn save_session(
    State(handlers): State<SessionHandlers>,
    Json(req): Json<SaveSessionRequest>,
) -> Response {
    match handlers.manager.save_current(req.name).await {
        Ok(summary) => {
            (StatusCode::CREATED, Json(SessionSummaryResponse::from(summary))).into_response()
        }
        Err(e) => handle_control_error(e),
    }
}

/// POST /api/sessions/new - Clear every screen
pub async fn start_new_session(State(handlers): State<SessionHandlers>) -> Response {
    let report = handlers.manager.start_new().await;
    (StatusCode::OK, Json(LoadSessionResponse::from(report))).into_response()
}

/// POST /api/sessions/:id/load - Replace the screen set with a saved one
pub async fn load_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let Ok(session_id) = session_id.parse::<SavedSessionId>() else {
        return invalid_id("session");
    };

    match handlers.manager.load(&session_id).await {
        Ok(report) => (StatusCode::OK, Json(LoadSessionResponse::from(report))).into_response(),
        Err(e) => handle_control_error(e),
    }
}

/// DELETE /api/sessions/:id - Delete a saved session (idempotent)
pub async fn delete_session(
    State(handlers): State<SessionHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let Ok(session_id) = session_id.parse::<SavedSessionId>() else {
        return invalid_id("session");
    };

    match handlers.manager.delete(&session_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => handle_control_error(e),
    }
}
