//! HTTP routes for saved session endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    delete_session, list_sessions, load_session, save_session, start_new_session,
    SessionHandlers,
};

/// Creates the session router, mounted at `/api/sessions`.
pub fn session_routes(handlers: SessionHandlers) -> Router {
    Router::new()
        .route("/", get(list_sessions).post(save_session))
        .route("/new", post(start_new_session))
        .route("/:id", delete(delete_session))
        .route("/:id/load", post(load_session))
        .with_state(handlers)
}
