//! HTTP routes for screen endpoints.

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use super::handlers::{
    adjust_transform, assign_content, create_screen, delete_screen, list_screens, rename_screen,
    rotate_screen, select_screen, ScreenHandlers,
};

/// Creates the screen router, mounted at `/api/screens`.
pub fn screen_routes(handlers: ScreenHandlers) -> Router {
    Router::new()
        .route("/", get(list_screens).post(create_screen))
        .route("/:id", patch(rename_screen).delete(delete_screen))
        .route("/:id/select", post(select_screen))
        .route("/:id/content", put(assign_content))
        .route("/:id/transform", patch(adjust_transform))
        .route("/:id/rotate", post(rotate_screen))
        .with_state(handlers)
}
