//! HTTP routes for image generation.

use axum::{routing::post, Router};

use super::handlers::{generate_images, GenerationHandlers};

/// Creates the generation router, mounted at `/api/generations`.
pub fn generation_routes(handlers: GenerationHandlers) -> Router {
    Router::new()
        .route("/", post(generate_images))
        .with_state(handlers)
}
