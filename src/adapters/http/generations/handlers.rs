//! HTTP handlers for image generation.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::handle_control_error;
use crate::application::GenerateImagesHandler;

use super::dto::{GenerateImagesRequest, GenerateImagesResponse};

#[derive(Clone)]
pub struct GenerationHandlers {
    generate_handler: Arc<GenerateImagesHandler>,
}

impl GenerationHandlers {
    pub fn new(generate_handler: Arc<GenerateImagesHandler>) -> Self {
        Self { generate_handler }
    }
}

/// POST /api/generations - Generate images from a prompt
///
/// Answers with whatever arrived before the generation timeout; `partial`
/// is set when fewer images than requested came back.
pub async fn generate_images(
    State(handlers): State<GenerationHandlers>,
    Json(req): Json<GenerateImagesRequest>,
) -> Response {
    match handlers.generate_handler.handle(req.into()).await {
        Ok(result) => {
            (StatusCode::OK, Json(GenerateImagesResponse::from(result))).into_response()
        }
        Err(e) => handle_control_error(e),
    }
}
