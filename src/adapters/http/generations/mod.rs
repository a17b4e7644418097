//! HTTP adapter for image generation.

mod dto;
mod handlers;
mod routes;

pub use dto::{GenerateImagesRequest, GenerateImagesResponse};
pub use handlers::GenerationHandlers;
pub use routes::generation_routes;
