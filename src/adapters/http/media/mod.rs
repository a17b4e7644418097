//! HTTP adapter for the media catalog.

mod dto;
mod handlers;
mod routes;

pub use dto::{MediaListResponse, UploadMediaQuery};
pub use handlers::MediaHandlers;
pub use routes::{media_routes, MAX_UPLOAD_BYTES};
