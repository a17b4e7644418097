//! Application handlers.
//!
//! Services that orchestrate the media catalog, image generation and saved
//! sessions around the coordinator.

mod generate_images;
mod media_library;
mod session_manager;

pub use generate_images::{GenerateImagesCommand, GenerateImagesHandler, GenerateImagesResult};
pub use media_library::{MediaLibrary, UploadMediaCommand};
pub use session_manager::SessionManager;
