//! Application layer - orchestration between the domain and the ports.
//!
//! - `ControllerCoordinator` - the single writer path (registry, persist, publish)
//! - `DisplayClient` - bootstrap-then-subscribe reconciliation for one screen
//! - `handlers` - media library, image generation and saved sessions
//! - `ControlError` - the error taxonomy surfaced to users

pub mod coordinator;
pub mod display_client;
pub mod errors;
pub mod handlers;

pub use coordinator::{BroadcastOutcome, ContentChange, ControllerCoordinator, ReplaceReport};
pub use display_client::{DisplayClient, DisplayClientConfig};
pub use errors::{ControlError, Missing};
pub use handlers::{
    GenerateImagesCommand, GenerateImagesHandler, GenerateImagesResult, MediaLibrary,
    SessionManager, UploadMediaCommand,
};
