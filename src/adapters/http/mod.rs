//! HTTP adapters - REST API implementations.
//!
//! Each area has its own dto/handlers/routes module; [`router`] assembles
//! them with the display endpoints and middleware.

pub mod display;
pub mod error;
pub mod generations;
pub mod media;
pub mod router;
pub mod screens;
pub mod session;

pub use error::{ErrorResponse, WarningResponse};
pub use router::{api_router, ApiState, RouterOptions};
