//! HTTP adapter for screen endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AssignContentRequest, ContentChangeResponse, CreateScreenRequest, RenameScreenRequest,
    RotateRequest, ScreenListResponse, ScreenResponse,
};
pub use handlers::ScreenHandlers;
pub use routes::screen_routes;
