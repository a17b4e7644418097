//! HTTP adapter for saved session endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    LoadSessionResponse, SaveSessionRequest, SessionListResponse, SessionSummaryResponse,
};
pub use handlers::SessionHandlers;
pub use routes::session_routes;
