//! WebSocket adapter for display screens.
//!
//! ```text
//!  Coordinator ──publish──▶ BroadcastChannel ──screen:<id>──▶ DisplayClient
//!                                                               │ watch
//!                                                               ▼
//!                                                   /display/:screen_id/live
//! ```
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`handler`] - Axum upgrade handler running one display client per socket

pub mod handler;
pub mod messages;

pub use handler::{websocket_router, ws_handler, WebSocketState};
pub use messages::{
    ClientMessage, ConnectedMessage, ContentUpdateMessage, ErrorMessage, PongMessage,
    ServerMessage,
};
