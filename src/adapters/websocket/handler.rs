//! WebSocket upgrade handler for display connections.
//!
//! Each connection drives its own [`DisplayClient`]:
//! 1. Validate the screen id
//! 2. Upgrade to WebSocket
//! 3. Bootstrap and send `connected` with the current content
//! 4. Forward every render change as `content.update`
//! 5. Stop the client when either side closes

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use crate::application::{DisplayClient, DisplayClientConfig};
use crate::domain::foundation::ScreenId;
use crate::ports::{BroadcastChannel, ScreenSnapshotSource};

use super::messages::{ClientMessage, ServerMessage};

/// State required for display WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub source: Arc<dyn ScreenSnapshotSource>,
    pub channel: Arc<dyn BroadcastChannel>,
    pub client_config: DisplayClientConfig,
}

impl WebSocketState {
    pub fn new(
        source: Arc<dyn ScreenSnapshotSource>,
        channel: Arc<dyn BroadcastChannel>,
        client_config: DisplayClientConfig,
    ) -> Self {
        Self {
            source,
            channel,
            client_config,
        }
    }
}

/// Handle WebSocket upgrade requests for a display.
///
/// Route: `GET /display/:screen_id/live`
///
/// Unknown screens are accepted; the display stays blank until content is
/// assigned.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(screen_id): Path<String>,
    State(state): State<WebSocketState>,
) -> Response {
    let screen_id: ScreenId = match screen_id.parse() {
        Ok(id) => id,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid screen ID").into_response(),
    };

    ws.on_upgrade(move |socket| handle_socket(socket, screen_id, state))
}

async fn handle_socket(socket: WebSocket, screen_id: ScreenId, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();
    let client_id = Uuid::new_v4().to_string();

    let client = Arc::new(DisplayClient::new(
        screen_id.clone(),
        state.source.clone(),
        state.channel.clone(),
        state.client_config,
    ));
    let mut render = client.watch();

    client.bootstrap().await;
    let initial = render.borrow_and_update().clone();
    let connected = ServerMessage::connected(screen_id.as_str(), &client_id, initial);
    if let Err(e) = send_message(&mut sender, &connected).await {
        tracing::debug!(client_id = %client_id, "Failed to send connected message: {}", e);
        return;
    }
    tracing::info!(screen_id = %screen_id, client_id = %client_id, "Display connected");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut run_task = {
        let client = client.clone();
        tokio::spawn(async move { client.run(shutdown_rx).await })
    };

    // Replies to client requests go through the send task so the sink has
    // a single owner.
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<ServerMessage>();

    let mut send_task = {
        let client_id = client_id.clone();
        let screen_id = screen_id.clone();
        tokio::spawn(async move {
            loop {
                let msg = tokio::select! {
                    changed = render.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let content = render.borrow_and_update().clone();
                        ServerMessage::content_update(screen_id.as_str(), content)
                    }
                    reply = reply_rx.recv() => match reply {
                        Some(msg) => msg,
                        None => break,
                    },
                };
                if let Err(e) = send_message(&mut sender, &msg).await {
                    tracing::debug!(client_id = %client_id, "Send error, closing connection: {}", e);
                    break;
                }
            }
        })
    };

    let mut recv_task = {
        let client = client.clone();
        let client_id = client_id.clone();
        tokio::spawn(async move {
            while let Some(result) = receiver.next().await {
                match result {
                    Ok(Message::Text(text)) => {
                        let reply = match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Ping) => ServerMessage::pong(),
                            Ok(ClientMessage::RequestState) => ServerMessage::content_update(
                                client.screen_id().as_str(),
                                client.current(),
                            ),
                            Err(e) => {
                                tracing::debug!(client_id = %client_id, "Unparseable message: {}", e);
                                ServerMessage::error("BAD_MESSAGE", "Unrecognized message")
                            }
                        };
                        if reply_tx.send(reply).is_err() {
                            break;
                        }
                    }
                    Ok(Message::Binary(_)) => {
                        tracing::warn!(client_id = %client_id, "Received unsupported binary message");
                    }
                    // Protocol-level ping/pong is answered by axum.
                    Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                    Ok(Message::Close(_)) => {
                        tracing::debug!(client_id = %client_id, "Display sent close frame");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(client_id = %client_id, "Receive error: {}", e);
                        break;
                    }
                }
            }
        })
    };

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
        _ = &mut run_task => {
            send_task.abort();
            recv_task.abort();
        }
    }

    // Releases the subscription held by the client.
    let _ = shutdown_tx.send(true);
    if !run_task.is_finished() {
        let _ = run_task.await;
    }

    tracing::info!(screen_id = %screen_id, client_id = %client_id, "Display disconnected");
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    sender.send(Message::Text(json)).await
}

/// Router for the display WebSocket endpoint, nested under `/display`.
pub fn websocket_router(state: WebSocketState) -> axum::Router {
    use axum::routing::get;

    axum::Router::new()
        .route("/:screen_id/live", get(ws_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::broadcast::InMemoryBroadcastChannel;
    use crate::domain::screen::ScreenRegistry;

    fn state() -> WebSocketState {
        WebSocketState::new(
            Arc::new(ScreenRegistry::new()),
            Arc::new(InMemoryBroadcastChannel::new()),
            DisplayClientConfig::default(),
        )
    }

    #[test]
    fn websocket_state_is_cloneable() {
        let state = state();
        let cloned = state.clone();
        assert!(Arc::ptr_eq(&state.channel, &cloned.channel));
    }

    #[tokio::test]
    async fn router_builds() {
        let _router = websocket_router(state());
    }
}
