//! WebSocket message types for display connections.
//!
//! Messages are JSON encoded with a `type` discriminator.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::screen::ContentAssignment;

// ============================================
// Server → Display Messages
// ============================================

/// All message types that can be sent to a display.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once after the upgrade, carrying the bootstrap content.
    Connected(ConnectedMessage),

    /// The screen's content changed.
    #[serde(rename = "content.update")]
    ContentUpdate(ContentUpdateMessage),

    /// Error notification.
    Error(ErrorMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

impl ServerMessage {
    pub fn connected(
        screen_id: impl Into<String>,
        client_id: impl Into<String>,
        content: Option<ContentAssignment>,
    ) -> Self {
        ServerMessage::Connected(ConnectedMessage {
            screen_id: screen_id.into(),
            client_id: client_id.into(),
            content,
            timestamp: now_rfc3339(),
        })
    }

    pub fn content_update(screen_id: impl Into<String>, content: Option<ContentAssignment>) -> Self {
        ServerMessage::ContentUpdate(ContentUpdateMessage {
            screen_id: screen_id.into(),
            content,
            timestamp: now_rfc3339(),
        })
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        ServerMessage::Error(ErrorMessage {
            code: code.into(),
            message: message.into(),
            timestamp: now_rfc3339(),
        })
    }

    pub fn pong() -> Self {
        ServerMessage::Pong(PongMessage {
            timestamp: now_rfc3339(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub screen_id: String,
    pub client_id: String,
    /// `null` while the screen has nothing to show.
    pub content: Option<ContentAssignment>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdateMessage {
    pub screen_id: String,
    pub content: Option<ContentAssignment>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

// ============================================
// Display → Server Messages
// ============================================

/// All message types that can be received from a display.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat request.
    Ping,

    /// Ask for the currently rendered content again.
    #[serde(rename = "request.state")]
    RequestState,
}

fn now_rfc3339() -> String {
    Timestamp::now().as_datetime().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::screen::ContentType;

    #[test]
    fn connected_message_serializes_with_type_tag() {
        let msg = ServerMessage::connected("s1", "client-1", None);

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"connected""#));
        assert!(json.contains(r#""screenId":"s1""#));
        assert!(json.contains(r#""content":null"#));
    }

    #[test]
    fn content_update_carries_full_assignment() {
        let content = ContentAssignment::new(ContentType::Image, "Poster", "https://cdn/p.png");
        let msg = ServerMessage::content_update("s1", Some(content));

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "content.update");
        assert_eq!(value["content"]["url"], "https://cdn/p.png");
        assert_eq!(value["content"]["rotation"], 0.0);
        assert_eq!(value["content"]["scale"], 1.0);
    }

    #[test]
    fn pong_serializes() {
        let json = serde_json::to_string(&ServerMessage::pong()).unwrap();
        assert!(json.contains(r#""type":"pong""#));
    }

    #[test]
    fn client_message_deserializes_ping() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn client_message_deserializes_request_state() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "request.state"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::RequestState));
    }

    #[test]
    fn unknown_client_message_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type": "shutdown"}"#).is_err());
    }
}
