//! Top-level router: API areas, display endpoints and HTTP middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Json, Router};
use http::HeaderValue;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::adapters::websocket::{websocket_router, WebSocketState};
use crate::application::{
    ControllerCoordinator, DisplayClientConfig, GenerateImagesHandler, MediaLibrary,
    SessionManager,
};
use crate::config::ServerConfig;
use crate::ports::{BroadcastChannel, ScreenSnapshotSource};

use super::display::{display_routes, DisplayHandlers};
use super::generations::{generation_routes, GenerationHandlers};
use super::media::{media_routes, MediaHandlers};
use super::screens::{screen_routes, ScreenHandlers};
use super::session::{session_routes, SessionHandlers};

/// Every handler group the router needs.
#[derive(Clone)]
pub struct ApiState {
    pub screens: ScreenHandlers,
    pub media: MediaHandlers,
    pub generations: GenerationHandlers,
    pub sessions: SessionHandlers,
    pub display: DisplayHandlers,
    pub websocket: WebSocketState,
}

impl ApiState {
    /// Wires every handler group around the shared services.
    pub fn new(
        coordinator: Arc<ControllerCoordinator>,
        media: Arc<MediaLibrary>,
        generator: Arc<GenerateImagesHandler>,
        sessions: Arc<SessionManager>,
        channel: Arc<dyn BroadcastChannel>,
        client_config: DisplayClientConfig,
    ) -> Self {
        let source: Arc<dyn ScreenSnapshotSource> = coordinator.registry().clone();
        Self {
            screens: ScreenHandlers::new(coordinator, media.clone()),
            media: MediaHandlers::new(media),
            generations: GenerationHandlers::new(generator),
            sessions: SessionHandlers::new(sessions),
            display: DisplayHandlers::new(source.clone()),
            websocket: WebSocketState::new(source, channel, client_config),
        }
    }
}

/// HTTP middleware settings taken from [`ServerConfig`].
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub request_timeout: Duration,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl From<&ServerConfig> for RouterOptions {
    fn from(server: &ServerConfig) -> Self {
        Self {
            request_timeout: server.request_timeout(),
            cors_origins: server.cors_origins_list(),
        }
    }
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            cors_origins: Vec::new(),
        }
    }
}

/// Builds the complete application router.
///
/// # Routes
///
/// - `/api/screens`, `/api/media`, `/api/generations`, `/api/sessions`
/// - `GET /display/:screen_id` and `GET /display/:screen_id/live`
/// - `GET /health`
pub fn api_router(state: ApiState, options: RouterOptions) -> Router {
    let api = Router::new()
        .nest("/screens", screen_routes(state.screens))
        .nest("/media", media_routes(state.media))
        .nest("/generations", generation_routes(state.generations))
        .nest("/sessions", session_routes(state.sessions))
        .layer(CompressionLayer::new());

    let display = display_routes(state.display).merge(websocket_router(state.websocket));

    Router::new()
        .nest("/api", api)
        .nest("/display", display)
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer(&options.cors_origins))
                .layer(TimeoutLayer::new(options.request_timeout)),
        )
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_server_config() {
        let server = ServerConfig {
            cors_origins: Some("http://a.test, http://b.test".to_string()),
            ..ServerConfig::default()
        };
        let options = RouterOptions::from(&server);
        assert_eq!(options.cors_origins.len(), 2);
        assert_eq!(options.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn invalid_origins_are_skipped() {
        let _layer = cors_layer(&["http://ok.test".to_string(), "bad\norigin".to_string()]);
    }
}
