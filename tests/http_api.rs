//! Integration tests for the HTTP API.
//!
//! The full router is built over in-memory adapters and driven with
//! `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use signage_hub::adapters::broadcast::InMemoryBroadcastChannel;
use signage_hub::adapters::catalog::InMemoryMediaCatalog;
use signage_hub::adapters::generation::{MockImageGenerator, MockResult};
use signage_hub::adapters::http::{api_router, ApiState, RouterOptions};
use signage_hub::adapters::storage::{InMemorySessionStore, InMemorySnapshotStore};
use signage_hub::application::{
    ControllerCoordinator, DisplayClientConfig, GenerateImagesHandler, MediaLibrary,
    SessionManager,
};
use signage_hub::domain::screen::ScreenRegistry;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app_with(channel: InMemoryBroadcastChannel, generator: MockImageGenerator) -> Router {
    let channel = Arc::new(channel);
    let coordinator = Arc::new(ControllerCoordinator::new(
        Arc::new(ScreenRegistry::new()),
        channel.clone(),
        Arc::new(InMemorySnapshotStore::new()),
    ));
    let state = ApiState::new(
        coordinator.clone(),
        Arc::new(MediaLibrary::new(Arc::new(InMemoryMediaCatalog::default()))),
        Arc::new(GenerateImagesHandler::new(
            Arc::new(generator),
            Duration::from_secs(5),
        )),
        Arc::new(SessionManager::new(
            coordinator,
            Arc::new(InMemorySessionStore::new()),
        )),
        channel,
        DisplayClientConfig::default(),
    );
    api_router(state, RouterOptions::default())
}

fn app() -> Router {
    app_with(InMemoryBroadcastChannel::new(), MockImageGenerator::new(Vec::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_screen(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/api/screens", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Screens
// =============================================================================

#[tokio::test]
async fn health_reports_ok() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn created_screens_get_default_names() {
    let app = app();
    create_screen(&app).await;
    let (status, body) = send(&app, Method::POST, "/api/screens", Some(json!({"name": "Lobby"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Lobby");

    let (status, body) = send(&app, Method::GET, "/api/screens", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["screens"][0]["name"], "Tela 1");
    assert_eq!(body["screens"][1]["name"], "Lobby");
}

#[tokio::test]
async fn select_and_rename_screen() {
    let app = app();
    let id = create_screen(&app).await;

    let (status, _) = send(&app, Method::POST, &format!("/api/screens/{}/select", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/screens/{}", id),
        Some(json!({"name": "Entrance"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Entrance");

    let (_, body) = send(&app, Method::GET, "/api/screens", None).await;
    assert_eq!(body["selectedId"], id.as_str());
}

#[tokio::test]
async fn removing_screen_is_idempotent() {
    let app = app();
    let id = create_screen(&app).await;
    let uri = format!("/api/screens/{}", id);

    let (first, _) = send(&app, Method::DELETE, &uri, None).await;
    let (second, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(first, StatusCode::NO_CONTENT);
    assert_eq!(second, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn assign_then_transform_returns_merged_content() {
    let app = app();
    let id = create_screen(&app).await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/screens/{}/content", id),
        Some(json!({"source": "inline", "type": "image", "title": "Menu", "url": "https://cdn.test/menu.png"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["broadcast"]["status"], "delivered");

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/screens/{}/transform", id),
        Some(json!({"rotation": 90})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["rotation"], 90.0);
    assert_eq!(body["content"]["scale"], 1.0);
    assert_eq!(body["content"]["backgroundColor"], "#000000");
    assert_eq!(body["content"]["url"], "https://cdn.test/menu.png");
}

#[tokio::test]
async fn invalid_transform_is_rejected() {
    let app = app();
    let id = create_screen(&app).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/api/screens/{}/transform", id),
        Some(json!({"scale": 5.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn content_for_unknown_screen_is_not_found() {
    let (status, body) = send(
        &app(),
        Method::PUT,
        "/api/screens/ghost/content",
        Some(json!({"source": "inline", "type": "image", "url": "https://cdn.test/a.png"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SCREEN_NOT_FOUND");
}

#[tokio::test]
async fn broadcast_outage_answers_ok_with_warning() {
    let channel = InMemoryBroadcastChannel::new();
    let app = app_with(channel.clone(), MockImageGenerator::new(Vec::new()));
    let id = create_screen(&app).await;
    channel.disconnect();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/screens/{}/content", id),
        Some(json!({"source": "inline", "type": "video", "url": "https://cdn.test/a.mp4"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["broadcast"]["status"], "failed");
    assert_eq!(body["warning"]["code"], "CHANNEL_UNAVAILABLE");

    let (_, snapshot) = send(&app, Method::GET, &format!("/display/{}", id), None).await;
    assert_eq!(snapshot["content"]["url"], "https://cdn.test/a.mp4");
}

// =============================================================================
// Media, generation, sessions, display
// =============================================================================

#[tokio::test]
async fn uploaded_media_can_be_assigned() {
    let app = app();
    let id = create_screen(&app).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/media?fileName=logo.png&title=Logo")
        .header(header::CONTENT_TYPE, "image/png")
        .body(Body::from(vec![0x89, 0x50, 0x4e, 0x47]))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let item: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(item["type"], "image");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/screens/{}/content", id),
        Some(json!({"source": "catalog", "mediaItemId": item["id"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["title"], "Logo");
    assert_eq!(body["content"]["url"], item["url"]);

    let (status, _) = send(&app, Method::DELETE, &format!("/api/media/{}", item["id"].as_str().unwrap()), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = send(&app, Method::GET, "/api/media", None).await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn upload_rejects_non_media_types() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/media?fileName=notes.txt")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("hello"))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generation_returns_images() {
    let generator = MockImageGenerator::new(vec![
        MockResult::image("https://im.test/1.webp"),
        MockResult::image("https://im.test/2.webp"),
    ]);
    let app = app_with(InMemoryBroadcastChannel::new(), generator);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/generations",
        Some(json!({"prompt": "harbor at dusk", "numberResults": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["images"].as_array().unwrap().len(), 2);
    assert_eq!(body["partial"], false);
}

#[tokio::test]
async fn blank_prompt_is_rejected() {
    let (status, _) = send(
        &app(),
        Method::POST,
        "/api/generations",
        Some(json!({"prompt": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sessions_save_load_and_delete() {
    let app = app();
    create_screen(&app).await;

    let (status, saved) = send(&app, Method::POST, "/api/sessions", Some(json!({"name": "Lunch"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["screenCount"], 1);
    let session_id = saved["id"].as_str().unwrap().to_string();

    let (status, cleared) = send(&app, Method::POST, "/api/sessions/new", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["screens"], 0);

    let (status, loaded) = send(&app, Method::POST, &format!("/api/sessions/{}/load", session_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded["screens"], 1);

    let (_, list) = send(&app, Method::GET, "/api/sessions", None).await;
    assert_eq!(list["total"], 1);

    let uri = format!("/api/sessions/{}", session_id);
    assert_eq!(send(&app, Method::DELETE, &uri, None).await.0, StatusCode::NO_CONTENT);
    assert_eq!(send(&app, Method::DELETE, &uri, None).await.0, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn loading_unknown_session_is_not_found() {
    let uri = format!("/api/sessions/{}/load", uuid::Uuid::new_v4());
    let (status, body) = send(&app(), Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn display_snapshot_of_unknown_screen_is_not_found() {
    let (status, _) = send(&app(), Method::GET, "/display/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
