//! signage-hub server entry point.
//!
//! Loads configuration, picks adapters for the configured transport and
//! collaborators, restores the last screen snapshot and serves the API.

use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use signage_hub::adapters::broadcast::{InMemoryBroadcastChannel, RedisBroadcastChannel};
use signage_hub::adapters::catalog::{
    InMemoryMediaCatalog, SupabaseCatalogConfig, SupabaseMediaCatalog,
};
use signage_hub::adapters::generation::{
    DisabledImageGenerator, RunwareConfig, RunwareImageGenerator,
};
use signage_hub::adapters::http::{api_router, ApiState, RouterOptions};
use signage_hub::adapters::storage::{FileSessionStore, FileSnapshotStore};
use signage_hub::application::{
    ControllerCoordinator, DisplayClientConfig, GenerateImagesHandler, MediaLibrary,
    SessionManager,
};
use signage_hub::config::{AppConfig, BroadcastTransport, CatalogConfig, GenerationConfig};
use signage_hub::domain::screen::ScreenRegistry;
use signage_hub::ports::{BroadcastChannel, ImageGenerator, MediaCatalog};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let channel = build_channel(&config)?;
    let catalog = build_catalog(&config.catalog)?;
    let generator = build_generator(&config.generation)?;

    let registry = Arc::new(ScreenRegistry::new());
    let snapshot_store = Arc::new(FileSnapshotStore::new(config.storage.snapshot_path()));
    let coordinator = Arc::new(ControllerCoordinator::new(
        registry,
        channel.clone(),
        snapshot_store,
    ));
    if let Err(e) = coordinator.restore().await {
        tracing::warn!(error = %e, "Starting with an empty screen set");
    }

    let session_store = Arc::new(FileSessionStore::new(config.storage.sessions_dir()));
    let state = ApiState::new(
        coordinator.clone(),
        Arc::new(MediaLibrary::new(catalog)),
        Arc::new(GenerateImagesHandler::new(
            generator,
            config.generation.timeout(),
        )),
        Arc::new(SessionManager::new(coordinator, session_store)),
        channel,
        DisplayClientConfig {
            reconnect_delay: config.broadcast.reconnect_delay(),
            max_reconnect_delay: config.broadcast.max_reconnect_delay(),
        },
    );
    let app = api_router(state, RouterOptions::from(&config.server));

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        transport = ?config.broadcast.transport,
        "signage-hub listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("signage-hub stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_channel(config: &AppConfig) -> Result<Arc<dyn BroadcastChannel>, BoxError> {
    match config.broadcast.transport {
        BroadcastTransport::Memory => {
            tracing::info!("Using in-process broadcast channel");
            Ok(Arc::new(InMemoryBroadcastChannel::new()))
        }
        BroadcastTransport::Redis => {
            tracing::info!(prefix = %config.redis.channel_prefix, "Using Redis broadcast channel");
            Ok(Arc::new(RedisBroadcastChannel::new(
                &config.redis,
                &config.broadcast,
            )?))
        }
    }
}

fn build_catalog(config: &CatalogConfig) -> Result<Arc<dyn MediaCatalog>, BoxError> {
    match (&config.supabase_url, &config.supabase_key) {
        (Some(url), Some(key)) => {
            let supabase = SupabaseCatalogConfig::new(url.clone(), key.clone())
                .with_bucket(config.bucket.clone())
                .with_table(config.table.clone())
                .with_timeout(std::time::Duration::from_secs(config.timeout_secs));
            Ok(Arc::new(SupabaseMediaCatalog::new(supabase)?))
        }
        _ => {
            tracing::warn!("No Supabase credentials, media catalog is in-memory only");
            Ok(Arc::new(InMemoryMediaCatalog::default()))
        }
    }
}

fn build_generator(config: &GenerationConfig) -> Result<Arc<dyn ImageGenerator>, BoxError> {
    match &config.runware_api_key {
        Some(key) if !key.trim().is_empty() => {
            let runware = RunwareConfig::new(key.clone())
                .with_base_url(config.base_url.clone())
                .with_timeout(config.timeout());
            Ok(Arc::new(RunwareImageGenerator::new(runware)?))
        }
        _ => {
            tracing::warn!("No Runware API key, image generation disabled");
            Ok(Arc::new(DisabledImageGenerator))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
