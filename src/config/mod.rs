//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SIGNAGE_HUB` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use signage_hub::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod broadcast;
mod catalog;
mod error;
mod generation;
mod redis;
mod server;
mod storage;

pub use broadcast::{BroadcastConfig, BroadcastTransport};
pub use catalog::CatalogConfig;
pub use error::{ConfigError, ValidationError};
pub use generation::GenerationConfig;
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// single-process setup (in-memory broadcast, local files, no generation).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Broadcast transport selection and timing
    #[serde(default)]
    pub broadcast: BroadcastConfig,

    /// Redis configuration (used when the transport is redis)
    #[serde(default)]
    pub redis: RedisConfig,

    /// Local snapshot and session storage
    #[serde(default)]
    pub storage: StorageConfig,

    /// Media catalog (Supabase)
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Image generation (Runware)
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SIGNAGE_HUB` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `SIGNAGE_HUB__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SIGNAGE_HUB__BROADCAST__TRANSPORT=redis` -> `broadcast.transport = redis`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SIGNAGE_HUB")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Redis settings are only checked when Redis is the selected transport.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.broadcast.validate()?;
        if self.broadcast.transport == BroadcastTransport::Redis {
            self.redis.validate()?;
        }
        self.storage.validate()?;
        self.catalog.validate()?;
        self.generation.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
