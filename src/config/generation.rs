//! Image generation configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Image generation provider configuration (Runware)
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Runware API key; generation is disabled when unset
    pub runware_api_key: Option<String>,

    /// Runware REST endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Overall wait for one generation request, in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl GenerationConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if Runware is configured
    pub fn has_runware(&self) -> bool {
        self.runware_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate generation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidGenerationTimeout);
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            runware_api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.runware.ai/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}
