//! Media catalog configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Media catalog configuration (Supabase)
///
/// When neither URL nor key is set the in-memory catalog is used.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Supabase project URL
    pub supabase_url: Option<String>,

    /// Supabase API key
    pub supabase_key: Option<String>,

    /// Storage bucket holding uploaded files
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Table holding catalog rows
    #[serde(default = "default_table")]
    pub table: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl CatalogConfig {
    /// Check if the remote catalog is configured
    pub fn has_supabase(&self) -> bool {
        self.supabase_url.as_ref().is_some_and(|u| !u.is_empty())
            && self.supabase_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate catalog configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let has_url = self.supabase_url.as_ref().is_some_and(|u| !u.is_empty());
        let has_key = self.supabase_key.as_ref().is_some_and(|k| !k.is_empty());
        if has_url != has_key {
            return Err(ValidationError::IncompleteCatalog);
        }
        if let Some(url) = self.supabase_url.as_ref().filter(|u| !u.is_empty()) {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(ValidationError::InvalidCatalogUrl);
            }
        }
        if self.bucket.is_empty() {
            return Err(ValidationError::MissingRequired("CATALOG__BUCKET"));
        }
        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_key: None,
            bucket: default_bucket(),
            table: default_table(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_bucket() -> String {
    "media".to_string()
}

fn default_table() -> String {
    "media_items".to_string()
}

fn default_timeout() -> u64 {
    30
}
