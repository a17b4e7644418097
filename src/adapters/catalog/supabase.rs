//! Supabase-backed media catalog.
//!
//! Rows live in a PostgREST table (`media_items` by default); files live in
//! a public Storage bucket (`media`). Requests authenticate with the project
//! API key sent both as `apikey` and as a bearer token.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::{MediaItemId, Timestamp};
use crate::domain::media::{MediaItem, NewMediaItem};
use crate::domain::screen::ContentType;
use crate::ports::{CatalogError, MediaCatalog};

/// Configuration for the Supabase catalog.
#[derive(Debug, Clone)]
pub struct SupabaseCatalogConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub project_url: String,
    api_key: Secret<String>,
    pub bucket: String,
    pub table: String,
    pub timeout: Duration,
}

impl SupabaseCatalogConfig {
    pub fn new(project_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            project_url: project_url.into().trim_end_matches('/').to_string(),
            api_key: Secret::new(api_key.into()),
            bucket: "media".to_string(),
            table: "media_items".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Row shape of the catalog table.
#[derive(Debug, Deserialize)]
struct MediaRow {
    id: String,
    title: String,
    #[serde(rename = "type")]
    media_type: ContentType,
    file_path: String,
    #[serde(default)]
    size: Option<u64>,
    created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    title: &'a str,
    #[serde(rename = "type")]
    media_type: ContentType,
    file_path: &'a str,
    size: u64,
}

/// Media catalog backed by Supabase REST endpoints.
pub struct SupabaseMediaCatalog {
    config: SupabaseCatalogConfig,
    client: Client,
}

impl SupabaseMediaCatalog {
    /// # Errors
    ///
    /// `CatalogError::Upstream` if the HTTP client cannot be built.
    pub fn new(config: SupabaseCatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CatalogError::Upstream(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.project_url, self.config.table)
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.project_url,
            self.config.bucket,
            path.trim_start_matches('/')
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.config.api_key())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, CatalogError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| CatalogError::Upstream(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(CatalogError::Upstream(format!("status {}: {}", status, body)))
    }

    fn to_media_item(&self, row: MediaRow) -> Result<MediaItem, CatalogError> {
        let id = MediaItemId::new(row.id)
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
        Ok(MediaItem {
            id,
            url: self.resolve_public_url(&row.file_path),
            title: row.title,
            media_type: row.media_type,
            file_path: row.file_path,
            size: row.size.unwrap_or(0),
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }

    async fn fetch_row(&self, id: &MediaItemId) -> Result<MediaRow, CatalogError> {
        let response = self
            .send(
                self.client
                    .get(self.table_url())
                    .query(&[("select", "*".to_string()), ("id", format!("eq.{}", id))]),
            )
            .await?;
        let rows: Vec<MediaRow> = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
        rows.into_iter()
            .next()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }
}

#[async_trait]
impl MediaCatalog for SupabaseMediaCatalog {
    async fn list_media_items(&self) -> Result<Vec<MediaItem>, CatalogError> {
        let response = self
            .send(
                self.client
                    .get(self.table_url())
                    .query(&[("select", "*"), ("order", "created_at.desc")]),
            )
            .await?;

        let rows: Vec<MediaRow> = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

        rows.into_iter().map(|row| self.to_media_item(row)).collect()
    }

    fn resolve_public_url(&self, storage_path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.config.project_url,
            self.config.bucket,
            storage_path.trim_start_matches('/')
        )
    }

    /// Removes the stored file first, then the row.
    async fn delete_media_item(&self, id: &MediaItemId) -> Result<(), CatalogError> {
        let row = self.fetch_row(id).await?;

        let response = self
            .authorized(self.client.delete(self.object_url(&row.file_path)))
            .send()
            .await
            .map_err(|e| CatalogError::Upstream(e.to_string()))?;
        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Upstream(format!("status {}: {}", status, body)));
        }

        self.send(
            self.client
                .delete(self.table_url())
                .query(&[("id", format!("eq.{}", id))]),
        )
        .await?;

        tracing::info!(media_id = %id, path = %row.file_path, "Media item deleted from catalog");
        Ok(())
    }

    async fn upload_file(
        &self,
        bytes: Bytes,
        destination_path: &str,
        mime_type: &str,
    ) -> Result<String, CatalogError> {
        let size = bytes.len();
        self.send(
            self.client
                .post(self.object_url(destination_path))
                .header("Content-Type", mime_type)
                .body(bytes),
        )
        .await?;

        tracing::debug!(path = %destination_path, size, "File uploaded to storage");
        Ok(destination_path.to_string())
    }

    async fn create_media_item(&self, item: NewMediaItem) -> Result<MediaItem, CatalogError> {
        let response = self
            .send(
                self.client
                    .post(self.table_url())
                    .header("Prefer", "return=representation")
                    .json(&InsertRow {
                        title: &item.title,
                        media_type: item.media_type,
                        file_path: &item.file_path,
                        size: item.size,
                    }),
            )
            .await?;

        let rows: Vec<MediaRow> = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::InvalidResponse("insert returned no rows".to_string()))?;

        self.to_media_item(row)
    }
}
