//! Runware image generation provider.
//!
//! Sends one `imageInference` task per requested image, concurrently, and
//! yields each image as its task completes. Asking for N single-image tasks
//! rather than one N-image task lets partial results surface early.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::media::{GeneratedImage, GenerationParams, GenerationRequest, OutputFormat};
use crate::ports::{GenerationError, GenerationStream, ImageGenerator};

/// Configuration for the Runware provider.
#[derive(Debug, Clone)]
pub struct RunwareConfig {
    api_key: Secret<String>,
    /// REST endpoint.
    pub base_url: String,
    /// Per-task HTTP timeout.
    pub timeout: Duration,
}

impl RunwareConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.runware.ai/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
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

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InferenceTask<'a> {
    task_type: &'static str,
    #[serde(rename = "taskUUID")]
    task_uuid: Uuid,
    positive_prompt: &'a str,
    model: &'a str,
    number_results: u8,
    output_format: OutputFormat,
    output_type: &'static str,
    #[serde(rename = "CFGScale")]
    cfg_scale: f64,
    scheduler: &'a str,
    strength: f64,
    width: u32,
    height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

impl<'a> InferenceTask<'a> {
    fn single(prompt: &'a str, params: &'a GenerationParams, seed: Option<u64>) -> Self {
        Self {
            task_type: "imageInference",
            task_uuid: Uuid::new_v4(),
            positive_prompt: prompt,
            model: &params.model,
            number_results: 1,
            output_format: params.output_format,
            output_type: "URL",
            cfg_scale: params.cfg_scale,
            scheduler: &params.scheduler,
            strength: params.strength,
            width: params.width,
            height: params.height,
            seed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    data: Vec<InferenceResult>,
    #[serde(default)]
    errors: Vec<InferenceFailure>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InferenceResult {
    #[serde(rename = "imageURL")]
    image_url: Option<String>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct InferenceFailure {
    #[serde(default)]
    message: String,
}

/// Image generator backed by the Runware REST API.
pub struct RunwareImageGenerator {
    config: Arc<RunwareConfig>,
    client: Client,
}

impl RunwareImageGenerator {
    /// # Errors
    ///
    /// `GenerationError::Upstream` if the HTTP client cannot be built.
    pub fn new(config: RunwareConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Upstream(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Seed for the `index`th task. A fixed seed is offset per task so the
    /// images differ but stay reproducible.
    fn task_seed(seed: Option<u64>, index: u8) -> Option<u64> {
        seed.map(|s| s.wrapping_add(u64::from(index)))
    }

    async fn run_task(
        client: Client,
        config: Arc<RunwareConfig>,
        prompt: String,
        params: GenerationParams,
        seed: Option<u64>,
    ) -> Result<GeneratedImage, GenerationError> {
        let task = InferenceTask::single(&prompt, &params, seed);

        let response = client
            .post(&config.base_url)
            .header("Authorization", format!("Bearer {}", config.api_key()))
            .json(&[task])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Upstream("request timed out".to_string())
                } else {
                    GenerationError::Upstream(e.to_string())
                }
            })?;

        let status = response.status();
        match status.as_u16() {
            200..=299 => {}
            401 | 403 => return Err(GenerationError::AuthenticationFailed),
            429 => return Err(GenerationError::RateLimited),
            _ => {
                let body = response.text().await.unwrap_or_default();
                return Err(GenerationError::Upstream(format!("status {}: {}", status, body)));
            }
        }

        let body: InferenceResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        if let Some(failure) = body.errors.into_iter().next() {
            return Err(GenerationError::Upstream(failure.message));
        }

        let result = body
            .data
            .into_iter()
            .find(|r| r.image_url.is_some())
            .ok_or_else(|| GenerationError::InvalidResponse("no image in response".to_string()))?;

        Ok(GeneratedImage {
            image_url: result.image_url.unwrap_or_default(),
            seed: result.seed.or(seed),
            prompt,
        })
    }
}

#[async_trait]
impl ImageGenerator for RunwareImageGenerator {
    async fn generate_images(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationStream, GenerationError> {
        let count = request.params().number_results;
        tracing::info!(count, model = %request.params().model, "Requesting image generation");

        let tasks: Vec<_> = (0..count)
            .map(|index| {
                Self::run_task(
                    self.client.clone(),
                    Arc::clone(&self.config),
                    request.prompt().to_string(),
                    request.params().clone(),
                    Self::task_seed(request.params().seed, index),
                )
            })
            .collect();

        let stream = futures::stream::iter(tasks).buffer_unordered(usize::from(count.max(1)));
        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_serializes_runware_field_names() {
        let params = GenerationParams {
            seed: Some(7),
            ..GenerationParams::default()
        };
        let task = InferenceTask::single("a cat", &params, Some(7));
        let json = serde_json::to_value([task]).unwrap();
        let task = &json[0];

        assert_eq!(task["taskType"], "imageInference");
        assert_eq!(task["positivePrompt"], "a cat");
        assert_eq!(task["model"], "runware:100@1");
        assert_eq!(task["numberResults"], 1);
        assert_eq!(task["outputFormat"], "WEBP");
        assert_eq!(task["CFGScale"], 13.0);
        assert_eq!(task["seed"], 7);
        assert!(task.get("taskUUID").is_some());
    }

    #[test]
    fn seed_is_omitted_when_unset() {
        let params = GenerationParams::default();
        let json = serde_json::to_value(InferenceTask::single("p", &params, None)).unwrap();
        assert!(json.get("seed").is_none());
    }

    #[test]
    fn fixed_seed_is_offset_per_task() {
        assert_eq!(RunwareImageGenerator::task_seed(Some(10), 0), Some(10));
        assert_eq!(RunwareImageGenerator::task_seed(Some(10), 3), Some(13));
        assert_eq!(RunwareImageGenerator::task_seed(None, 3), None);
    }

    #[test]
    fn response_parses_image_url_and_errors() {
        let ok: InferenceResponse = serde_json::from_str(
            r#"{"data":[{"taskType":"imageInference","imageURL":"https://im/1.webp","seed":99}]}"#,
        )
        .unwrap();
        assert_eq!(ok.data[0].image_url.as_deref(), Some("https://im/1.webp"));
        assert_eq!(ok.data[0].seed, Some(99));

        let failed: InferenceResponse =
            serde_json::from_str(r#"{"errors":[{"code":"invalidApiKey","message":"bad key"}]}"#)
                .unwrap();
        assert_eq!(failed.errors[0].message, "bad key");
    }
}
