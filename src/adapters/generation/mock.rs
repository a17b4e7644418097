//! Scripted image generator for tests.

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::media::{GeneratedImage, GenerationRequest};
use crate::ports::{GenerationError, GenerationStream, ImageGenerator};

/// One scripted outcome, emitted after `delay`.
#[derive(Debug, Clone)]
pub struct MockResult {
    pub delay: Duration,
    pub outcome: Result<String, GenerationError>,
}

impl MockResult {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Ok(url.into()),
        }
    }

    pub fn failure(error: GenerationError) -> Self {
        Self {
            delay: Duration::ZERO,
            outcome: Err(error),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Emits scripted results in order; each call replays the same script.
#[derive(Debug, Default)]
pub struct MockImageGenerator {
    script: Vec<MockResult>,
    start_error: Option<GenerationError>,
    prompts: Mutex<Vec<String>>,
}

impl MockImageGenerator {
    pub fn new(script: Vec<MockResult>) -> Self {
        Self {
            script,
            start_error: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Generator whose request fails before any result.
    pub fn failing(error: GenerationError) -> Self {
        Self {
            script: Vec::new(),
            start_error: Some(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate_images(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationStream, GenerationError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt().to_string());
        }
        if let Some(error) = &self.start_error {
            return Err(error.clone());
        }

        let prompt = request.prompt().to_string();
        let seed = request.params().seed;
        let script = self.script.clone();
        let stream = futures::stream::iter(script).then(move |result| {
            let prompt = prompt.clone();
            async move {
                if !result.delay.is_zero() {
                    tokio::time::sleep(result.delay).await;
                }
                result.outcome.map(|image_url| GeneratedImage {
                    image_url,
                    seed,
                    prompt,
                })
            }
        });
        Ok(stream.boxed())
    }
}
