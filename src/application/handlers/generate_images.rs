//! GenerateImagesHandler - bounded-wait image generation.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;

use crate::domain::media::{GeneratedImage, GenerationParams, GenerationRequest};
use crate::ports::ImageGenerator;

use crate::application::errors::ControlError;

/// Command to generate images from a prompt.
#[derive(Debug, Clone)]
pub struct GenerateImagesCommand {
    pub prompt: String,
    pub params: GenerationParams,
}

/// Images that arrived before the deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateImagesResult {
    pub images: Vec<GeneratedImage>,
    /// Fewer images than requested arrived.
    pub partial: bool,
}

pub struct GenerateImagesHandler {
    generator: Arc<dyn ImageGenerator>,
    timeout: Duration,
}

impl GenerateImagesHandler {
    pub fn new(generator: Arc<dyn ImageGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Collects results until every task resolved or the timeout elapsed.
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank prompt or out-of-range parameters
    /// - `UpstreamFailure` if no image arrived at all
    pub async fn handle(
        &self,
        cmd: GenerateImagesCommand,
    ) -> Result<GenerateImagesResult, ControlError> {
        let request = GenerationRequest::new(cmd.prompt, cmd.params)?;
        let requested = usize::from(request.params().number_results);

        let mut stream = self.generator.generate_images(&request).await?;
        let deadline = tokio::time::Instant::now() + self.timeout;

        let mut images = Vec::with_capacity(requested);
        let mut last_error = None;
        let mut timed_out = false;
        loop {
            match tokio::time::timeout_at(deadline, stream.next()).await {
                Ok(Some(Ok(image))) => images.push(image),
                Ok(Some(Err(e))) => {
                    tracing::warn!(error = %e, "Image generation task failed");
                    last_error = Some(e);
                }
                Ok(None) => break,
                Err(_) => {
                    timed_out = true;
                    break;
                }
            }
        }

        if images.is_empty() {
            let reason = match (last_error, timed_out) {
                (Some(e), _) => e.to_string(),
                (None, true) => format!("no image arrived within {:?}", self.timeout),
                (None, false) => "provider returned no images".to_string(),
            };
            return Err(ControlError::UpstreamFailure(reason));
        }

        let partial = images.len() < requested;
        if partial {
            tracing::info!(
                received = images.len(),
                requested,
                timed_out,
                "Accepting partial generation result"
            );
        }
        Ok(GenerateImagesResult { images, partial })
    }
}
