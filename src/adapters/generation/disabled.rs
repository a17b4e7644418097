//! Generator used when no provider API key is configured.

use async_trait::async_trait;

use crate::domain::media::GenerationRequest;
use crate::ports::{GenerationError, GenerationStream, ImageGenerator};

#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledImageGenerator;

#[async_trait]
impl ImageGenerator for DisabledImageGenerator {
    async fn generate_images(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GenerationStream, GenerationError> {
        Err(GenerationError::NotConfigured)
    }
}
