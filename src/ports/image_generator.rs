//! ImageGenerator port - AI image generation collaborator.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::media::{GeneratedImage, GenerationRequest};

/// Errors from an image generation provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationError {
    #[error("Image generation is not configured")]
    NotConfigured,

    #[error("Authentication with the image provider failed")]
    AuthenticationFailed,

    #[error("Image provider rate limited the request")]
    RateLimited,

    #[error("Image provider request failed: {0}")]
    Upstream(String),

    #[error("Unexpected image provider response: {0}")]
    InvalidResponse(String),
}

/// Results arrive one at a time; an `Err` item is a failed task, not the end
/// of the stream.
pub type GenerationStream = BoxStream<'static, Result<GeneratedImage, GenerationError>>;

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Start generation. The stream yields each image as it completes and
    /// ends when every requested image has resolved.
    async fn generate_images(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationStream, GenerationError>;
}
