//! HTTP DTOs for image generation.

use serde::{Deserialize, Serialize};

use crate::application::{GenerateImagesCommand, GenerateImagesResult};
use crate::domain::media::{GeneratedImage, GenerationParams};

/// `{"prompt": "...", "numberResults": 2, "width": 512, ...}`
///
/// Omitted parameters take their defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateImagesRequest {
    pub prompt: String,
    #[serde(flatten)]
    pub params: GenerationParams,
}

impl From<GenerateImagesRequest> for GenerateImagesCommand {
    fn from(req: GenerateImagesRequest) -> Self {
        Self {
            prompt: req.prompt,
            params: req.params,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateImagesResponse {
    pub images: Vec<GeneratedImage>,
    pub partial: bool,
}

impl From<GenerateImagesResult> for GenerateImagesResponse {
    fn from(result: GenerateImagesResult) -> Self {
        Self {
            images: result.images,
            partial: result.partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::media::{OutputFormat, DEFAULT_MODEL};
    use serde_json::json;

    #[test]
    fn params_default_when_omitted() {
        let req: GenerateImagesRequest =
            serde_json::from_value(json!({"prompt": "neon city"})).unwrap();
        assert_eq!(req.prompt, "neon city");
        assert_eq!(req.params.model, DEFAULT_MODEL);
        assert_eq!(req.params.number_results, 1);
    }

    #[test]
    fn flattened_params_are_read() {
        let req: GenerateImagesRequest = serde_json::from_value(json!({
            "prompt": "neon city",
            "numberResults": 3,
            "outputFormat": "PNG",
            "width": 512
        }))
        .unwrap();
        assert_eq!(req.params.number_results, 3);
        assert_eq!(req.params.output_format, OutputFormat::Png);
        assert_eq!(req.params.width, 512);
        assert_eq!(req.params.height, 1024);
    }

    #[test]
    fn response_uses_image_url_key() {
        let response = GenerateImagesResponse {
            images: vec![GeneratedImage {
                image_url: "https://im/a.webp".into(),
                seed: Some(7),
                prompt: "p".into(),
            }],
            partial: false,
        };
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["images"][0]["imageURL"], "https://im/a.webp");
    }
}
