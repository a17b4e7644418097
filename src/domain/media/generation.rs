//! Image generation request and result values.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Model used when the caller does not pick one.
pub const DEFAULT_MODEL: &str = "runware:100@1";

/// Maximum images per request.
pub const MAX_RESULTS: u8 = 4;

/// Maximum prompt length in characters.
pub const MAX_PROMPT_LENGTH: usize = 3000;

/// Encoded image format returned by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    #[default]
    Webp,
    Png,
    Jpeg,
}

/// Model parameters for a generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationParams {
    pub model: String,
    pub number_results: u8,
    pub output_format: OutputFormat,
    pub cfg_scale: f64,
    pub scheduler: String,
    pub strength: f64,
    pub seed: Option<u64>,
    pub width: u32,
    pub height: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            number_results: 1,
            output_format: OutputFormat::Webp,
            cfg_scale: 13.0,
            scheduler: "FlowMatchEulerDiscreteScheduler".to_string(),
            strength: 1.0,
            seed: None,
            width: 1024,
            height: 1024,
        }
    }
}

impl GenerationParams {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::empty_field("model"));
        }
        if self.number_results == 0 || self.number_results > MAX_RESULTS {
            return Err(ValidationError::out_of_range(
                "number_results",
                1.0,
                MAX_RESULTS as f64,
                self.number_results as f64,
            ));
        }
        if !(0.0..=50.0).contains(&self.cfg_scale) {
            return Err(ValidationError::out_of_range("cfg_scale", 0.0, 50.0, self.cfg_scale));
        }
        if !(0.0..=1.0).contains(&self.strength) {
            return Err(ValidationError::out_of_range("strength", 0.0, 1.0, self.strength));
        }
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if !(128..=2048).contains(&value) || value % 64 != 0 {
                return Err(ValidationError::invalid_format(
                    field,
                    "must be a multiple of 64 between 128 and 2048",
                ));
            }
        }
        Ok(())
    }
}

/// A validated prompt plus parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    prompt: String,
    params: GenerationParams,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, params: GenerationParams) -> Result<Self, ValidationError> {
        let prompt = prompt.into();
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("prompt"));
        }
        let len = trimmed.chars().count();
        if len > MAX_PROMPT_LENGTH {
            return Err(ValidationError::out_of_range(
                "prompt",
                1.0,
                MAX_PROMPT_LENGTH as f64,
                len as f64,
            ));
        }
        params.validate()?;
        Ok(Self {
            prompt: trimmed.to_string(),
            params,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }
}

/// One generated image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub seed: Option<u64>,
    pub prompt: String,
}
