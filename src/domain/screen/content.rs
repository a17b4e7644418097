//! Content assignment value objects.
//!
//! A [`ContentAssignment`] describes what a screen shows and how. It is
//! immutable: every update builds a new value from the previous one plus a
//! [`ContentUpdate`] and the registry swaps the whole value in one step.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Smallest accepted scale multiplier.
pub const MIN_SCALE: f64 = 0.5;

/// Largest accepted scale multiplier.
pub const MAX_SCALE: f64 = 2.0;

/// Background used when none was chosen.
pub const DEFAULT_BACKGROUND: &str = "#000000";

/// Kind of media a screen renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Image,
    Video,
}

impl ContentType {
    /// Infers the content type from a MIME type (`image/*` or `video/*`).
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            Some(ContentType::Image)
        } else if mime.starts_with("video/") {
            Some(ContentType::Video)
        } else {
            None
        }
    }

    /// Lowercase name, also used as the storage folder stem.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Image => "image",
            ContentType::Video => "video",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation in degrees, always normalized into `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rotation(f64);

impl Rotation {
    /// Builds a rotation, wrapping any finite angle into `[0, 360)`.
    pub fn new(degrees: f64) -> Result<Self, ValidationError> {
        if !degrees.is_finite() {
            return Err(ValidationError::invalid_format(
                "rotation",
                "must be a finite number of degrees",
            ));
        }
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs
        let wrapped = if wrapped >= 360.0 { 0.0 } else { wrapped };
        Ok(Self(wrapped))
    }

    /// No rotation.
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Returns this rotation turned by `delta` degrees, wrapped.
    pub fn rotated_by(&self, delta: f64) -> Result<Self, ValidationError> {
        Self::new(self.0 + delta)
    }

    pub fn degrees(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Rotation {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rotation> for f64 {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

/// Scale multiplier within `[MIN_SCALE, MAX_SCALE]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Scale(f64);

impl Scale {
    /// Builds a scale, rejecting values outside the accepted domain.
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || !(MIN_SCALE..=MAX_SCALE).contains(&value) {
            return Err(ValidationError::out_of_range(
                "scale", MIN_SCALE, MAX_SCALE, value,
            ));
        }
        Ok(Self(value))
    }

    /// Natural size.
    pub fn identity() -> Self {
        Self(1.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Slider position shown by the controller, 0% at `MIN_SCALE`.
    pub fn as_percentage(&self) -> u32 {
        ((self.0 - MIN_SCALE) * 200.0).round() as u32
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::identity()
    }
}

impl TryFrom<f64> for Scale {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Scale> for f64 {
    fn from(scale: Scale) -> Self {
        scale.0
    }
}

/// CSS hex color behind the content (`#rgb`, `#rrggbb` or `#rrggbbaa`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackgroundColor(String);

impl BackgroundColor {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        let digits = trimmed.strip_prefix('#').ok_or_else(|| {
            ValidationError::invalid_format("background_color", "must start with '#'")
        })?;

        if !matches!(digits.len(), 3 | 6 | 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::invalid_format(
                "background_color",
                "expected 3, 6 or 8 hex digits",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self(DEFAULT_BACKGROUND.to_string())
    }
}

impl TryFrom<String> for BackgroundColor {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BackgroundColor> for String {
    fn from(color: BackgroundColor) -> Self {
        color.0
    }
}

/// What a screen currently shows and how it is transformed.
///
/// # Invariants
///
/// - never mutated in place; see [`ContentAssignment::merged`]
/// - `rotation`, `scale` and `background_color` are always valid
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAssignment {
    #[serde(rename = "type", default)]
    content_type: ContentType,
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    rotation: Rotation,
    #[serde(default)]
    scale: Scale,
    #[serde(default)]
    background_color: BackgroundColor,
}

impl ContentAssignment {
    /// Builds a fresh assignment with default transform.
    pub fn new(content_type: ContentType, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            content_type,
            title: title.into(),
            url: url.into(),
            rotation: Rotation::zero(),
            scale: Scale::identity(),
            background_color: BackgroundColor::default(),
        }
    }

    /// Skeleton used when a screen without content receives its first update:
    /// image, empty title and url, no rotation, natural scale, black.
    pub fn skeleton() -> Self {
        Self::default()
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_background_color(mut self, color: BackgroundColor) -> Self {
        self.background_color = color;
        self
    }

    /// Returns a new assignment with `update` applied on top of `self`.
    /// Fields the update leaves unset carry over unchanged.
    pub fn merged(&self, update: &ContentUpdate) -> Self {
        Self {
            content_type: update.content_type.unwrap_or(self.content_type),
            title: update.title.clone().unwrap_or_else(|| self.title.clone()),
            url: update.url.clone().unwrap_or_else(|| self.url.clone()),
            rotation: update.rotation.unwrap_or(self.rotation),
            scale: update.scale.unwrap_or(self.scale),
            background_color: update
                .background_color
                .clone()
                .unwrap_or_else(|| self.background_color.clone()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn background_color(&self) -> &BackgroundColor {
        &self.background_color
    }
}

/// Partial update of a [`ContentAssignment`]. `None` means "keep".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentUpdate {
    pub content_type: Option<ContentType>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub rotation: Option<Rotation>,
    pub scale: Option<Scale>,
    pub background_color: Option<BackgroundColor>,
}

impl ContentUpdate {
    /// Full replacement: every field set, transform reset to defaults.
    pub fn replace_with(assignment: &ContentAssignment) -> Self {
        Self {
            content_type: Some(assignment.content_type),
            title: Some(assignment.title.clone()),
            url: Some(assignment.url.clone()),
            rotation: Some(assignment.rotation),
            scale: Some(assignment.scale),
            background_color: Some(assignment.background_color.clone()),
        }
    }

    /// True when only transform fields (rotation, scale, background) are set.
    pub fn is_transform_only(&self) -> bool {
        self.content_type.is_none() && self.title.is_none() && self.url.is_none()
    }

    /// True when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.is_transform_only()
            && self.rotation.is_none()
            && self.scale.is_none()
            && self.background_color.is_none()
    }
}

/// Raw transform request as received from the controller UI.
///
/// Validated into a transform-only [`ContentUpdate`] at the coordinator
/// boundary.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformRequest {
    pub rotation: Option<f64>,
    pub scale: Option<f64>,
    pub background_color: Option<String>,
}

impl TransformRequest {
    pub fn validate(&self) -> Result<ContentUpdate, ValidationError> {
        Ok(ContentUpdate {
            rotation: self.rotation.map(Rotation::new).transpose()?,
            scale: self.scale.map(Scale::new).transpose()?,
            background_color: self
                .background_color
                .clone()
                .map(BackgroundColor::new)
                .transpose()?,
            ..ContentUpdate::default()
        })
    }
}
