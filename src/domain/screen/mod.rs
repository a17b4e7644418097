//! Screen domain module.
//!
//! Screens are named display targets. Each holds at most one current
//! [`ContentAssignment`], replaced wholesale on every update. The
//! [`ScreenRegistry`] owns the ordered screen set.
//!
//! # Content lifecycle
//!
//! ```text
//! Empty ──assign──▶ Assigned ──assign / transform──▶ Assigned
//! ```
//!
//! There is no transition back to `Empty` short of removing the screen.

mod content;
mod errors;
mod registry;
mod screen;

pub use content::{
    BackgroundColor, ContentAssignment, ContentType, ContentUpdate, Rotation, Scale,
    TransformRequest, DEFAULT_BACKGROUND, MAX_SCALE, MIN_SCALE,
};
pub use errors::ScreenError;
pub use registry::{IdGenerator, ScreenRegistry};
pub use screen::{Screen, MAX_NAME_LENGTH};
