//! Domain layer containing the signage model.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, validation errors)
//! - `screen` - Screens, content assignments and the screen registry
//! - `broadcast` - Topics and the events published on them
//! - `media` - Catalog entries and image generation values
//! - `saved_session` - Named snapshots of the screen configuration

pub mod broadcast;
pub mod foundation;
pub mod media;
pub mod saved_session;
pub mod screen;
