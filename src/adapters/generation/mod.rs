//! Image generation adapters.
//!
//! - `RunwareImageGenerator` - Runware REST API
//! - `MockImageGenerator` - Scripted results for tests
//! - `DisabledImageGenerator` - Stand-in when no provider is configured

mod disabled;
mod mock;
mod runware;

pub use disabled::DisabledImageGenerator;
pub use mock::{MockImageGenerator, MockResult};
pub use runware::{RunwareConfig, RunwareImageGenerator};
