//! Configuration models and layered config loading.
//!
//! This crate owns the BatGPT config layout and its validation, plus the layer-merging
//! logic used by the terminal shell.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
/// Configuration models.
pub use model::*;
