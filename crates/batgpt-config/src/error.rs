//! Errors raised while reading `batgpt.json5` layers.

use thiserror::Error;

/// Why a BatGPT config could not be produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config layer could not be read from disk.
    #[error("cannot read batgpt config file: {0}")]
    ReadFailed(#[from] std::io::Error),
    /// A layer is not valid JSON5.
    #[error("batgpt config is not valid JSON5: {0}")]
    ParseFailed(#[from] json5::Error),
    /// The merged layers do not match the `reply`/`history`/`ui` layout.
    #[error("batgpt config has an unexpected shape: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// A value is well-formed but not usable, e.g. a zero tick.
    #[error("batgpt config value `{path}` {message}")]
    InvalidField { path: String, message: String },
}
