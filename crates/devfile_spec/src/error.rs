//! Error types for devfile decoding and validation.

use thiserror::Error;

/// Result type alias for spec operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors that can occur while decoding or validating a devfile.
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("Malformed devfile: {0}")]
    Malformed(String),

    #[error("Invalid JSON schema: {0}")]
    Schema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}
