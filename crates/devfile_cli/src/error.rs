//! CLI-level errors that are not resolution failures.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read variable file {path:?}: {message}")]
    VarFile { path: PathBuf, message: String },

    #[error("{failed} of {total} devfile(s) failed validation")]
    ValidationFailed { failed: usize, total: usize },
}
