//! Error types for content fetching.

use thiserror::Error;

/// Result type alias for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors that can occur while retrieving external content.
///
/// Every variant carries the locator that failed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to reach {locator}: {message}")]
    Unreachable { locator: String, message: String },

    #[error("Request to {locator} returned HTTP {status}")]
    Status { locator: String, status: u16 },

    #[error("Content at {locator} is empty")]
    Empty { locator: String },

    #[error("Content at {locator} exceeds {limit} bytes")]
    TooLarge { locator: String, limit: usize },

    #[error("Content at {locator} is not valid UTF-8")]
    NotUtf8 { locator: String },

    #[error("Timed out fetching {locator}")]
    Timeout { locator: String },

    #[error("Relative locator {locator} cannot be resolved without a base location")]
    RelativeLocator { locator: String },

    #[error("Locator {locator} is not http(s) and cannot be read for remote document {base}")]
    NotRemote { locator: String, base: String },

    #[error("Unsupported scheme '{scheme}' in {locator}")]
    UnsupportedScheme { locator: String, scheme: String },

    #[error("Failed to read {locator}: {source}")]
    Io {
        locator: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl FetchError {
    /// Locator the failure relates to, if any.
    pub fn locator(&self) -> Option<&str> {
        match self {
            FetchError::Unreachable { locator, .. }
            | FetchError::Status { locator, .. }
            | FetchError::Empty { locator }
            | FetchError::TooLarge { locator, .. }
            | FetchError::NotUtf8 { locator }
            | FetchError::Timeout { locator }
            | FetchError::RelativeLocator { locator }
            | FetchError::NotRemote { locator, .. }
            | FetchError::UnsupportedScheme { locator, .. }
            | FetchError::Io { locator, .. } => Some(locator),
            FetchError::Client(_) => None,
        }
    }
}
