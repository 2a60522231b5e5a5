//! Error types for devfile resolution.

use devfile_fetch::FetchError;
use devfile_spec::SpecError;
use thiserror::Error;

/// Result type alias for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Terminal failures of a parse call. No partial document accompanies any
/// of them.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Malformed devfile: {0}")]
    MalformedDocument(String),

    #[error("Failed to load devfile: {0}")]
    Load(#[source] FetchError),

    #[error("Failed to resolve component '{component}': {source}")]
    Fetch {
        component: String,
        #[source]
        source: FetchError,
    },

    #[error("Devfile validation failed: {}", .violations.join("; "))]
    Validation { violations: Vec<String> },

    #[error("No devfile source provided: set data, path or url")]
    MissingInput,

    #[error("Parser setup failed: {0}")]
    Setup(String),
}

impl ResolveError {
    /// True for failures retrieving the devfile or referenced content.
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, ResolveError::Load(_) | ResolveError::Fetch { .. })
    }

    /// Locator that could not be fetched, if any.
    pub fn locator(&self) -> Option<&str> {
        match self {
            ResolveError::Load(source) | ResolveError::Fetch { source, .. } => source.locator(),
            _ => None,
        }
    }

    /// Schema violations, for validation failures.
    pub fn violations(&self) -> Option<&[String]> {
        match self {
            ResolveError::Validation { violations } => Some(violations),
            _ => None,
        }
    }
}

impl From<SpecError> for ResolveError {
    fn from(error: SpecError) -> Self {
        match error {
            SpecError::Schema(message) => ResolveError::Setup(message),
            other => ResolveError::MalformedDocument(other.to_string()),
        }
    }
}
