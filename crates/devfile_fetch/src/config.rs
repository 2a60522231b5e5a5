//! Fetcher configuration.

use std::time::Duration;

use tracing::warn;

/// Environment variable overriding the per-request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "DEVFILE_FETCH_TIMEOUT_SECS";
/// Environment variable overriding the HTTP user agent.
pub const USER_AGENT_ENV: &str = "DEVFILE_FETCH_USER_AGENT";

/// Limits and identity used when fetching external content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    /// Timeout for a single fetch.
    pub timeout: Duration,
    /// User agent sent with HTTP requests.
    pub user_agent: String,
    /// Largest accepted body, in bytes.
    pub max_size: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("devfile-resolver/{}", env!("CARGO_PKG_VERSION")),
            max_size: 10 * 1024 * 1024, // 10 MiB
        }
    }
}

impl FetcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `DEVFILE_FETCH_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.timeout = Duration::from_secs(secs),
                Err(_) => warn!("Ignoring invalid {}={:?}", TIMEOUT_ENV, raw),
            }
        }

        if let Ok(agent) = std::env::var(USER_AGENT_ENV) {
            if !agent.trim().is_empty() {
                config.user_agent = agent;
            }
        }

        config
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_secs(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn max_size(mut self, bytes: usize) -> Self {
        self.max_size = bytes;
        self
    }
}
