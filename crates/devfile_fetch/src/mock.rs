//! Mock content fetcher for testing.
//!
//! Serves canned responses keyed by locator so resolution can be tested
//! without a network listener.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{FetchError, FetchResult};
use crate::fetcher::ContentFetcher;

/// Predefined response for a locator.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Serve these bytes. Empty bytes fail with [`FetchError::Empty`].
    Content(Vec<u8>),
    /// Fail with a non-success HTTP status.
    Status(u16),
    /// Fail as if the host could not be reached.
    Unreachable(String),
    /// Fail as if the request timed out.
    Timeout,
}

impl MockResponse {
    pub fn content(body: impl Into<Vec<u8>>) -> Self {
        MockResponse::Content(body.into())
    }
}

/// Mock fetcher for testing.
///
/// Unknown locators answer with HTTP 404. Every call is captured, in call
/// order, for verification.
#[derive(Clone, Default)]
pub struct MockFetcher {
    /// Responses keyed by locator.
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    /// Artificial latency per locator.
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Captured locators.
    captured_calls: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `locator`.
    pub fn with_content(self, locator: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.with_response(locator, MockResponse::content(body))
    }

    /// Set the response for `locator`.
    pub fn with_response(self, locator: impl Into<String>, response: MockResponse) -> Self {
        self.responses.write().insert(locator.into(), response);
        self
    }

    /// Delay the response for `locator`.
    pub fn with_delay(self, locator: impl Into<String>, delay: Duration) -> Self {
        self.delays.write().insert(locator.into(), delay);
        self
    }

    /// Get all captured locators.
    pub fn get_calls(&self) -> Vec<String> {
        self.captured_calls.read().clone()
    }

    /// Get the number of calls made.
    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    /// Check if a locator was fetched.
    pub fn was_called(&self, locator: &str) -> bool {
        self.captured_calls.read().iter().any(|c| c == locator)
    }

    /// Clear all captured calls.
    pub fn clear_calls(&self) {
        self.captured_calls.write().clear();
    }
}

#[async_trait]
impl ContentFetcher for MockFetcher {
    async fn fetch(&self, locator: &str) -> FetchResult<Vec<u8>> {
        self.captured_calls.write().push(locator.to_string());

        let delay = self.delays.read().get(locator).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.read().get(locator).cloned();
        let locator = locator.to_string();
        match response {
            Some(MockResponse::Content(body)) if body.is_empty() => {
                Err(FetchError::Empty { locator })
            }
            Some(MockResponse::Content(body)) => Ok(body),
            Some(MockResponse::Status(status)) => Err(FetchError::Status { locator, status }),
            Some(MockResponse::Unreachable(message)) => {
                Err(FetchError::Unreachable { locator, message })
            }
            Some(MockResponse::Timeout) => Err(FetchError::Timeout { locator }),
            None => Err(FetchError::Status {
                locator,
                status: 404,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_serves_content() {
        let fetcher = MockFetcher::new().with_content("http://host/deploy.yaml", "kind: Service");

        let content = fetcher.fetch_string("http://host/deploy.yaml").await.unwrap();
        assert_eq!(content, "kind: Service");
        assert!(fetcher.was_called("http://host/deploy.yaml"));
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_failures() {
        let fetcher = MockFetcher::new()
            .with_response("http://host/500", MockResponse::Status(500))
            .with_response("http://host/slow", MockResponse::Timeout)
            .with_response("http://host/down", MockResponse::Unreachable("refused".into()))
            .with_content("http://host/empty", Vec::new());

        assert!(matches!(
            fetcher.fetch("http://host/500").await,
            Err(FetchError::Status { status: 500, .. })
        ));
        assert!(matches!(
            fetcher.fetch("http://host/slow").await,
            Err(FetchError::Timeout { .. })
        ));
        assert!(matches!(
            fetcher.fetch("http://host/down").await,
            Err(FetchError::Unreachable { .. })
        ));
        assert!(matches!(
            fetcher.fetch("http://host/empty").await,
            Err(FetchError::Empty { .. })
        ));
        assert!(matches!(
            fetcher.fetch("http://host/unknown").await,
            Err(FetchError::Status { status: 404, .. })
        ));
        assert_eq!(fetcher.call_count(), 5);
    }

    #[tokio::test]
    async fn test_mock_non_utf8() {
        let fetcher = MockFetcher::new().with_content("bin", vec![0xff, 0xfe]);
        let err = fetcher.fetch_string("bin").await.unwrap_err();
        assert!(matches!(err, FetchError::NotUtf8 { .. }));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let fetcher = MockFetcher::new().with_content("a", "x");
        let clone = fetcher.clone();
        clone.fetch("a").await.unwrap();
        assert_eq!(fetcher.get_calls(), vec!["a".to_string()]);

        fetcher.clear_calls();
        assert_eq!(clone.call_count(), 0);
    }
}
