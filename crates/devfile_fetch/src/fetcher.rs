//! Content fetcher trait and the scheme-dispatching default fetcher.

use async_trait::async_trait;
use tracing::debug;

use crate::config::FetcherConfig;
use crate::error::{FetchError, FetchResult};
use crate::file::FileFetcher;
use crate::http::HttpFetcher;
use crate::locator::{parse_locator, Location};

/// Retrieves raw content for a URI or path.
///
/// Implementations decide transport, timeouts and retries; callers only see
/// bytes or a [`FetchError`] naming the locator.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch the raw bytes behind `locator`.
    async fn fetch(&self, locator: &str) -> FetchResult<Vec<u8>>;

    /// Fetch and decode as UTF-8 text.
    async fn fetch_string(&self, locator: &str) -> FetchResult<String> {
        let bytes = self.fetch(locator).await?;
        String::from_utf8(bytes).map_err(|_| FetchError::NotUtf8 {
            locator: locator.to_string(),
        })
    }
}

/// Dispatches `http(s)` locators to [`HttpFetcher`] and paths or `file`
/// URLs to [`FileFetcher`].
pub struct DefaultFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl DefaultFetcher {
    pub fn new(config: FetcherConfig) -> FetchResult<Self> {
        Ok(Self {
            http: HttpFetcher::new(config.clone())?,
            file: FileFetcher::new(config),
        })
    }
}

#[async_trait]
impl ContentFetcher for DefaultFetcher {
    async fn fetch(&self, locator: &str) -> FetchResult<Vec<u8>> {
        match parse_locator(locator)? {
            Location::Remote(_) => {
                debug!("Dispatching {} to HTTP fetcher", locator);
                self.http.fetch(locator).await
            }
            Location::File(_) => {
                debug!("Dispatching {} to file fetcher", locator);
                self.file.fetch(locator).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_default_fetcher_reads_files() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("deploy.yaml");
        std::fs::write(&path, "kind: Deployment\n").unwrap();

        let fetcher = DefaultFetcher::new(FetcherConfig::default()).unwrap();
        let content = fetcher.fetch_string(path.to_str().unwrap()).await.unwrap();
        assert_eq!(content, "kind: Deployment\n");
    }

    #[tokio::test]
    async fn test_default_fetcher_rejects_unknown_scheme() {
        let fetcher = DefaultFetcher::new(FetcherConfig::default()).unwrap();
        let err = fetcher.fetch("s3://bucket/deploy.yaml").await.unwrap_err();
        assert!(matches!(err, FetchError::UnsupportedScheme { .. }));
    }
}
