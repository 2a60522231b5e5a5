//! Local filesystem content fetcher.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::config::FetcherConfig;
use crate::error::{FetchError, FetchResult};
use crate::fetcher::ContentFetcher;
use crate::locator::{parse_locator, Location};

/// Reads plain paths and `file://` URLs.
pub struct FileFetcher {
    max_size: usize,
}

impl Default for FileFetcher {
    fn default() -> Self {
        Self::new(FetcherConfig::default())
    }
}

impl FileFetcher {
    pub fn new(config: FetcherConfig) -> Self {
        Self {
            max_size: config.max_size,
        }
    }

    fn path_for(locator: &str) -> FetchResult<PathBuf> {
        match parse_locator(locator)? {
            Location::File(path) => Ok(path),
            Location::Remote(url) => Err(FetchError::UnsupportedScheme {
                locator: locator.to_string(),
                scheme: url.scheme().to_string(),
            }),
        }
    }
}

#[async_trait]
impl ContentFetcher for FileFetcher {
    async fn fetch(&self, locator: &str) -> FetchResult<Vec<u8>> {
        let path = Self::path_for(locator)?;
        debug!("Reading {:?}", path);

        let io_error = |source| FetchError::Io {
            locator: locator.to_string(),
            source,
        };

        let metadata = tokio::fs::metadata(&path).await.map_err(io_error)?;
        if metadata.len() as usize > self.max_size {
            return Err(FetchError::TooLarge {
                locator: locator.to_string(),
                limit: self.max_size,
            });
        }

        let content = tokio::fs::read(&path).await.map_err(io_error)?;
        if content.is_empty() {
            return Err(FetchError::Empty {
                locator: locator.to_string(),
            });
        }

        Ok(content)
    }
}
