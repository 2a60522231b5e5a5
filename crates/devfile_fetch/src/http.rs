//! HTTP(S) content fetcher backed by `reqwest`.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::FetcherConfig;
use crate::error::{FetchError, FetchResult};
use crate::fetcher::ContentFetcher;

/// Fetches content with a single GET request. No retries.
pub struct HttpFetcher {
    client: Client,
    config: FetcherConfig,
}

impl HttpFetcher {
    pub fn new(config: FetcherConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn map_error(locator: &str, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                locator: locator.to_string(),
            }
        } else {
            FetchError::Unreachable {
                locator: locator.to_string(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, locator: &str) -> FetchResult<Vec<u8>> {
        info!("Fetching {}", locator);

        let mut response = self
            .client
            .get(locator)
            .send()
            .await
            .map_err(|e| Self::map_error(locator, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                locator: locator.to_string(),
                status: status.as_u16(),
            });
        }

        let too_large = || FetchError::TooLarge {
            locator: locator.to_string(),
            limit: self.config.max_size,
        };

        if let Some(length) = response.content_length() {
            if length as usize > self.config.max_size {
                return Err(too_large());
            }
        }

        // Content-Length may be absent, so the limit is enforced while reading
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Self::map_error(locator, e))?
        {
            if body.len() + chunk.len() > self.config.max_size {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        if body.is_empty() {
            return Err(FetchError::Empty {
                locator: locator.to_string(),
            });
        }

        debug!("Fetched {} bytes from {}", body.len(), locator);
        Ok(body)
    }
}
