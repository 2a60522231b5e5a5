//! # devfile_fetch
//!
//! Content fetchers for externally referenced devfile content.
//!
//! Devfile components may point at a Kubernetes or OpenShift manifest by URI
//! instead of inlining it. This crate provides the [`ContentFetcher`] seam the
//! resolver reads that content through.
//!
//! # Features
//!
//! - **HTTP(S)**: single GET via `reqwest`, with timeout, user agent and
//!   size limit
//! - **Files**: plain paths and `file://` URLs
//! - **Dispatch**: [`DefaultFetcher`] picks the transport by scheme
//! - **Locators**: relative locator resolution against a base location
//! - **Mock Fetcher**: canned responses for tests, no listener required
//!
//! # Example
//!
//! ```rust,no_run
//! use devfile_fetch::{ContentFetcher, DefaultFetcher, FetcherConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = DefaultFetcher::new(FetcherConfig::from_env())?;
//!     let manifest = fetcher
//!         .fetch_string("https://example.com/outerloop-deploy.yaml")
//!         .await?;
//!     println!("{}", manifest);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fetcher;
pub mod file;
pub mod http;
pub mod locator;
pub mod mock;

pub use config::FetcherConfig;
pub use error::{FetchError, FetchResult};
pub use fetcher::{ContentFetcher, DefaultFetcher};
pub use file::FileFetcher;
pub use http::HttpFetcher;
pub use locator::{is_relative, parse_locator, resolve_locator, Location};
pub use mock::{MockFetcher, MockResponse};
