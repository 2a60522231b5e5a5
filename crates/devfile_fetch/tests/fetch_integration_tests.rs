//! Integration tests for the content fetch layer.
//!
//! These tests use the filesystem and the mock fetcher; no network listener
//! is required.

use std::sync::Arc;
use std::time::Duration;

use devfile_fetch::{
    resolve_locator, ContentFetcher, DefaultFetcher, FetchError, FetcherConfig, MockFetcher,
    MockResponse,
};
use tempfile::tempdir;

/// Fetchers are used as shared trait objects.
#[tokio::test]
async fn test_fetcher_as_trait_object() {
    let mock = MockFetcher::new().with_content(
        "http://127.0.0.1:8080/outerloop-deploy.yaml",
        "kind: Deployment\n",
    );
    let fetcher: Arc<dyn ContentFetcher> = Arc::new(mock.clone());

    let content = fetcher
        .fetch_string("http://127.0.0.1:8080/outerloop-deploy.yaml")
        .await
        .unwrap();

    assert_eq!(content, "kind: Deployment\n");
    assert_eq!(
        mock.get_calls(),
        vec!["http://127.0.0.1:8080/outerloop-deploy.yaml".to_string()]
    );
}

/// A relative manifest next to a devfile on disk is readable once resolved.
#[tokio::test]
async fn test_relative_locator_against_devfile_path() {
    let temp = tempdir().unwrap();
    let manifests = temp.path().join("k8s");
    std::fs::create_dir_all(&manifests).unwrap();
    std::fs::write(manifests.join("deploy.yaml"), "kind: Deployment\n").unwrap();
    let devfile_path = temp.path().join("devfile.yaml");

    let resolved = resolve_locator("k8s/deploy.yaml", devfile_path.to_str()).unwrap();
    let fetcher = DefaultFetcher::new(FetcherConfig::default()).unwrap();
    let content = fetcher.fetch_string(&resolved).await.unwrap();

    assert_eq!(content, "kind: Deployment\n");
}

/// Concurrent fetches complete independently of their start order.
#[tokio::test]
async fn test_concurrent_fetches_with_delays() {
    let fetcher = MockFetcher::new()
        .with_content("slow", "first")
        .with_content("fast", "second")
        .with_delay("slow", Duration::from_millis(50));

    let (slow, fast) = tokio::join!(fetcher.fetch_string("slow"), fetcher.fetch_string("fast"));

    assert_eq!(slow.unwrap(), "first");
    assert_eq!(fast.unwrap(), "second");
    assert_eq!(fetcher.call_count(), 2);
}

/// Every failure names the locator that caused it.
#[tokio::test]
async fn test_errors_carry_locator() {
    let fetcher = MockFetcher::new()
        .with_response("http://host/gone", MockResponse::Status(410))
        .with_response("http://host/slow", MockResponse::Timeout);

    for locator in ["http://host/gone", "http://host/slow", "http://host/missing"] {
        let err = fetcher.fetch(locator).await.unwrap_err();
        assert_eq!(err.locator(), Some(locator));
    }

    let err = fetcher.fetch("http://host/gone").await.unwrap_err();
    assert_eq!(err.to_string(), "Request to http://host/gone returned HTTP 410");
}

/// Without a base, relative locators are refused before any I/O happens.
#[test]
fn test_relative_locator_without_base() {
    let err = resolve_locator("outerloop-deploy.yaml", None).unwrap_err();
    assert!(matches!(err, FetchError::RelativeLocator { .. }));
}
