//! Inlining of manifests given by URI.
//!
//! Every Kubernetes or OpenShift component whose manifest is given by URI is
//! fetched and rewritten to carry the content inline. The original URI is
//! kept in the `devfile.io/kubeComponent-originalURI` attribute.

use std::sync::Arc;

use devfile_fetch::{resolve_locator, ContentFetcher, FetchError};
use devfile_spec::{Devfile, KUBE_COMPONENT_ORIGINAL_URI_KEY};
use futures_util::future::try_join_all;
use tracing::{debug, info};

use crate::error::{ResolveError, ResolveResult};

/// A component waiting for its manifest.
#[derive(Debug, Clone)]
struct PendingReference {
    index: usize,
    name: String,
    uri: String,
}

/// Resolves by-URI components through a [`ContentFetcher`].
pub struct ReferenceResolver {
    fetcher: Arc<dyn ContentFetcher>,
}

impl ReferenceResolver {
    pub fn new(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self { fetcher }
    }

    /// Inline every by-URI manifest in `devfile`.
    ///
    /// Fetches run concurrently; results are written back by component
    /// position, so completion order never affects the output. Any failure
    /// aborts the whole resolution.
    pub async fn resolve(&self, devfile: Devfile, base: Option<&str>) -> ResolveResult<Devfile> {
        let mut devfile = devfile;
        let pending = Self::pending_references(&devfile)?;

        if pending.is_empty() {
            debug!("No by-URI components to resolve");
            return Ok(devfile);
        }

        info!("Resolving {} by-URI component(s)", pending.len());

        let fetches = pending.iter().map(|reference| self.fetch_one(reference, base));
        let fetched = try_join_all(fetches).await?;

        for (reference, content) in pending.iter().zip(fetched) {
            let component = &mut devfile.components[reference.index];
            if let Some(manifest) = component.manifest_mut() {
                manifest.uri = None;
                manifest.inlined = Some(content);
            }
            component
                .attributes
                .insert_string(KUBE_COMPONENT_ORIGINAL_URI_KEY, reference.uri.clone());
            debug!("Inlined component '{}' from {}", reference.name, reference.uri);
        }

        Ok(devfile)
    }

    fn pending_references(devfile: &Devfile) -> ResolveResult<Vec<PendingReference>> {
        let mut pending = Vec::new();

        for (index, component) in devfile.components.iter().enumerate() {
            let Some(manifest) = component.manifest() else {
                continue;
            };

            if manifest.has_both_locators() {
                return Err(ResolveError::MalformedDocument(format!(
                    "component '{}' sets both uri and inlined",
                    component.name
                )));
            }

            if let Some(uri) = manifest.uri() {
                pending.push(PendingReference {
                    index,
                    name: component.name.clone(),
                    uri: uri.to_string(),
                });
            }
        }

        Ok(pending)
    }

    async fn fetch_one(
        &self,
        reference: &PendingReference,
        base: Option<&str>,
    ) -> ResolveResult<String> {
        let fetch_error = |source| ResolveError::Fetch {
            component: reference.name.clone(),
            source,
        };

        let locator = resolve_locator(&reference.uri, base).map_err(fetch_error)?;
        debug!("Fetching manifest for '{}' from {}", reference.name, locator);

        let bytes = self.fetcher.fetch(&locator).await.map_err(fetch_error)?;
        if bytes.is_empty() {
            return Err(fetch_error(FetchError::Empty { locator }));
        }

        String::from_utf8(bytes).map_err(|_| fetch_error(FetchError::NotUtf8 { locator }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devfile_fetch::{MockFetcher, MockResponse};
    use devfile_spec::{ComponentType, DevfileReader, ManifestLocator};

    const DEPLOY_URI: &str = "http://127.0.0.1:8080/outerloop-deploy.yaml";

    fn devfile_with(components: &str) -> Devfile {
        DevfileReader::parse_str(&format!("schemaVersion: 2.2.0\ncomponents:\n{}", components))
            .unwrap()
    }

    #[tokio::test]
    async fn test_inlines_and_stamps_provenance() {
        let fetcher = MockFetcher::new().with_content(DEPLOY_URI, "kind: Deployment\n");
        let resolver = ReferenceResolver::new(Arc::new(fetcher.clone()));

        let devfile = devfile_with(&format!(
            "- name: outerloop-deploy\n  kubernetes:\n    uri: {}\n",
            DEPLOY_URI
        ));
        let resolved = resolver.resolve(devfile, None).await.unwrap();

        let component = &resolved.components[0];
        let manifest = component.manifest().unwrap();
        assert_eq!(manifest.uri, None);
        assert_eq!(manifest.inlined.as_deref(), Some("kind: Deployment\n"));
        assert_eq!(component.original_uri(), Some(DEPLOY_URI));
        assert_eq!(fetcher.get_calls(), vec![DEPLOY_URI.to_string()]);
    }

    #[tokio::test]
    async fn test_inline_components_untouched() {
        let fetcher = MockFetcher::new();
        let resolver = ReferenceResolver::new(Arc::new(fetcher.clone()));

        let devfile = devfile_with(concat!(
            "- name: svc\n",
            "  openshift:\n",
            "    inlined: 'kind: Service'\n",
            "- name: runtime\n",
            "  container:\n",
            "    image: golang\n",
        ));
        let resolved = resolver.resolve(devfile.clone(), None).await.unwrap();

        assert_eq!(resolved, devfile);
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_names_component() {
        let fetcher = MockFetcher::new().with_response(DEPLOY_URI, MockResponse::Status(503));
        let resolver = ReferenceResolver::new(Arc::new(fetcher));

        let devfile = devfile_with(&format!(
            "- name: outerloop-deploy\n  kubernetes:\n    uri: {}\n",
            DEPLOY_URI
        ));
        let err = resolver.resolve(devfile, None).await.unwrap_err();

        match err {
            ResolveError::Fetch { component, source } => {
                assert_eq!(component, "outerloop-deploy");
                assert!(matches!(source, FetchError::Status { status: 503, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_relative_uri_needs_base() {
        let fetcher = MockFetcher::new()
            .with_content("https://registry.example.com/go/deploy.yaml", "kind: Deployment");
        let resolver = ReferenceResolver::new(Arc::new(fetcher));
        let devfile = devfile_with("- name: deploy\n  kubernetes:\n    uri: deploy.yaml\n");

        let err = resolver.resolve(devfile.clone(), None).await.unwrap_err();
        assert_eq!(err.locator(), Some("deploy.yaml"));

        let resolved = resolver
            .resolve(devfile, Some("https://registry.example.com/go/devfile.yaml"))
            .await
            .unwrap();
        // provenance keeps the URI as written
        assert_eq!(resolved.components[0].original_uri(), Some("deploy.yaml"));
    }

    #[tokio::test]
    async fn test_both_locators_rejected() {
        let resolver = ReferenceResolver::new(Arc::new(MockFetcher::new()));
        let devfile = devfile_with(&format!(
            "- name: deploy\n  kubernetes:\n    uri: {}\n    inlined: 'kind: Deployment'\n",
            DEPLOY_URI
        ));

        let err = resolver.resolve(devfile, None).await.unwrap_err();
        assert!(matches!(err, ResolveError::MalformedDocument(_)));
    }

    #[tokio::test]
    async fn test_no_by_uri_components_remain() {
        let fetcher = MockFetcher::new()
            .with_content("http://host/a.yaml", "kind: Deployment")
            .with_content("http://host/b.yaml", "kind: Route");
        let resolver = ReferenceResolver::new(Arc::new(fetcher));
        let devfile = devfile_with(concat!(
            "- name: a\n",
            "  kubernetes:\n",
            "    uri: http://host/a.yaml\n",
            "- name: b\n",
            "  openshift:\n",
            "    uri: http://host/b.yaml\n",
        ));

        let resolved = resolver.resolve(devfile, None).await.unwrap();
        assert_eq!(resolved.unresolved_references().count(), 0);
        let route = resolved.components_of(ComponentType::Openshift).next().unwrap();
        assert_eq!(
            route.reference().unwrap().locator,
            ManifestLocator::Inline("kind: Route")
        );
    }
}
