//! Registry resolution
//!
//! Turns an [`ImageReference`] into normalized [`ImageInfo`]:
//! - `docker.io`: Docker Hub tag-detail API (per-platform digests)
//! - `ghcr.io`: GitHub package-versions API (tags per digest)
//! - anything else: rejected as unsupported
//!
//! Lookups go through a [`RunCache`] so repeated `{repository}:{tag}`
//! lookups within a run hit the network once.

pub mod cache;
pub mod docker_hub;
mod factory;
pub mod ghcr;
pub mod http;
pub mod info;
mod unsupported;

pub use cache::RunCache;
pub use docker_hub::DockerHubResolver;
pub use factory::{create_resolver, RegistryKind};
pub use ghcr::GhcrResolver;
pub use http::{HttpClient, HttpResponse, UreqClient};
pub use info::{ImageInfo, Platform, PlatformDigest};
pub use unsupported::UnsupportedResolver;

use crate::config::schema::RegistryConfig;
use crate::error::ImgfreshResult;
use crate::reference::ImageReference;
use std::sync::Arc;
use std::time::Duration;

/// How a registry's info is compared against a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonStrategy {
    /// Compare the `latest` digest, then architecture-matched digests
    PlatformDigests,
    /// Check whether the container's digest carries the `latest` tag
    TagMembership,
}

/// Registry-specific lookup
pub trait RegistryResolver: Send + Sync {
    /// Fetch info for `reference`. GHCR uses `expected_digest` to select a
    /// version; Docker Hub ignores it.
    fn resolve(
        &self,
        reference: &ImageReference,
        expected_digest: Option<&str>,
    ) -> ImgfreshResult<ImageInfo>;

    /// How results from this registry are compared
    fn strategy(&self) -> ComparisonStrategy;

    /// Memoization key for a lookup
    fn cache_key(&self, reference: &ImageReference, _expected_digest: Option<&str>) -> String {
        reference.cache_key()
    }

    /// Get the human-readable registry name for display
    fn registry_name(&self) -> &'static str;
}

/// The set of resolvers for one run, dispatched by registry host
pub struct Registry {
    docker_hub: Box<dyn RegistryResolver>,
    ghcr: Box<dyn RegistryResolver>,
    unsupported: Box<dyn RegistryResolver>,
}

impl Registry {
    /// Build resolvers over a shared HTTP transport
    pub fn new(config: &RegistryConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            docker_hub: create_resolver(RegistryKind::DockerHub, config, http.clone()),
            ghcr: create_resolver(RegistryKind::Ghcr, config, http.clone()),
            unsupported: create_resolver(RegistryKind::Unsupported, config, http),
        }
    }

    /// Build resolvers over the default `ureq` transport
    pub fn from_config(config: &RegistryConfig) -> Self {
        let http = Arc::new(UreqClient::new(Duration::from_secs(config.timeout_secs)));
        Self::new(config, http)
    }

    /// Resolver responsible for a reference's host
    pub fn resolver_for(&self, reference: &ImageReference) -> &dyn RegistryResolver {
        match RegistryKind::from_host(&reference.registry_host) {
            RegistryKind::DockerHub => self.docker_hub.as_ref(),
            RegistryKind::Ghcr => self.ghcr.as_ref(),
            RegistryKind::Unsupported => self.unsupported.as_ref(),
        }
    }

    /// Resolve through the run cache; failures are not cached
    pub fn resolve(
        &self,
        cache: &mut RunCache,
        reference: &ImageReference,
        expected_digest: Option<&str>,
    ) -> ImgfreshResult<ImageInfo> {
        let resolver = self.resolver_for(reference);
        let key = resolver.cache_key(reference, expected_digest);

        if let Some(info) = cache.get(&key) {
            return Ok(info.clone());
        }

        let info = resolver.resolve(reference, expected_digest)?;
        Ok(cache.insert(key, info).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImgfreshError;
    use crate::reference;
    use crate::registry::http::testing::FakeHttp;

    const HUB_LATEST: &str = r#"{"digest": "sha256:l", "images": [
        {"digest": "sha256:l-amd64", "os": "linux", "architecture": "amd64"}
    ]}"#;

    fn config() -> RegistryConfig {
        RegistryConfig {
            docker_hub_url: "https://hub.test".to_string(),
            github_api_url: "https://gh.test".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn dispatches_by_host() {
        let registry = Registry::new(&config(), Arc::new(FakeHttp::new()));
        let name = |image: &str| registry.resolver_for(&reference::parse(image)).registry_name();

        assert_eq!(name("postgres:16.2"), "Docker Hub");
        assert_eq!(name("ghcr.io/esphome/esphome"), "GitHub Container Registry");
        assert_eq!(name("quay.io/coreos/etcd"), "unsupported");
    }

    #[test]
    fn repeated_lookup_hits_network_once() {
        let http = Arc::new(FakeHttp::new().route(
            "https://hub.test/v2/repositories/library/redis/tags/latest",
            200,
            HUB_LATEST,
        ));
        let registry = Registry::new(&config(), http.clone());
        let mut cache = RunCache::new();
        let redis = reference::parse("redis");

        let first = registry.resolve(&mut cache, &redis, None).unwrap();
        let second = registry.resolve(&mut cache, &redis, None).unwrap();

        assert_eq!(first, second);
        assert_eq!(http.call_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let http = Arc::new(FakeHttp::new());
        let registry = Registry::new(&config(), http.clone());
        let mut cache = RunCache::new();
        let missing = reference::parse("library/missing:1");

        assert!(registry.resolve(&mut cache, &missing, None).is_err());
        assert!(registry.resolve(&mut cache, &missing, None).is_err());
        assert_eq!(http.call_count(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn unsupported_registry_makes_no_request() {
        let http = Arc::new(FakeHttp::new());
        let registry = Registry::new(&config(), http.clone());
        let mut cache = RunCache::new();

        let err = registry
            .resolve(&mut cache, &reference::parse("gcr.io/distroless/base"), None)
            .unwrap_err();
        assert!(matches!(err, ImgfreshError::UnsupportedRegistry { .. }));
        assert_eq!(http.call_count(), 0);
    }
}
