//! Resolver factory
//!
//! Picks the resolver implementation from the registry host.

use crate::config::schema::RegistryConfig;
use crate::registry::docker_hub::DockerHubResolver;
use crate::registry::ghcr::GhcrResolver;
use crate::registry::http::HttpClient;
use crate::registry::unsupported::UnsupportedResolver;
use crate::registry::RegistryResolver;
use std::sync::Arc;

/// Registries known to imgfresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryKind {
    /// `docker.io`
    DockerHub,
    /// `ghcr.io`
    Ghcr,
    /// Anything else
    Unsupported,
}

impl RegistryKind {
    /// Classify a registry host. `index.docker.io` and `registry-1.docker.io`
    /// are Docker Hub's own hostnames and appear in fully qualified references.
    pub fn from_host(host: &str) -> Self {
        match host {
            "docker.io" | "index.docker.io" | "registry-1.docker.io" => RegistryKind::DockerHub,
            "ghcr.io" => RegistryKind::Ghcr,
            _ => RegistryKind::Unsupported,
        }
    }
}

/// Create the resolver for a registry kind
pub fn create_resolver(
    kind: RegistryKind,
    config: &RegistryConfig,
    http: Arc<dyn HttpClient>,
) -> Box<dyn RegistryResolver> {
    match kind {
        RegistryKind::DockerHub => Box::new(DockerHubResolver::new(http, &config.docker_hub_url)),
        RegistryKind::Ghcr => Box::new(GhcrResolver::new(
            http,
            config.ghcr_token.clone(),
            &config.github_api_url,
        )),
        RegistryKind::Unsupported => Box::new(UnsupportedResolver),
    }
}
