//! GitHub Container Registry resolver
//!
//! GHCR has no tag-detail endpoint. Package versions are listed through the
//! GitHub REST API, keyed by digest, each carrying the tags that currently
//! point at it. Matching is digest-first because one digest can carry several
//! tags.

use crate::error::{ImgfreshError, ImgfreshResult};
use crate::reference::ImageReference;
use crate::registry::http::HttpClient;
use crate::registry::info::ImageInfo;
use crate::registry::{ComparisonStrategy, RegistryResolver};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Default GitHub REST API base
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// REST API version pinned in every request
pub const GITHUB_API_VERSION: &str = "2022-11-28";

/// Versions requested per page (the API maximum)
pub const PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct PackageVersion {
    /// The version name is the manifest digest
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    metadata: VersionMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct VersionMetadata {
    #[serde(default)]
    container: ContainerMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct ContainerMetadata {
    #[serde(default)]
    tags: Vec<String>,
}

/// Package owner kind, which selects the REST path prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Org,
    User,
}

impl Owner {
    fn path(self) -> &'static str {
        match self {
            Owner::Org => "orgs",
            Owner::User => "users",
        }
    }
}

/// Resolver for `ghcr.io` images
pub struct GhcrResolver {
    http: Arc<dyn HttpClient>,
    token: Option<String>,
    api_url: String,
}

impl GhcrResolver {
    pub fn new(
        http: Arc<dyn HttpClient>,
        token: Option<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token: token.filter(|t| !t.trim().is_empty()),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn versions_url(&self, owner: Owner, reference: &ImageReference, page: usize) -> String {
        format!(
            "{}/{}/{}/packages/container/{}/versions?page={}&per_page={}",
            self.api_url,
            owner.path(),
            reference.namespace,
            reference.repository_name,
            page,
            PER_PAGE
        )
    }
}

/// Find the version matching `expected_digest`, or carrying `tag` when no
/// digest is given.
fn find_version(
    versions: &[PackageVersion],
    tag: &str,
    expected_digest: Option<&str>,
) -> Option<ImageInfo> {
    let found = match expected_digest {
        Some(digest) => versions.iter().find(|v| v.name == digest),
        None => versions
            .iter()
            .find(|v| v.metadata.container.tags.iter().any(|t| t == tag)),
    }?;

    debug!("GHCR match {} ({})", found.name, found.url);
    Some(ImageInfo {
        digest: found.name.clone(),
        platform_digests: vec![],
        tags: found.metadata.container.tags.clone(),
    })
}

impl RegistryResolver for GhcrResolver {
    fn resolve(
        &self,
        reference: &ImageReference,
        expected_digest: Option<&str>,
    ) -> ImgfreshResult<ImageInfo> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| ImgfreshError::MissingCredential {
                image: reference.to_string(),
            })?;

        let authorization = format!("Bearer {}", token);
        let headers = [
            ("Accept", "application/vnd.github+json"),
            ("Authorization", authorization.as_str()),
            ("X-GitHub-Api-Version", GITHUB_API_VERSION),
        ];

        let mut owner = Owner::Org;
        let mut page = 1;

        loop {
            let url = self.versions_url(owner, reference, page);
            let response = self.http.get(&url, &headers)?;

            if response.status == 404 && owner == Owner::Org && page == 1 {
                debug!(
                    "No organization package for {}, trying user namespace",
                    reference.namespace
                );
                owner = Owner::User;
                continue;
            }

            if !response.is_success() {
                return Err(ImgfreshError::RegistryStatus {
                    url,
                    status: response.status,
                });
            }

            let versions: Vec<PackageVersion> =
                serde_json::from_str(&response.body).map_err(|e| {
                    ImgfreshError::malformed(reference.to_string(), format!("page {}: {}", page, e))
                })?;

            if versions.is_empty() {
                break;
            }

            if let Some(info) = find_version(&versions, &reference.tag, expected_digest) {
                return Ok(info);
            }

            if versions.len() < PER_PAGE {
                break;
            }
            page += 1;
        }

        Err(ImgfreshError::NoMatchingVersions {
            image: reference.to_string(),
        })
    }

    fn strategy(&self) -> ComparisonStrategy {
        ComparisonStrategy::TagMembership
    }

    fn cache_key(&self, reference: &ImageReference, expected_digest: Option<&str>) -> String {
        match expected_digest {
            Some(digest) => format!("{}@{}", reference.cache_key(), digest),
            None => reference.cache_key(),
        }
    }

    fn registry_name(&self) -> &'static str {
        "GitHub Container Registry"
    }
}
