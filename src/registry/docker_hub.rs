//! Docker Hub resolver
//!
//! Uses the Hub tag-detail endpoint, which returns the manifest-list digest
//! together with one digest per platform.

use crate::error::{ImgfreshError, ImgfreshResult};
use crate::reference::ImageReference;
use crate::registry::http::HttpClient;
use crate::registry::info::{ImageInfo, PlatformDigest};
use crate::registry::{ComparisonStrategy, RegistryResolver};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// Default Docker Hub API base
pub const DEFAULT_HUB_URL: &str = "https://registry.hub.docker.com";

#[derive(Debug, Deserialize)]
struct TagDetail {
    #[serde(default)]
    digest: Option<String>,
    #[serde(default)]
    images: Option<Vec<HubImage>>,
}

#[derive(Debug, Deserialize)]
struct HubImage {
    #[serde(default)]
    digest: Option<String>,
    #[serde(default)]
    os: String,
    #[serde(default)]
    architecture: String,
    #[serde(default)]
    variant: Option<String>,
}

/// Resolver for `docker.io` images
pub struct DockerHubResolver {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl DockerHubResolver {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn tag_url(&self, reference: &ImageReference) -> String {
        format!(
            "{}/v2/repositories/{}/{}/tags/{}",
            self.base_url, reference.namespace, reference.repository_name, reference.tag
        )
    }

    /// Decode a tag-detail body into normalized info
    fn decode(reference: &ImageReference, body: &str) -> ImgfreshResult<ImageInfo> {
        let detail: TagDetail = serde_json::from_str(body)
            .map_err(|e| ImgfreshError::malformed(reference.to_string(), e.to_string()))?;

        let images = match detail.images {
            None => {
                return Err(ImgfreshError::malformed(
                    reference.to_string(),
                    "response has no images list",
                ))
            }
            Some(images) if images.is_empty() => {
                return Err(ImgfreshError::malformed(
                    reference.to_string(),
                    "images list is empty",
                ))
            }
            Some(images) => images,
        };

        let platform_digests = images
            .into_iter()
            .filter_map(|image| {
                let digest = image.digest.filter(|d| !d.is_empty())?;
                Some(PlatformDigest {
                    digest,
                    os: image.os,
                    architecture: image.architecture,
                    variant: image.variant.filter(|v| !v.is_empty()),
                })
            })
            .collect();

        Ok(ImageInfo {
            digest: detail.digest.unwrap_or_default(),
            platform_digests,
            tags: vec![],
        })
    }
}

impl RegistryResolver for DockerHubResolver {
    fn resolve(
        &self,
        reference: &ImageReference,
        _expected_digest: Option<&str>,
    ) -> ImgfreshResult<ImageInfo> {
        let url = self.tag_url(reference);
        let response = self.http.get(&url, &[("Accept", "application/json")])?;

        if !response.is_success() {
            return Err(ImgfreshError::RegistryStatus {
                url,
                status: response.status,
            });
        }

        let info = Self::decode(reference, &response.body)?;
        debug!(
            "Docker Hub {}: {} ({} platforms)",
            reference,
            info.digest,
            info.platform_digests.len()
        );
        Ok(info)
    }

    fn strategy(&self) -> ComparisonStrategy {
        ComparisonStrategy::PlatformDigests
    }

    fn registry_name(&self) -> &'static str {
        "Docker Hub"
    }
}
