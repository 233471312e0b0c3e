//! Normalized registry responses

use serde::{Deserialize, Serialize};
use std::fmt;

/// OS/architecture pair (plus optional variant) an image was built for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub os: String,
    pub architecture: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl Platform {
    pub fn new(os: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            architecture: architecture.into(),
            variant: None,
        }
    }

    pub fn with_variant(mut self, variant: Option<String>) -> Self {
        self.variant = variant.filter(|v| !v.is_empty());
        self
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.architecture)?;
        if let Some(ref variant) = self.variant {
            write!(f, "/{}", variant)?;
        }
        Ok(())
    }
}

/// Digest of one platform inside a multi-architecture manifest list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDigest {
    pub digest: String,
    pub os: String,
    pub architecture: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

/// Registry information about one tag (Docker Hub) or one digest (GHCR)
///
/// Docker Hub fills `platform_digests`, GHCR fills `tags`. An empty `digest`
/// means the registry did not report one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    #[serde(default)]
    pub digest: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platform_digests: Vec<PlatformDigest>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ImageInfo {
    /// Entry for the given platform.
    ///
    /// Entries must match OS and architecture exactly. When several do (e.g.
    /// `arm/v6` and `arm/v7`) the one with the same variant wins, otherwise
    /// the first listed.
    pub fn platform_entry(&self, platform: &Platform) -> Option<&PlatformDigest> {
        let mut candidates = self
            .platform_digests
            .iter()
            .filter(|p| p.os == platform.os && p.architecture == platform.architecture);

        let first = candidates.next()?;
        if let Some(ref variant) = platform.variant {
            if let Some(exact) = std::iter::once(first)
                .chain(candidates)
                .find(|p| p.variant.as_deref() == Some(variant.as_str()))
            {
                return Some(exact);
            }
        }
        Some(first)
    }

    /// Digest for the given platform, see [`ImageInfo::platform_entry`]
    pub fn platform_digest(&self, platform: &Platform) -> Option<&str> {
        self.platform_entry(platform).map(|p| p.digest.as_str())
    }

    /// Whether the registry lists `tag` for this digest
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
