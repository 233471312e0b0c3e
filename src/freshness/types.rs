//! Observations, verdicts and results

use crate::reference::ImageReference;
use crate::registry::Platform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-state freshness outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Running the image `latest` currently points to
    Yes,
    /// A newer image is published under `latest`
    No,
    /// Could not be determined
    Unknown,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Yes => "yes",
            Verdict::No => "no",
            Verdict::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the container runtime reports about one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerObservation {
    /// Container name
    pub name: String,
    /// Image string the container was created from
    pub image: String,
    /// Repository digests of the local image, in runtime order. Podman
    /// records both the manifest-list digest and the per-platform digest;
    /// locally built images have none.
    pub recorded_digests: Vec<String>,
    /// Platform of the local image
    pub platform: Platform,
}

impl ContainerObservation {
    pub fn new(
        name: impl Into<String>,
        image: impl Into<String>,
        recorded_digests: Vec<String>,
        platform: Platform,
    ) -> Self {
        let mut digests: Vec<String> = Vec::with_capacity(recorded_digests.len());
        for digest in recorded_digests {
            if !digest.is_empty() && !digests.contains(&digest) {
                digests.push(digest);
            }
        }

        Self {
            name: name.into(),
            image: image.into(),
            recorded_digests: digests,
            platform,
        }
    }

    /// First recorded digest, if any
    pub fn recorded_digest(&self) -> Option<&str> {
        self.recorded_digests.first().map(String::as_str)
    }

    /// Parsed image reference
    pub fn reference(&self) -> ImageReference {
        ImageReference::parse(&self.image)
    }
}

/// Verdict for one container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Container name
    pub container: String,
    /// Image as `path:tag`
    pub image: String,
    /// Verdict
    #[serde(rename = "is_latest")]
    pub verdict: Verdict,
}
