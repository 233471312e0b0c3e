//! Container runtime abstraction
//!
//! Provides a trait for the read-only container queries imgfresh needs, so
//! the check pipeline does not care whether Docker or Podman answers them.

use crate::error::ImgfreshResult;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

/// A container as listed by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    /// Container ID
    pub id: String,
    /// Container name
    pub name: String,
    /// Image string the container was created from
    pub image: String,
}

/// The subset of `image inspect` output imgfresh uses
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageInspect {
    /// `repository@digest` entries for every repository the image was pulled from
    #[serde(default, deserialize_with = "null_as_empty")]
    pub repo_digests: Vec<String>,
    /// Image OS (e.g. "linux")
    #[serde(default)]
    pub os: String,
    /// Image architecture (e.g. "amd64")
    #[serde(default)]
    pub architecture: String,
    /// Architecture variant (e.g. "v8")
    #[serde(default)]
    pub variant: Option<String>,
}

/// Podman reports `null` where Docker reports `[]`
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Abstract container runtime interface
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Check if the runtime CLI is installed and the daemon answers
    async fn is_available(&self) -> bool;

    /// List all containers, running or not, in runtime order
    async fn list_containers(&self) -> ImgfreshResult<Vec<ContainerInfo>>;

    /// Inspect the image a container was created from
    async fn inspect_image(&self, image: &str) -> ImgfreshResult<ImageInspect>;

    /// Get the human-readable runtime name for display
    fn runtime_name(&self) -> &'static str;
}
