//! Container runtime access
//!
//! Lists containers through the configured runtime CLI and turns them into
//! observations for the freshness checker.

mod cli_runtime;
mod factory;
mod runtime;

pub use cli_runtime::CliRuntime;
pub use factory::{create_runtime, RuntimeKind};
pub use runtime::{ContainerInfo, ContainerRuntime, ImageInspect};

use crate::error::{ImgfreshError, ImgfreshResult};
use crate::freshness::ContainerObservation;
use crate::reference::ImageReference;
use crate::registry::Platform;
use tracing::debug;

/// List every container and inspect its image.
///
/// Any listing or inspect failure aborts the whole run.
pub async fn observe_containers(
    runtime: &dyn ContainerRuntime,
) -> ImgfreshResult<Vec<ContainerObservation>> {
    let containers = runtime.list_containers().await.map_err(enumeration_error)?;
    let mut observations = Vec::with_capacity(containers.len());

    for container in containers {
        let inspect = runtime.inspect_image(&container.image).await.map_err(|e| {
            ImgfreshError::ContainerEnumeration(format!(
                "inspecting image {} of container {}: {}",
                container.image, container.name, e
            ))
        })?;

        let digests = select_repo_digests(&inspect.repo_digests, &container.image);
        if digests.is_empty() {
            debug!("{} has no repository digest", container.image);
        }

        let platform =
            Platform::new(inspect.os, inspect.architecture).with_variant(inspect.variant);
        observations.push(ContainerObservation::new(
            container.name,
            container.image,
            digests,
            platform,
        ));
    }

    Ok(observations)
}

fn enumeration_error(e: ImgfreshError) -> ImgfreshError {
    match e {
        ImgfreshError::ContainerEnumeration(_) => e,
        other => ImgfreshError::ContainerEnumeration(other.to_string()),
    }
}

/// Pick the digests of the repository the container image came from.
///
/// Entries look like `repository@sha256:...`. Podman can list one
/// repository twice (manifest list and platform manifest), so every entry
/// whose repository matches the image is kept. Without a match, the entries
/// of the first listed repository are used.
pub fn select_repo_digests(repo_digests: &[String], image: &str) -> Vec<String> {
    let wanted = ImageReference::parse(image);
    let same_repository = |a: &ImageReference, b: &ImageReference| {
        a.registry_host == b.registry_host && a.repository() == b.repository()
    };

    let entries: Vec<(ImageReference, &str)> = repo_digests
        .iter()
        .filter_map(|entry| entry.split_once('@'))
        .filter(|(_, digest)| !digest.is_empty())
        .map(|(repository, digest)| (ImageReference::parse(repository), digest))
        .collect();

    let target = match entries.iter().find(|(r, _)| same_repository(r, &wanted)) {
        Some((r, _)) => r,
        None => match entries.first() {
            Some((r, _)) => r,
            None => return Vec::new(),
        },
    };

    entries
        .iter()
        .filter(|(r, _)| same_repository(r, target))
        .map(|(_, digest)| digest.to_string())
        .collect()
}
