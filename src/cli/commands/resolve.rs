//! Resolve command - query one image reference and print the normalized answer

use crate::cli::args::ResolveArgs;
use crate::config::Config;
use crate::error::{ImgfreshError, ImgfreshResult};
use crate::reference::ImageReference;
use crate::registry::{ImageInfo, Registry, RunCache};
use serde::Serialize;

#[derive(Serialize)]
struct Resolved {
    reference: ImageReference,
    registry: &'static str,
    info: ImageInfo,
}

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, config: &Config) -> ImgfreshResult<()> {
    let mut registry_config = config.registry.clone();
    if let Some(token) = args.ghcr_token.filter(|t| !t.trim().is_empty()) {
        registry_config.ghcr_token = Some(token);
    }

    let reference = ImageReference::parse(&args.image);
    let digest = args.digest.filter(|d| !d.is_empty());

    let resolved = tokio::task::spawn_blocking(move || -> ImgfreshResult<Resolved> {
        let registry = Registry::from_config(&registry_config);
        let info = registry.resolve(&mut RunCache::new(), &reference, digest.as_deref())?;
        Ok(Resolved {
            registry: registry.resolver_for(&reference).registry_name(),
            reference,
            info,
        })
    })
    .await
    .map_err(|e| ImgfreshError::User(format!("Resolve task failed: {}", e)))??;

    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}
