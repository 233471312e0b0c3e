//! Fallback for registries without a resolver (gcr.io, quay.io, ...)

use crate::error::{ImgfreshError, ImgfreshResult};
use crate::reference::ImageReference;
use crate::registry::info::ImageInfo;
use crate::registry::{ComparisonStrategy, RegistryResolver};

/// Resolver that rejects every reference
#[derive(Debug, Default)]
pub struct UnsupportedResolver;

impl RegistryResolver for UnsupportedResolver {
    fn resolve(
        &self,
        reference: &ImageReference,
        _expected_digest: Option<&str>,
    ) -> ImgfreshResult<ImageInfo> {
        Err(ImgfreshError::UnsupportedRegistry {
            host: reference.registry_host.clone(),
            image: reference.to_string(),
        })
    }

    fn strategy(&self) -> ComparisonStrategy {
        ComparisonStrategy::PlatformDigests
    }

    fn registry_name(&self) -> &'static str {
        "unsupported"
    }
}
