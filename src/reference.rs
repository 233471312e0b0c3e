//! Image reference parsing
//!
//! Splits `[host/][namespace/]name[:tag][@digest]` into its parts. Only the
//! last three path segments matter, so mirrored images such as
//! `mirror.example/ghcr.io/org/repo` resolve against the upstream host.

use serde::Serialize;
use std::fmt;

/// Registry assumed when the image path has fewer than three segments
pub const DEFAULT_REGISTRY: &str = "docker.io";

/// Namespace assumed when the image path has a single segment
pub const DEFAULT_NAMESPACE: &str = "library";

/// Tag assumed when none is given, and the tag every check compares against
pub const LATEST_TAG: &str = "latest";

/// A parsed image reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImageReference {
    /// Registry host (e.g. `docker.io`, `ghcr.io`)
    pub registry_host: String,
    /// Namespace or organization (`library` for official Docker Hub images)
    pub namespace: String,
    /// Repository name
    pub repository_name: String,
    /// Tag
    pub tag: String,
    /// Image path as written, without tag or digest
    #[serde(skip)]
    path: String,
}

impl ImageReference {
    /// Parse an image string. Never fails; registry support is checked later.
    pub fn parse(image: &str) -> Self {
        let image = image.trim();
        let without_digest = image.split_once('@').map_or(image, |(path, _)| path);

        let (path, tag) = match without_digest.rsplit_once(':') {
            Some((path, "")) => (path, LATEST_TAG),
            Some((path, tag)) if !tag.contains('/') => (path, tag),
            _ => (without_digest, LATEST_TAG),
        };

        let segments: Vec<&str> = path.split('/').collect();
        let len = segments.len();

        let repository_name = segments[len - 1].to_string();
        let namespace = if len >= 2 {
            segments[len - 2].to_string()
        } else {
            DEFAULT_NAMESPACE.to_string()
        };
        let registry_host = if len >= 3 {
            segments[len - 3].to_string()
        } else {
            DEFAULT_REGISTRY.to_string()
        };

        Self {
            registry_host,
            namespace,
            repository_name,
            tag: tag.to_string(),
            path: path.to_string(),
        }
    }

    /// The same repository at a different tag
    pub fn with_tag(&self, tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..self.clone()
        }
    }

    /// `namespace/name`
    pub fn repository(&self) -> String {
        format!("{}/{}", self.namespace, self.repository_name)
    }

    /// Image path as written by the user, without tag
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the reference points at the `latest` tag
    pub fn is_latest(&self) -> bool {
        self.tag == LATEST_TAG
    }

    /// Key used for run-scoped memoization of registry lookups
    pub fn cache_key(&self) -> String {
        format!("{}/{}:{}", self.registry_host, self.repository(), self.tag)
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path, self.tag)
    }
}

/// Convenience wrapper around [`ImageReference::parse`]
pub fn parse(image: &str) -> ImageReference {
    ImageReference::parse(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_segment_uses_defaults() {
        let r = parse("postgres:16.2");
        assert_eq!(r.registry_host, "docker.io");
        assert_eq!(r.namespace, "library");
        assert_eq!(r.repository_name, "postgres");
        assert_eq!(r.tag, "16.2");
    }

    #[test]
    fn missing_tag_is_latest() {
        let r = parse("eclipse-mosquitto");
        assert_eq!(r.tag, "latest");
        assert!(r.is_latest());
        assert_eq!(r.to_string(), "eclipse-mosquitto:latest");
    }

    #[test]
    fn empty_tag_is_latest() {
        let r = parse("postgres:");
        assert_eq!(r.path(), "postgres");
        assert_eq!(r.namespace, "library");
        assert_eq!(r.tag, "latest");
        assert_eq!(r.to_string(), "postgres:latest");

        let r = parse("ghcr.io/acme/api:");
        assert_eq!(r.repository_name, "api");
        assert_eq!(r.to_string(), "ghcr.io/acme/api:latest");
    }

    #[test]
    fn two_segments_keep_default_host() {
        for image in ["grafana/grafana", "ghcr.io/esphome", "homeassistant/home-assistant:2024.7"] {
            let r = parse(image);
            assert_eq!(r.registry_host, "docker.io", "{image}");
            assert_ne!(r.namespace, "library", "{image}");
        }
    }

    #[test]
    fn three_segments_set_host() {
        let r = parse("ghcr.io/esphome/esphome:2024.6");
        assert_eq!(r.registry_host, "ghcr.io");
        assert_eq!(r.namespace, "esphome");
        assert_eq!(r.repository_name, "esphome");
        assert_eq!(r.tag, "2024.6");
        assert_eq!(r.path(), "ghcr.io/esphome/esphome");
    }

    #[test]
    fn mirror_prefix_resolves_upstream_host() {
        let r = parse("m.daocloud.io/ghcr.io/esphome/esphome:stable");
        assert_eq!(r.registry_host, "ghcr.io");
        assert_eq!(r.namespace, "esphome");
        assert_eq!(r.tag, "stable");
    }

    #[test]
    fn port_in_host_is_not_a_tag() {
        let r = parse("registry.local:5000/team/app");
        assert_eq!(r.registry_host, "registry.local:5000");
        assert_eq!(r.tag, "latest");

        let r = parse("registry.local:5000/team/app:1.0");
        assert_eq!(r.registry_host, "registry.local:5000");
        assert_eq!(r.tag, "1.0");
    }

    #[test]
    fn digest_suffix_is_dropped() {
        let r = parse("redis:7@sha256:0123abcd");
        assert_eq!(r.repository_name, "redis");
        assert_eq!(r.tag, "7");
    }

    #[test]
    fn with_tag_preserves_repository() {
        let r = parse("ghcr.io/esphome/esphome:2024.6").with_tag(LATEST_TAG);
        assert_eq!(r.tag, "latest");
        assert_eq!(r.repository(), "esphome/esphome");
        assert_eq!(r.cache_key(), "ghcr.io/esphome/esphome:latest");
    }
}
