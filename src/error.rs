//! Error types for imgfresh
//!
//! All modules use `ImgfreshResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for imgfresh operations
pub type ImgfreshResult<T> = Result<T, ImgfreshError>;

/// All errors that can occur in imgfresh
#[derive(Error, Debug)]
pub enum ImgfreshError {
    // Registry errors (downgraded to an `unknown` verdict per container)
    #[error("Unsupported registry {host} for image {image}")]
    UnsupportedRegistry { host: String, image: String },

    #[error("GHCR token missing, cannot query {image}")]
    MissingCredential { image: String },

    #[error("Network error while fetching {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Registry returned HTTP {status} for {url}")]
    RegistryStatus { url: String, status: u16 },

    #[error("Malformed registry response for {image}: {reason}")]
    MalformedResponse { image: String, reason: String },

    #[error("No matching versions for {image}")]
    NoMatchingVersions { image: String },

    #[error("No {platform} entry in the {side} manifest of {image}")]
    ArchitectureMismatch {
        image: String,
        platform: String,
        side: &'static str,
    },

    #[error("Image {image} has no repository digest (built locally?)")]
    MissingDigest { image: String },

    // Runtime errors (fatal to the whole run)
    #[error("Container runtime not available: {0}")]
    RuntimeUnavailable(String),

    #[error("Failed to enumerate containers: {0}")]
    ContainerEnumeration(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{0}")]
    User(String),
}

impl ImgfreshError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(image: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            image: image.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error only affects a single container's check.
    ///
    /// Everything else aborts the run.
    pub fn is_per_container(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedRegistry { .. }
                | Self::MissingCredential { .. }
                | Self::Network { .. }
                | Self::RegistryStatus { .. }
                | Self::MalformedResponse { .. }
                | Self::NoMatchingVersions { .. }
                | Self::ArchitectureMismatch { .. }
                | Self::MissingDigest { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingCredential { .. } => {
                Some("Pass --ghcr-token, set GHCR_TOKEN, or set registry.ghcr_token in the config")
            }
            Self::UnsupportedRegistry { .. } => {
                Some("Only docker.io and ghcr.io images can be checked")
            }
            Self::RuntimeUnavailable(_) => {
                Some("Install docker or podman, or set runtime.command in the config")
            }
            Self::RegistryStatus { status: 401 | 403, .. } => {
                Some("Check that the GHCR token has the read:packages scope")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ImgfreshError::UnsupportedRegistry {
            host: "quay.io".to_string(),
            image: "quay.io/prometheus/node-exporter".to_string(),
        };
        assert!(err.to_string().contains("Unsupported registry quay.io"));
    }

    #[test]
    fn error_hint() {
        let err = ImgfreshError::MissingCredential {
            image: "ghcr.io/esphome/esphome".to_string(),
        };
        assert!(err.hint().unwrap().contains("GHCR_TOKEN"));

        let err = ImgfreshError::RegistryStatus {
            url: "https://api.github.com".to_string(),
            status: 403,
        };
        assert!(err.hint().is_some());
    }

    #[test]
    fn per_container_errors() {
        assert!(ImgfreshError::NoMatchingVersions {
            image: "ghcr.io/a/b".to_string()
        }
        .is_per_container());
        assert!(!ImgfreshError::ContainerEnumeration("boom".to_string()).is_per_container());
    }
}
