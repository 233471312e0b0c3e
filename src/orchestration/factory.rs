//! Runtime factory
//!
//! Maps the configured runtime command to a ContainerRuntime implementation.

use crate::config::schema::RuntimeConfig;
use crate::error::{ImgfreshError, ImgfreshResult};
use crate::orchestration::cli_runtime::CliRuntime;
use crate::orchestration::runtime::ContainerRuntime;
use std::path::Path;

/// Supported container runtime CLIs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    Docker,
    Podman,
}

impl RuntimeKind {
    /// Detect the runtime from a command name or path to its binary
    pub fn from_command(command: &str) -> Option<Self> {
        let file_name = Path::new(command.trim())
            .file_name()
            .and_then(|n| n.to_str())?;

        match file_name {
            "docker" => Some(RuntimeKind::Docker),
            "podman" => Some(RuntimeKind::Podman),
            _ => None,
        }
    }

    /// Get a human-readable runtime name
    pub fn name(&self) -> &'static str {
        match self {
            RuntimeKind::Docker => "Docker",
            RuntimeKind::Podman => "Podman",
        }
    }
}

/// Create the container runtime named in the configuration
pub fn create_runtime(config: &RuntimeConfig) -> ImgfreshResult<Box<dyn ContainerRuntime>> {
    let kind = RuntimeKind::from_command(&config.command).ok_or_else(|| {
        ImgfreshError::User(format!(
            "Unsupported container runtime '{}' (expected docker or podman)",
            config.command
        ))
    })?;

    Ok(Box::new(CliRuntime::new(config.command.trim(), kind.name())))
}
