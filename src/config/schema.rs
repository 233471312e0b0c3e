//! Configuration schema for imgfresh
//!
//! Configuration is stored at `~/.config/imgfresh/config.toml`

use crate::registry::docker_hub::DEFAULT_HUB_URL;
use crate::registry::ghcr::DEFAULT_GITHUB_API_URL;
use crate::report::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Container runtime settings
    pub runtime: RuntimeConfig,

    /// Registry access
    pub registry: RegistryConfig,

    /// Report output
    pub output: OutputConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Container runtime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// CLI used to list containers: "docker" or "podman"
    pub command: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command: "docker".to_string(),
        }
    }
}

/// Registry access settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// GitHub token with `read:packages`, required for ghcr.io images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ghcr_token: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Docker Hub API base URL
    pub docker_hub_url: String,

    /// GitHub REST API base URL
    pub github_api_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            ghcr_token: None,
            timeout_secs: 30,
            docker_hub_url: DEFAULT_HUB_URL.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
        }
    }
}

/// Report output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Console format
    pub format: OutputFormat,

    /// Also write the results as JSON to this file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            path: None,
        }
    }
}

impl Config {
    /// Check values that parse but cannot be used
    pub fn validate(&self) -> Result<(), String> {
        if self.registry.timeout_secs == 0 {
            return Err("registry.timeout_secs must be greater than 0".to_string());
        }
        if !matches!(self.general.log_format.as_str(), "text" | "json") {
            return Err(format!(
                "general.log_format must be 'text' or 'json', got '{}'",
                self.general.log_format
            ));
        }
        Ok(())
    }

    /// Copy with secrets masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.registry.ghcr_token.is_some() {
            config.registry.ghcr_token = Some("********".to_string());
        }
        config
    }
}
