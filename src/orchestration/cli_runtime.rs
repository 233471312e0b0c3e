//! CLI-backed container runtime
//!
//! Implements the ContainerRuntime trait by shelling out to `docker` or
//! `podman`. Both accept the same `ps` and `image inspect` templates.

use crate::error::{ImgfreshError, ImgfreshResult};
use crate::orchestration::runtime::{ContainerInfo, ContainerRuntime, ImageInspect};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// `ps` template: ID, names and image separated by tabs
const PS_FORMAT: &str = "{{.ID}}\t{{.Names}}\t{{.Image}}";

/// Container runtime driven through its CLI
pub struct CliRuntime {
    program: String,
    name: &'static str,
}

impl CliRuntime {
    /// Runtime backed by `program`, a command name or path to the binary
    pub fn new(program: impl Into<String>, name: &'static str) -> Self {
        Self {
            program: program.into(),
            name,
        }
    }

    /// Execute a runtime command and return the output
    async fn exec(&self, args: &[&str]) -> ImgfreshResult<std::process::Output> {
        debug!("Executing: {} {:?}", self.program, args);

        Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ImgfreshError::command_failed(format!("{} {:?}", self.program, args), e))
    }

    /// Execute and return stdout, failing on a non-zero exit
    async fn exec_stdout(&self, args: &[&str]) -> ImgfreshResult<String> {
        let output = self.exec(args).await?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ImgfreshError::command_exec(
                format!("{} {}", self.program, args.join(" ")),
                stderr.trim(),
            ))
        }
    }
}

/// Parse one line of `ps --format PS_FORMAT` output
fn parse_ps_line(line: &str) -> Option<ContainerInfo> {
    let mut fields = line.trim_end_matches('\r').splitn(3, '\t');
    let id = fields.next()?.trim();
    let names = fields.next()?.trim();
    let image = fields.next()?.trim();

    if id.is_empty() || image.is_empty() {
        return None;
    }

    // Docker joins multiple names with commas
    let name = names.split(',').next().unwrap_or(names);
    let name = match name.trim_start_matches('/') {
        "" => id,
        name => name,
    };

    Some(ContainerInfo {
        id: id.to_string(),
        name: name.to_string(),
        image: image.to_string(),
    })
}

#[async_trait]
impl ContainerRuntime for CliRuntime {
    async fn is_available(&self) -> bool {
        Command::new(&self.program)
            .args(["version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    async fn list_containers(&self) -> ImgfreshResult<Vec<ContainerInfo>> {
        let stdout = self
            .exec_stdout(&["ps", "--all", "--no-trunc", "--format", PS_FORMAT])
            .await
            .map_err(|e| ImgfreshError::ContainerEnumeration(e.to_string()))?;

        let containers: Vec<ContainerInfo> = stdout.lines().filter_map(parse_ps_line).collect();
        debug!("{} listed {} container(s)", self.name, containers.len());
        Ok(containers)
    }

    async fn inspect_image(&self, image: &str) -> ImgfreshResult<ImageInspect> {
        let stdout = self
            .exec_stdout(&["image", "inspect", "--format", "{{json .}}", image])
            .await
            .map_err(|e| {
                ImgfreshError::ContainerEnumeration(format!("inspecting image {}: {}", image, e))
            })?;

        let line = stdout.lines().find(|l| !l.trim().is_empty()).ok_or_else(|| {
            ImgfreshError::ContainerEnumeration(format!("empty inspect output for {}", image))
        })?;

        Ok(serde_json::from_str(line)?)
    }

    fn runtime_name(&self) -> &'static str {
        self.name
    }
}
