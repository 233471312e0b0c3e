//! Check command - report whether each container runs the `latest` image

use crate::cli::args::CheckArgs;
use crate::config::Config;
use crate::error::{ImgfreshError, ImgfreshResult};
use crate::freshness::FreshnessChecker;
use crate::orchestration::{create_runtime, observe_containers};
use crate::registry::Registry;
use crate::report::Report;
use crate::ui::{self, TaskSpinner, UiContext};
use tracing::{debug, info};

/// Execute the check command
pub async fn execute(args: CheckArgs, config: &Config) -> ImgfreshResult<()> {
    let ctx = UiContext::detect();
    let config = apply_overrides(config, args);

    let runtime = create_runtime(&config.runtime)?;
    if !runtime.is_available().await {
        return Err(ImgfreshError::RuntimeUnavailable(format!(
            "'{} version' failed",
            config.runtime.command
        )));
    }
    info!("Using {} runtime", runtime.runtime_name());

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Listing {} containers...", runtime.runtime_name()));

    let observations = match observe_containers(runtime.as_ref()).await {
        Ok(observations) => observations,
        Err(e) => {
            spinner.stop_error("Failed to list containers");
            return Err(e);
        }
    };

    spinner.message(&format!("Checking {} container(s)...", observations.len()));

    let registry = Registry::from_config(&config.registry);
    let (results, lookups) = tokio::task::spawn_blocking(move || {
        let mut checker = FreshnessChecker::new(registry);
        checker.run(&observations);
        let lookups = checker.lookups();
        (checker.into_results(), lookups)
    })
    .await
    .map_err(|e| ImgfreshError::User(format!("Check task failed: {}", e)))?;

    spinner.stop(&format!("Checked {} container(s)", results.len()));
    debug!("{} distinct registry lookup(s)", lookups);

    let report = Report::new(results);
    report.print(config.output.format)?;

    if let Some(ref path) = config.output.path {
        report.write_json(path).await?;
        ui::step_ok_detail(&ctx, "Report written", &path.display().to_string());
    }

    Ok(())
}

/// Command-line flags win over file values
fn apply_overrides(config: &Config, args: CheckArgs) -> Config {
    let mut config = config.clone();

    if let Some(token) = args.ghcr_token.filter(|t| !t.trim().is_empty()) {
        config.registry.ghcr_token = Some(token);
    }
    if let Some(path) = args.output {
        config.output.path = Some(path);
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(runtime) = args.runtime {
        config.runtime.command = runtime;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::OutputFormat;
    use std::path::PathBuf;

    fn args() -> CheckArgs {
        CheckArgs {
            ghcr_token: None,
            output: None,
            format: None,
            runtime: None,
        }
    }

    #[test]
    fn no_flags_keep_file_values() {
        let mut file = Config::default();
        file.registry.ghcr_token = Some("ghp_file".to_string());
        file.runtime.command = "podman".to_string();

        let config = apply_overrides(&file, args());
        assert_eq!(config.registry.ghcr_token.as_deref(), Some("ghp_file"));
        assert_eq!(config.runtime.command, "podman");
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn flags_override_file_values() {
        let mut file = Config::default();
        file.registry.ghcr_token = Some("ghp_file".to_string());

        let config = apply_overrides(
            &file,
            CheckArgs {
                ghcr_token: Some("ghp_flag".to_string()),
                output: Some(PathBuf::from("out.json")),
                format: Some(OutputFormat::Json),
                runtime: Some("podman".to_string()),
            },
        );

        assert_eq!(config.registry.ghcr_token.as_deref(), Some("ghp_flag"));
        assert_eq!(config.output.path, Some(PathBuf::from("out.json")));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.runtime.command, "podman");
    }

    #[test]
    fn blank_token_flag_is_ignored() {
        let mut file = Config::default();
        file.registry.ghcr_token = Some("ghp_file".to_string());

        let mut flags = args();
        flags.ghcr_token = Some("  ".to_string());

        let config = apply_overrides(&file, flags);
        assert_eq!(config.registry.ghcr_token.as_deref(), Some("ghp_file"));
    }
}
