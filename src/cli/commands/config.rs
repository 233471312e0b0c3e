//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{ImgfreshError, ImgfreshResult};
use crate::orchestration::RuntimeKind;
use crate::report::OutputFormat;
use crate::ui::{self, UiContext};
use clap::ValueEnum;
use std::path::PathBuf;

const VALID_KEYS: [&str; 8] = [
    "general.log_format",
    "runtime.command",
    "registry.ghcr_token",
    "registry.timeout_secs",
    "registry.docker_hub_url",
    "registry.github_api_url",
    "output.format",
    "output.path",
];

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
) -> ImgfreshResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            let mut config = config.clone();
            set_value(&mut config, &key, &value)?;
            manager.save(&config).await?;

            let shown = if key == "registry.ghcr_token" {
                "********"
            } else {
                value.as_str()
            };
            ui::step_ok(&UiContext::detect(), &format!("Set {} = {}", key, shown));
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> ImgfreshResult<()> {
    println!("{}", toml::to_string_pretty(&config.redacted())?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> ImgfreshResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());

    Ok(())
}

/// Apply one dot-separated key to the configuration
fn set_value(config: &mut Config, key: &str, value: &str) -> ImgfreshResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => match value {
            "text" | "json" => config.general.log_format = value.to_string(),
            _ => return Err(invalid(key, value, "expected text or json")),
        },

        ["runtime", "command"] => {
            if RuntimeKind::from_command(value).is_none() {
                return Err(invalid(key, value, "expected docker or podman"));
            }
            config.runtime.command = value.to_string();
        }

        ["registry", "ghcr_token"] => {
            config.registry.ghcr_token = Some(value.trim().to_string()).filter(|t| !t.is_empty())
        }
        ["registry", "timeout_secs"] => {
            config.registry.timeout_secs = value
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| invalid(key, value, "expected a positive number of seconds"))?
        }
        ["registry", "docker_hub_url"] => config.registry.docker_hub_url = url(key, value)?,
        ["registry", "github_api_url"] => config.registry.github_api_url = url(key, value)?,

        ["output", "format"] => {
            config.output.format = OutputFormat::from_str(value, true)
                .map_err(|_| invalid(key, value, "expected table, json or plain"))?
        }
        ["output", "path"] => {
            config.output.path = Some(value.trim())
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
        }

        _ => {
            return Err(ImgfreshError::User(format!(
                "Unknown config key '{}'. Valid keys: {}",
                key,
                VALID_KEYS.join(", ")
            )))
        }
    }

    Ok(())
}

fn url(key: &str, value: &str) -> ImgfreshResult<String> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(invalid(key, value, "expected an http(s) URL"))
    }
}

fn invalid(key: &str, value: &str, expected: &str) -> ImgfreshError {
    ImgfreshError::User(format!("Invalid value '{}' for {}: {}", value, key, expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn set_known_keys() {
        let mut config = Config::default();

        set_value(&mut config, "runtime.command", "podman").unwrap();
        set_value(&mut config, "registry.timeout_secs", "5").unwrap();
        set_value(&mut config, "output.format", "JSON").unwrap();
        set_value(&mut config, "output.path", "/tmp/fresh.json").unwrap();
        set_value(&mut config, "registry.github_api_url", "https://ghe.local/api/v3/").unwrap();

        assert_eq!(config.runtime.command, "podman");
        assert_eq!(config.registry.timeout_secs, 5);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.path, Some(PathBuf::from("/tmp/fresh.json")));
        assert_eq!(config.registry.github_api_url, "https://ghe.local/api/v3");
    }

    #[test]
    fn empty_token_clears_it() {
        let mut config = Config::default();
        set_value(&mut config, "registry.ghcr_token", "ghp_abc").unwrap();
        assert_eq!(config.registry.ghcr_token.as_deref(), Some("ghp_abc"));

        set_value(&mut config, "registry.ghcr_token", "").unwrap();
        assert!(config.registry.ghcr_token.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = Config::default();
        assert!(set_value(&mut config, "runtime.command", "lxc").is_err());
        assert!(set_value(&mut config, "registry.timeout_secs", "0").is_err());
        assert!(set_value(&mut config, "registry.timeout_secs", "soon").is_err());
        assert!(set_value(&mut config, "output.format", "yaml").is_err());
        assert!(set_value(&mut config, "general.log_format", "xml").is_err());
        assert!(set_value(&mut config, "registry.docker_hub_url", "hub.local").is_err());
    }

    #[test]
    fn rejects_unknown_key() {
        let err = set_value(&mut Config::default(), "vm.name", "x").unwrap_err();
        assert!(err.to_string().contains("runtime.command"));
    }

    #[tokio::test]
    async fn init_does_not_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[runtime]\ncommand = \"podman\"\n").unwrap();
        let manager = ConfigManager::with_path(path.clone());

        init_config(&manager, false).await.unwrap();
        assert_eq!(manager.load().await.unwrap().runtime.command, "podman");

        init_config(&manager, true).await.unwrap();
        assert_eq!(manager.load().await.unwrap().runtime.command, "docker");
    }
}
