//! CLI argument definitions using clap derive

use crate::report::OutputFormat;
use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// imgfresh - Container image freshness checker
///
/// Reports, for every container on this host, whether it runs the image
/// currently published under the `latest` tag.
#[derive(Parser, Debug)]
#[command(name = "imgfresh")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "IMGFRESH_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every container against its registry's `latest` image
    Check(CheckArgs),

    /// Resolve a single image reference and print the registry's answer
    Resolve(ResolveArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// GitHub token with read:packages scope, for ghcr.io images
    #[arg(long, env = "GHCR_TOKEN", hide_env_values = true)]
    pub ghcr_token: Option<String>,

    /// Also write the results as JSON to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Console output format
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Container runtime CLI (docker or podman)
    #[arg(long)]
    pub runtime: Option<String>,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Image reference, e.g. `postgres:16.2` or `ghcr.io/owner/app:1.0`
    pub image: String,

    /// Digest of the local image (selects the GHCR version)
    #[arg(long)]
    pub digest: Option<String>,

    /// GitHub token with read:packages scope, for ghcr.io images
    #[arg(long, env = "GHCR_TOKEN", hide_env_values = true)]
    pub ghcr_token: Option<String>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., runtime.command)
        key: String,
        /// Value to set
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn cli_parses_check() {
        std::env::remove_var("GHCR_TOKEN");
        let cli = Cli::parse_from(["imgfresh", "check"]);
        match cli.command {
            Commands::Check(args) => {
                assert!(args.ghcr_token.is_none());
                assert!(args.output.is_none());
                assert!(args.format.is_none());
                assert!(args.runtime.is_none());
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    #[serial]
    fn cli_parses_check_flags() {
        std::env::remove_var("GHCR_TOKEN");
        let cli = Cli::parse_from([
            "imgfresh",
            "check",
            "--ghcr-token",
            "ghp_abc",
            "--output",
            "/tmp/out.json",
            "--format",
            "plain",
            "--runtime",
            "podman",
        ]);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.ghcr_token.as_deref(), Some("ghp_abc"));
                assert_eq!(args.output, Some(PathBuf::from("/tmp/out.json")));
                assert_eq!(args.format, Some(OutputFormat::Plain));
                assert_eq!(args.runtime.as_deref(), Some("podman"));
            }
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    #[serial]
    fn ghcr_token_from_env() {
        std::env::set_var("GHCR_TOKEN", "ghp_env");
        let cli = Cli::parse_from(["imgfresh", "check"]);
        std::env::remove_var("GHCR_TOKEN");

        match cli.command {
            Commands::Check(args) => assert_eq!(args.ghcr_token.as_deref(), Some("ghp_env")),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn cli_parses_resolve() {
        let cli = Cli::parse_from([
            "imgfresh",
            "resolve",
            "ghcr.io/esphome/esphome:2024.6",
            "--digest",
            "sha256:abc",
        ]);
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.image, "ghcr.io/esphome/esphome:2024.6");
                assert_eq!(args.digest.as_deref(), Some("sha256:abc"));
            }
            _ => panic!("expected Resolve command"),
        }
    }

    #[test]
    fn cli_parses_config_init_force() {
        let cli = Cli::parse_from(["imgfresh", "config", "init", "--force"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                action: Some(ConfigAction::Init { force }),
            }) => assert!(force),
            _ => panic!("expected Config Init command"),
        }
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["imgfresh", "config", "set", "runtime.command", "podman"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                action: Some(ConfigAction::Set { key, value }),
            }) => {
                assert_eq!(key, "runtime.command");
                assert_eq!(value, "podman");
            }
            _ => panic!("expected Config Set command"),
        }
    }

    #[test]
    fn cli_parses_completions() {
        let cli = Cli::parse_from(["imgfresh", "completions", "zsh"]);
        assert!(matches!(
            cli.command,
            Commands::Completions { shell: Shell::Zsh }
        ));
    }

    #[test]
    fn cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["imgfresh", "check", "--format", "yaml"]).is_err());
    }

    #[test]
    #[serial]
    fn cli_verbose_levels() {
        std::env::remove_var("GHCR_TOKEN");
        let cli = Cli::parse_from(["imgfresh", "check"]);
        assert_eq!(cli.verbose, 0);

        let cli = Cli::parse_from(["imgfresh", "-v", "check"]);
        assert_eq!(cli.verbose, 1);

        let cli = Cli::parse_from(["imgfresh", "-vv", "check"]);
        assert_eq!(cli.verbose, 2);
    }
}
