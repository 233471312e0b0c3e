//! imgfresh - Container image freshness checker
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use imgfresh::cli::{Cli, Commands};
use imgfresh::config::{Config, ConfigManager};
use imgfresh::error::ImgfreshResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ImgfreshResult<()> {
    let cli = Cli::parse();

    // Completions need neither config nor logging
    if let Commands::Completions { shell } = cli.command {
        return imgfresh::cli::commands::completions(shell);
    }

    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config);
    debug!("Using config {}", config_manager.path().display());

    match cli.command {
        Commands::Completions { .. } => unreachable!("Completions handled above"),
        Commands::Check(args) => imgfresh::cli::commands::check(args, &config).await,
        Commands::Resolve(args) => imgfresh::cli::commands::resolve(args, &config).await,
        Commands::Config(args) => {
            imgfresh::cli::commands::config(args, &config, &config_manager).await
        }
    }
}

/// 0 = warn, 1 = info, 2+ = debug; logs go to stderr
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("imgfresh=warn"),
        1 => EnvFilter::new("imgfresh=info"),
        _ => EnvFilter::new("imgfresh=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
