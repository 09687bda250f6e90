//! nsadmin - JSON storage admin console
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use nsadmin::cli::{commands, Cli, Commands};
use nsadmin::config::{Config, ConfigManager, LogFormat};
use nsadmin::error::NsAdminResult;
use nsadmin::ui;
use std::process::ExitCode;
use tracing::{debug, warn};
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

async fn run() -> NsAdminResult<()> {
    let cli = Cli::parse();

    // Completions need neither config nor logging
    if let Commands::Completions(ref args) = cli.command {
        commands::completions(args);
        return Ok(());
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    // The log format lives in the config file, so logging starts once the
    // file has been read and before its outcome is reported.
    let loaded = config_manager.load().await;
    let log_format = loaded
        .as_ref()
        .map(|config| config.general.log_format)
        .unwrap_or_default();
    init_logging(cli.verbose, log_format);
    ui::init_theme();

    let mut config = match loaded {
        Ok(config) if config_manager.exists() => {
            debug!("Loaded config from {}", config_manager.path().display());
            config
        }
        Ok(config) => {
            debug!(
                "No config at {}, using defaults",
                config_manager.path().display()
            );
            config
        }
        Err(e) if cli.command.replaces_config() => {
            warn!("Replacing unreadable config: {}", e);
            Config::default()
        }
        Err(e) => return Err(e),
    };

    if let Some(url) = cli.api_url {
        debug!("API URL overridden: {}", url);
        config.api.base_url = url;
    }

    match cli.command {
        Commands::Completions(_) => unreachable!("Completions handled above"),
        Commands::Namespaces(args) => commands::namespaces(args, &config).await,
        Commands::Config(args) => commands::config(args, &config_manager, &config).await,
    }
}

/// 0 = warn, 1 = info, 2+ = debug. Logs go to stderr to keep stdout parseable.
fn init_logging(verbose: u8, log_format: LogFormat) {
    let filter = match verbose {
        0 => EnvFilter::new("nsadmin=warn"),
        1 => EnvFilter::new("nsadmin=info"),
        _ => EnvFilter::new("nsadmin=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.without_time().init(),
    }
}
