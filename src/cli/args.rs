//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// nsadmin - JSON storage admin console
///
/// Lists the namespaces of a JSON storage service and refreshes them
/// on demand.
#[derive(Parser, Debug)]
#[command(name = "nsadmin")]
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
    #[arg(short, long, global = true, env = "NSADMIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Storage service base URL (overrides api.base_url)
    #[arg(long, global = true, env = "NSADMIN_API_URL")]
    pub api_url: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List namespaces of the storage service
    #[command(visible_alias = "ns")]
    Namespaces(NamespacesArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

impl Commands {
    /// Whether the command writes a fresh config file without reading the
    /// existing one, so it must still run when that file is unreadable
    pub fn replaces_config(&self) -> bool {
        matches!(
            self,
            Commands::Config(ConfigArgs {
                action: Some(ConfigAction::Init { force: true }),
            })
        )
    }
}

/// Arguments for the namespaces command
#[derive(Parser, Debug)]
pub struct NamespacesArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Keep the list open: Enter refreshes, q quits
    #[arg(short, long)]
    pub interactive: bool,
}

/// Output format for the namespace list
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON array
    Json,
    /// One namespace per line
    Plain,
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
    /// Show effective configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., api.base_url)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}
