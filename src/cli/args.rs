//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// filememo - inspect and manage a filesystem memoization cache
///
/// Keys are parsed as JSON when possible and used as plain strings
/// otherwise, so `filememo get user` and `filememo get '"user"'` address the
/// same entry. Values written by `set` are stored as strings.
#[derive(Parser, Debug)]
#[command(name = "filememo")]
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
    #[arg(short, long, global = true, env = "FILEMEMO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Cache base directory (overrides config)
    #[arg(long, global = true, env = "FILEMEMO_DIR")]
    pub dir: Option<PathBuf>,

    /// Cache version partition (overrides config)
    #[arg(long, global = true, env = "FILEMEMO_VERSION")]
    pub cache_version: Option<String>,

    /// Treat the cache as disabled: lookups miss, writes are skipped
    #[arg(long, global = true)]
    pub disabled: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the partition directory for the current version
    Path,

    /// Print the identity and file location of a key
    Key(KeyArgs),

    /// Print the cached string value of a key
    Get(KeyArgs),

    /// Store a string value under a key
    Set(SetArgs),

    /// Remove the entry of a key
    Rm(KeyArgs),

    /// List entries in the current partition
    List(ListArgs),

    /// Remove all entries in the current partition
    Clear(ClearArgs),

    /// Show or edit configuration
    Config(ConfigArgs),
}

/// Arguments for commands addressing a single key
#[derive(Parser, Debug)]
pub struct KeyArgs {
    /// Cache key (JSON, or a plain string)
    pub key: String,
}

/// Arguments for the set command
#[derive(Parser, Debug)]
pub struct SetArgs {
    /// Cache key (JSON, or a plain string)
    pub key: String,

    /// Value to store, kept verbatim as a string
    pub value: String,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the clear command
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Output format for list command
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Config subcommand
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
}
