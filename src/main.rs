//! filememo - cache inspection CLI
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use filememo::cli::commands::{self, entry};
use filememo::cli::{resolve_memo, Cli, Commands};
use filememo::config::ConfigManager;
use filememo::error::MemoResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
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

fn run() -> MemoResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load()?;

    init_logging(cli.verbose, &config.general.log_format);
    debug!("Using config at {}", config_manager.path().display());

    let memo = resolve_memo(&cli, &config);
    debug!(
        "Cache partition {} (enabled: {})",
        memo.partition_dir().display(),
        memo.is_enabled()
    );

    match cli.command {
        Commands::Path => entry::path(&memo),
        Commands::Key(args) => entry::key(args, &memo),
        Commands::Get(args) => entry::get(args, &memo),
        Commands::Set(args) => entry::set(args, &memo),
        Commands::Rm(args) => entry::rm(args, &memo),
        Commands::List(args) => commands::list(args, &memo),
        Commands::Clear(args) => commands::clear(args, &memo),
        Commands::Config(args) => commands::config(args, &config, &config_manager),
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, log_format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("filememo=warn"),
        1 => EnvFilter::new("filememo=info"),
        _ => EnvFilter::new("filememo=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
