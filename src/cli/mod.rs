//! Command-line interface for inspecting a cache from the shell

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};

use crate::cache::{Memo, Version};
use crate::config::Config;
use serde_json::Value;

/// Build the cache handle from config, then apply command-line overrides
pub fn resolve_memo(cli: &Cli, config: &Config) -> Memo {
    let mut memo = Memo::from_config(&config.cache);

    if let Some(ref dir) = cli.dir {
        memo = memo.with_base_dir(dir.clone());
    }
    if let Some(ref version) = cli.cache_version {
        memo = memo.with_version(parse_version(version));
    }
    if cli.disabled {
        memo = memo.with_enabled(false);
    }

    memo
}

/// Numeric strings become numeric versions, anything else a named version
pub fn parse_version(raw: &str) -> Version {
    raw.parse::<u64>()
        .map(Version::Number)
        .unwrap_or_else(|_| Version::Name(raw.to_string()))
}

/// Parse a key argument as JSON, falling back to a plain string
pub fn parse_json_arg(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
