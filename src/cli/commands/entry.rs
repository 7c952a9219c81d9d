//! Single-entry commands: path, key, get, set, rm

use crate::cache::{compute_identity, Lookup, Memo};
use crate::cli::args::{KeyArgs, SetArgs};
use crate::cli::parse_json_arg;
use crate::error::{MemoError, MemoResult};
use crate::ui::{self, UiContext};
use std::fs;

/// Print the partition directory
pub fn path(memo: &Memo) -> MemoResult<()> {
    println!("{}", memo.partition_dir().display());
    Ok(())
}

/// Print identity and location of a key
pub fn key(args: KeyArgs, memo: &Memo) -> MemoResult<()> {
    let key = parse_json_arg(&args.key);
    let location = memo.location_of(&key)?;
    let identity = compute_identity(&key)?;

    println!("{}", identity);
    println!("{}", location.display());
    Ok(())
}

/// Print the cached string value of a key
///
/// Entries are not self-describing, so only string values (as written by
/// `set`) can be printed. Other entries are reported with their size.
pub fn get(args: KeyArgs, memo: &Memo) -> MemoResult<()> {
    let key = parse_json_arg(&args.key);

    if let Lookup::Hit(value) = memo.fetch::<String, _>(&key)? {
        println!("{}", value);
        return Ok(());
    }

    let location = memo.location_of(&key)?;
    match fs::metadata(&location) {
        Ok(metadata) if memo.is_enabled() && metadata.is_file() => {
            Err(MemoError::User(format!(
                "Entry for key {} holds a {}-byte non-string value ({})",
                args.key,
                metadata.len(),
                location.display()
            )))
        }
        _ => Err(MemoError::User(format!(
            "No cached entry for key {}",
            args.key
        ))),
    }
}

/// Store a string value under a key
pub fn set(args: SetArgs, memo: &Memo) -> MemoResult<()> {
    let ctx = UiContext::detect();
    let key = parse_json_arg(&args.key);

    if !memo.is_enabled() {
        ui::notice(&ctx, "Cache is disabled, nothing stored", "Drop --disabled");
        return Ok(());
    }

    memo.store(&key, &args.value)?;
    ui::done_at(
        &ctx,
        "Stored entry",
        &memo.location_of(&key)?.display().to_string(),
    );
    Ok(())
}

/// Remove the entry of a key
pub fn rm(args: KeyArgs, memo: &Memo) -> MemoResult<()> {
    let ctx = UiContext::detect();
    let key = parse_json_arg(&args.key);

    if memo.remove(&key)? {
        ui::done(&ctx, &format!("Removed entry for {}", args.key));
    } else {
        ui::notice(
            &ctx,
            &format!("No cached entry for {}", args.key),
            "Run: filememo list",
        );
    }
    Ok(())
}
