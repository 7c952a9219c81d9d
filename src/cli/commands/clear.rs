//! Clear command - remove every entry in the current partition

use crate::cache::Memo;
use crate::cli::args::ClearArgs;
use crate::error::MemoResult;
use crate::ui::{self, UiContext};

/// Execute the clear command
pub fn execute(args: ClearArgs, memo: &Memo) -> MemoResult<()> {
    let ctx = UiContext::detect().assume_yes(args.yes);
    let dir = memo.partition_dir();

    if !memo.is_enabled() {
        ui::notice(&ctx, "Cache is disabled, nothing removed", "Drop --disabled");
        return Ok(());
    }

    let count = memo.entries()?.len();
    if count == 0 {
        ui::info(&ctx, &format!("No entries in {}", dir.display()));
        return Ok(());
    }

    let prompt = format!("Remove {} entries from {}?", count, dir.display());
    if !ui::confirm(&ctx, &prompt, false)? {
        ui::notice(&ctx, "Clear cancelled", "Pass --yes to skip confirmation");
        return Ok(());
    }

    let removed = memo.clear()?;
    ui::done(&ctx, &format!("Removed {} entries", removed));
    Ok(())
}
