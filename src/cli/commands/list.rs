//! List command - show entries in the current partition

use crate::cache::{EntryInfo, Memo};
use crate::cli::args::{ListArgs, OutputFormat};
use crate::error::MemoResult;
use crate::ui::{self, UiContext};
use console::style;

/// Execute the list command
pub fn execute(args: ListArgs, memo: &Memo) -> MemoResult<()> {
    let entries = memo.entries()?;

    if entries.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::info(
                    &ctx,
                    &format!("No entries in {}", memo.partition_dir().display()),
                );
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&entries),
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Plain => print_plain(&entries),
    }

    Ok(())
}

fn print_table(entries: &[EntryInfo]) {
    println!(
        "{:<42} {:>10} {:<20}",
        style("IDENTITY").bold(),
        style("SIZE").bold(),
        style("MODIFIED").bold()
    );
    println!("{}", "-".repeat(74));

    for entry in entries {
        println!(
            "{:<42} {:>10} {:<20}",
            entry.identity,
            format_size(entry.size),
            entry.modified.format("%Y-%m-%d %H:%M")
        );
    }

    let total: u64 = entries.iter().map(|e| e.size).sum();
    println!();
    println!("Total: {} entries, {}", entries.len(), format_size(total));
}

fn print_json(entries: &[EntryInfo]) -> MemoResult<()> {
    #[derive(serde::Serialize)]
    struct EntryJson<'a> {
        identity: &'a str,
        path: String,
        size: u64,
        modified: String,
    }

    let json_entries: Vec<EntryJson<'_>> = entries
        .iter()
        .map(|e| EntryJson {
            identity: &e.identity,
            path: e.path.display().to_string(),
            size: e.size,
            modified: e.modified.to_rfc3339(),
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json_entries)?);
    Ok(())
}

fn print_plain(entries: &[EntryInfo]) {
    for entry in entries {
        println!("{}", entry.identity);
    }
}

fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;

    if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}
