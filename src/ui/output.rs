//! Status lines printed by the cache commands
//!
//! Data (`get`, `key`, `path`, `list`) goes straight to stdout. These helpers
//! are only for the one-line reports about what a command did to the cache.

use super::context::UiContext;
use console::style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Done,
    Notice,
    Info,
}

impl Level {
    fn plain_tag(self) -> String {
        match self {
            Self::Done => style("[OK]").green().to_string(),
            Self::Notice => style("[WARN]").yellow().to_string(),
            Self::Info => style("[INFO]").cyan().to_string(),
        }
    }
}

fn emit(ctx: &UiContext, level: Level, line: String) {
    if !ctx.is_styled() {
        println!("  {} {}", level.plain_tag(), line);
        return;
    }

    // Write errors on the styled terminal are dropped
    let _ = match level {
        Level::Done => cliclack::log::success(line),
        Level::Notice => cliclack::log::warning(line),
        Level::Info => cliclack::log::info(line),
    };
}

/// Report a completed cache change, e.g. "Removed 3 entries"
pub fn done(ctx: &UiContext, message: &str) {
    emit(ctx, Level::Done, message.to_string());
}

/// Report a completed change together with the file it touched
pub fn done_at(ctx: &UiContext, message: &str, location: &str) {
    let location = if ctx.is_styled() {
        style(location).dim().to_string()
    } else {
        location.to_string()
    };
    emit(ctx, Level::Done, format!("{} ({})", message, location));
}

/// Report that nothing happened and what the user can do about it
pub fn notice(ctx: &UiContext, message: &str, remedy: &str) {
    let remedy = if ctx.is_styled() {
        style(remedy).dim().to_string()
    } else {
        remedy.to_string()
    };
    emit(ctx, Level::Notice, format!("{} - {}", message, remedy));
}

pub fn info(ctx: &UiContext, message: &str) {
    emit(ctx, Level::Info, message.to_string());
}
