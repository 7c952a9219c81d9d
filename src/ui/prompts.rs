//! Confirmation before destructive cache commands

use super::context::UiContext;
use crate::error::{MemoError, MemoResult};

/// Ask before a destructive cache operation
///
/// Plain contexts never block on stdin and return `default`.
pub fn confirm(ctx: &UiContext, message: &str, default: bool) -> MemoResult<bool> {
    if ctx.answers_yes() {
        println!("  {} yes (--yes)", message);
        return Ok(true);
    }

    if !ctx.is_styled() {
        return Ok(default);
    }

    cliclack::confirm(message)
        .initial_value(default)
        .interact()
        .map_err(|e| MemoError::User(format!("Prompt failed: {}", e)))
}
