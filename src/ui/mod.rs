//! Terminal output for the `filememo` binary
//!
//! Uses `cliclack` styling in an interactive terminal and plain prefixed
//! lines otherwise (pipes, CI).

mod context;
mod output;
mod prompts;

pub use context::UiContext;
pub use output::{done, done_at, info, notice};
pub use prompts::confirm;
