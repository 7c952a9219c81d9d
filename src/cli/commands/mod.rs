//! CLI command implementations

pub mod clear;
pub mod config;
pub mod entry;
pub mod list;

pub use clear::execute as clear;
pub use config::execute as config;
pub use list::execute as list;
