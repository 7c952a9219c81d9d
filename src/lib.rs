//! filememo - versioned, filesystem-backed memoization
//!
//! Returns a stored result for a key when one exists, otherwise runs the
//! computation and persists its output according to the generator's
//! [`Decision`]. Entries survive process restarts and live under
//! `<base_dir>/<version>/<SHA-1 of key>`.
//!
//! ```rust,no_run
//! use filememo::{Decision, Memo};
//! use std::collections::BTreeMap;
//!
//! let memo = Memo::new().with_version("scrape-v1");
//!
//! // Compute once, reuse across runs
//! let body: String = memo.cached("https://example.org", || {
//!     Decision::Cache("<html>...</html>".to_string())
//! })?;
//!
//! // Grow a persisted lookup table while returning a richer result
//! let items = ["a", "b"];
//! let upper: Vec<String> = memo.with_cache("upper", BTreeMap::new(), |mut seen: BTreeMap<String, String>| {
//!     let out = items
//!         .iter()
//!         .map(|i| seen.entry(i.to_string()).or_insert_with(|| i.to_uppercase()).clone())
//!         .collect();
//!     Decision::PartialCache { store: seen, value: out }
//! })?;
//! # Ok::<(), filememo::MemoError>(())
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod ui;

pub use cache::{compute_identity, Decision, EncodeError, EntryInfo, Lookup, Memo, Version};
pub use error::{MemoError, MemoResult};
