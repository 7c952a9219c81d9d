//! Versioned, filesystem-backed memoization
//!
//! Values are stored as bincode files addressed by a SHA-1 digest of the
//! key's canonical encoding:
//!
//! ```text
//! <base_dir>/<version>/<40 uppercase hex chars>
//! ```
//!
//! # Layers
//!
//! | Layer | Module | Description |
//! |-------|--------|-------------|
//! | Encoding | `canonical` | order-independent, lossless key bytes |
//! | Addressing | `key` | key → identity → location, no I/O |
//! | Storage | `store` | fetch/store bytes, corrupted entries read as a miss |
//! | Protocols | `protocol` | `cached`, `cached_ok`, `with_cache` |
//!
//! A [`Memo`] holds no state besides its configuration; every call reads and
//! writes the filesystem directly. Concurrent writers to the same entry are
//! not coordinated, the last rename wins.

pub(crate) mod canonical;
mod handle;
pub mod key;
mod protocol;
mod store;

pub use canonical::EncodeError;
pub use handle::{Memo, Version, DEFAULT_DIR_NAME};
pub use key::{compute_identity, IDENTITY_LEN};
pub use protocol::Decision;
pub use store::{EntryInfo, Lookup};
