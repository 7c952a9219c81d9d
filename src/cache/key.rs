//! Key addressing
//!
//! Maps an arbitrary serializable key to a stable entry identity: the key is
//! encoded canonically, digested with SHA-1 and hex encoded in uppercase.
//! Same key value = same file, in every process.

use super::canonical;
use super::handle::Memo;
use crate::error::{MemoError, MemoResult};
use serde::Serialize;
use sha1::{Digest, Sha1};
use std::path::PathBuf;

/// Length of an entry identity in hex characters (160-bit digest)
pub const IDENTITY_LEN: usize = 40;

/// Encode a key into canonical bytes
///
/// Map entries are sorted, so `HashMap`-shaped keys encode identically no
/// matter their iteration order. Map keys may be composite values.
pub fn canonical_bytes<K: Serialize + ?Sized>(key: &K) -> MemoResult<Vec<u8>> {
    canonical::encode(key).map_err(MemoError::KeyEncoding)
}

/// Compute the 40-character uppercase hex identity of a key
pub fn compute_identity<K: Serialize + ?Sized>(key: &K) -> MemoResult<String> {
    let bytes = canonical_bytes(key)?;

    let mut hasher = Sha1::new();
    hasher.update(&bytes);
    let digest = hasher.finalize();

    Ok(hex::encode_upper(digest))
}

/// Check whether a file name looks like an entry identity
pub fn is_identity(name: &str) -> bool {
    name.len() == IDENTITY_LEN
        && name
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}

impl Memo {
    /// Path of the file holding the entry for `key`
    ///
    /// Fails with `InvalidVersion` when the version is not a single path
    /// segment, so the returned path always stays under the base dir.
    pub fn location_of<K: Serialize + ?Sized>(&self, key: &K) -> MemoResult<PathBuf> {
        self.version().validate()?;
        Ok(self.partition_dir().join(compute_identity(key)?))
    }
}
