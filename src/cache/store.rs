//! Storage primitives: fetch, store and partition maintenance
//!
//! Every call opens and closes its own file; nothing is kept between calls.
//! Writes go to a temp file in the partition and are renamed over the entry,
//! so a reader sees either the old value or the new one.
//!
//! Entries are encoded with bincode using fixed-width integers. Trailing
//! bytes after a value are rejected, so a short read never decodes.

use super::handle::Memo;
use super::key::{compute_identity, is_identity};
use crate::error::{MemoError, MemoResult};
use bincode::Options;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Result of a cache lookup
///
/// A missing entry and an entry that cannot be decoded are both `Miss`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// A stored value was found and decoded
    Hit(T),
    /// Nothing usable is stored for the key
    Miss,
}

impl<T> Lookup<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss)
    }

    /// Convert into an `Option`, `Miss` becoming `None`
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss => None,
        }
    }
}

impl<T> From<Lookup<T>> for Option<T> {
    fn from(lookup: Lookup<T>) -> Self {
        lookup.into_option()
    }
}

/// A file found in a partition directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// 40-character hex identity (the file name)
    pub identity: String,
    /// Full path to the entry file
    pub path: PathBuf,
    /// Size of the serialized value in bytes
    pub size: u64,
    /// Last write time
    pub modified: DateTime<Utc>,
}

impl Memo {
    /// Look up the value stored for `key`
    ///
    /// Returns `Miss` when the handle is disabled (without touching the
    /// filesystem), when no entry exists, or when the entry cannot be decoded
    /// as `T`. Any other read failure is an error.
    pub fn fetch<T, K>(&self, key: &K) -> MemoResult<Lookup<T>>
    where
        T: DeserializeOwned,
        K: Serialize + ?Sized,
    {
        if !self.is_enabled() {
            return Ok(Lookup::Miss);
        }
        let path = self.location_of(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Cache miss: {}", path.display());
                return Ok(Lookup::Miss);
            }
            Err(e) => {
                return Err(MemoError::io(
                    format!("reading cache entry {}", path.display()),
                    e,
                ))
            }
        };

        match decode_value(&bytes) {
            Ok(value) => {
                debug!("Cache hit: {}", path.display());
                Ok(Lookup::Hit(value))
            }
            Err(e) => {
                warn!(
                    "Ignoring unreadable cache entry {}: {}",
                    path.display(),
                    e
                );
                Ok(Lookup::Miss)
            }
        }
    }

    /// Persist `value` as the entry for `key`, replacing any previous value
    ///
    /// A disabled handle does nothing and never creates the partition.
    pub fn store<K, V>(&self, key: &K, value: &V) -> MemoResult<()>
    where
        K: Serialize + ?Sized,
        V: Serialize + ?Sized,
    {
        if !self.is_enabled() {
            return Ok(());
        }
        let content = encode_value(value)?;
        self.store_encoded(key, &content)
    }

    /// Write already encoded entry bytes for `key`
    pub(super) fn store_encoded<K>(&self, key: &K, content: &[u8]) -> MemoResult<()>
    where
        K: Serialize + ?Sized,
    {
        if !self.is_enabled() {
            return Ok(());
        }
        self.version().validate()?;

        let identity = compute_identity(key)?;

        let dir = self.partition_dir();
        fs::create_dir_all(&dir)
            .map_err(|e| MemoError::io(format!("creating cache directory {}", dir.display()), e))?;

        let path = dir.join(&identity);
        write_atomic(&dir, &identity, &path, content)?;

        debug!("Cached {} bytes at {}", content.len(), path.display());
        Ok(())
    }

    /// Delete the entry for `key`, returning whether one existed
    pub fn remove<K: Serialize + ?Sized>(&self, key: &K) -> MemoResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let path = self.location_of(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed cache entry {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(MemoError::io(
                format!("removing cache entry {}", path.display()),
                e,
            )),
        }
    }

    /// Delete every entry in this handle's partition, returning how many were removed
    ///
    /// Leftover temp files from interrupted writes are removed as well but
    /// not counted. Other files in the partition are left alone.
    pub fn clear(&self) -> MemoResult<usize> {
        if !self.is_enabled() {
            return Ok(0);
        }
        self.version().validate()?;

        let dir = self.partition_dir();
        let Some(names) = partition_files(&dir)? else {
            return Ok(0);
        };

        let mut removed = 0;
        for (name, path) in names {
            let is_entry = is_identity(&name);
            if !is_entry && !is_temp_file(&name) {
                continue;
            }
            fs::remove_file(&path)
                .map_err(|e| MemoError::io(format!("removing {}", path.display()), e))?;
            if is_entry {
                removed += 1;
            }
        }

        info!("Cleared {} cache entries from {}", removed, dir.display());
        Ok(removed)
    }

    /// List the entries stored in this handle's partition, sorted by identity
    ///
    /// Listing is an inspection of the directory and works on disabled
    /// handles too.
    pub fn entries(&self) -> MemoResult<Vec<EntryInfo>> {
        self.version().validate()?;

        let dir = self.partition_dir();
        let Some(names) = partition_files(&dir)? else {
            return Ok(Vec::new());
        };

        let mut entries = Vec::new();
        for (name, path) in names {
            if !is_identity(&name) {
                continue;
            }
            let metadata = fs::metadata(&path)
                .map_err(|e| MemoError::io(format!("reading metadata of {}", path.display()), e))?;
            let modified = metadata
                .modified()
                .map_err(|e| MemoError::io(format!("reading mtime of {}", path.display()), e))?;

            entries.push(EntryInfo {
                identity: name,
                path,
                size: metadata.len(),
                modified: DateTime::<Utc>::from(modified),
            });
        }

        entries.sort_by(|a, b| a.identity.cmp(&b.identity));
        Ok(entries)
    }
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new().with_fixint_encoding()
}

/// Encode a value into entry bytes
pub(super) fn encode_value<V: Serialize + ?Sized>(value: &V) -> MemoResult<Vec<u8>> {
    Ok(codec().serialize(value)?)
}

/// Decode entry bytes, failing on any leftover input
pub(super) fn decode_value<T: DeserializeOwned>(bytes: &[u8]) -> bincode::Result<T> {
    codec().deserialize(bytes)
}

/// Regular files in a partition as `(name, path)`, or `None` if the partition doesn't exist
fn partition_files(dir: &Path) -> MemoResult<Option<Vec<(String, PathBuf)>>> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(MemoError::io(
                format!("reading cache directory {}", dir.display()),
                e,
            ))
        }
    };

    let mut files = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| MemoError::io("reading cache directory entry", e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| MemoError::io("reading cache directory entry", e))?;
        if !file_type.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            files.push((name.to_string(), entry.path()));
        }
    }
    Ok(Some(files))
}

fn is_temp_file(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(".tmp")
}

/// Write `content` to a unique temp file in `dir` and rename it over `path`
fn write_atomic(dir: &Path, identity: &str, path: &Path, content: &[u8]) -> MemoResult<()> {
    let temp_path = dir.join(format!(".{}.{}.tmp", identity, Uuid::new_v4().simple()));

    fs::write(&temp_path, content)
        .map_err(|e| MemoError::io(format!("writing temp file {}", temp_path.display()), e))?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(MemoError::io(
            format!("replacing cache entry {}", path.display()),
            e,
        ));
    }

    Ok(())
}
