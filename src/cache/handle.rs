//! The cache handle: base directory, version partition and enabled flag

use crate::config::schema::CacheConfig;
use crate::error::{MemoError, MemoResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Directory name used under the platform temp dir when no base dir is given
pub const DEFAULT_DIR_NAME: &str = "filememo";

/// Opaque partition identifier
///
/// Entries written under one version are invisible to every other version
/// sharing the same base directory. Bumping the version is how callers
/// invalidate a whole cache generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Version {
    /// Numeric version, e.g. `1`
    Number(u64),
    /// Named version, e.g. `"2024-06-schema"`
    Name(String),
}

impl Version {
    /// Check that the version renders to exactly one path segment
    pub fn validate(&self) -> MemoResult<()> {
        let segment = self.to_string();
        let reason = if segment.is_empty() {
            Some("is empty")
        } else if segment == "." || segment == ".." {
            Some("is a relative directory reference")
        } else if segment.contains('/') || segment.contains('\\') {
            Some("contains a path separator")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(MemoError::InvalidVersion {
                version: segment,
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::Number(1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<u64> for Version {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Version {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Version {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Immutable cache handle
///
/// A `Memo` is plain data. It holds no open files and two handles with equal
/// fields are interchangeable. Reconfiguring means building a new handle with
/// the `with_*` methods, which consume `self` and return the new value.
///
/// ```rust,no_run
/// use filememo::{Decision, Memo};
///
/// let memo = Memo::new().with_version(2u64);
/// let answer: u64 = memo.cached(&("expensive", 42), || Decision::Cache(6 * 7))?;
/// # Ok::<(), filememo::MemoError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Memo {
    base_dir: PathBuf,
    version: Version,
    enabled: bool,
}

impl Memo {
    /// Create a handle with the default base dir, version `1`, enabled
    pub fn new() -> Self {
        Self {
            base_dir: Self::default_base_dir(),
            version: Version::default(),
            enabled: true,
        }
    }

    /// Create a handle rooted at a custom base directory
    pub fn with_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::new()
        }
    }

    /// Build a handle from the `[cache]` config section
    pub fn from_config(config: &CacheConfig) -> Self {
        let base_dir = config
            .base_dir
            .clone()
            .unwrap_or_else(Self::default_base_dir);

        Self {
            base_dir,
            version: config.version.clone(),
            enabled: config.enabled,
        }
    }

    /// Default base directory under the platform temp dir
    pub fn default_base_dir() -> PathBuf {
        std::env::temp_dir().join(DEFAULT_DIR_NAME)
    }

    /// Return a copy using a different base directory
    pub fn with_base_dir(self, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..self
        }
    }

    /// Return a copy using a different version partition
    pub fn with_version(self, version: impl Into<Version>) -> Self {
        Self {
            version: version.into(),
            ..self
        }
    }

    /// Return a copy with caching switched on or off
    pub fn with_enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Directory holding every entry of this handle's version
    pub fn partition_dir(&self) -> PathBuf {
        self.base_dir.join(self.version.to_string())
    }
}

impl Default for Memo {
    fn default() -> Self {
        Self::new()
    }
}
