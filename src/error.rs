//! Error types for filememo
//!
//! All modules use `MemoResult<T>` as their return type. A cache miss is
//! never an error; see [`crate::cache::Lookup`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for filememo operations
pub type MemoResult<T> = Result<T, MemoError>;

/// All errors that can occur in filememo
#[derive(Error, Debug)]
pub enum MemoError {
    // Addressing errors
    #[error("Cache key cannot be encoded: {0}")]
    KeyEncoding(#[source] crate::cache::EncodeError),

    #[error("Invalid cache version {version:?}: {reason}")]
    InvalidVersion { version: String, reason: String },

    // Protocol errors
    #[error("{protocol} received an unsupported decision: {decision}")]
    ProtocolViolation {
        protocol: &'static str,
        decision: String,
    },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("Entry encoding error: {0}")]
    Encode(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

impl MemoError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a protocol violation for a decision the protocol does not accept
    pub fn protocol(protocol: &'static str, decision: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            protocol,
            decision: decision.into(),
        }
    }

    /// Whether the error is a caller bug rather than an environment failure
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            Self::ProtocolViolation { .. } | Self::KeyEncoding(_) | Self::InvalidVersion { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidVersion { .. } => {
                Some("Use a version without path separators, e.g. --cache-version 2")
            }
            Self::ConfigInvalid { .. } => Some("Run: filememo config init --force"),
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied => {
                Some("Check permissions on the cache directory or pass --dir")
            }
            _ => None,
        }
    }
}
