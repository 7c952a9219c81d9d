//! Configuration schema for filememo
//!
//! Configuration is stored at `~/.config/filememo/config.toml`

use crate::cache::Version;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Cache handle settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Cache handle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Root directory for all partitions (defaults to `<tmp>/filememo`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    /// Partition name, integer or string
    pub version: Version,

    /// When false, lookups always miss and nothing is written
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            version: Version::default(),
            enabled: true,
        }
    }
}
