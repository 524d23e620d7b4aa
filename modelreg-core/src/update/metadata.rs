//! Applied release tracking (`<config_dir>/metadata.json`)
//!
//! Records which release the local data corresponds to and when the remote
//! was last checked, so a restart does not download the same release again.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::{BUNDLED_VERSION, PROVIDERS_DIR};

/// Metadata file name inside the config directory
pub const METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Release tag of the applied data
    pub version: String,
    /// RFC 3339 timestamp of the last completed update check
    pub last_check_at: String,
}

impl Metadata {
    /// Metadata for `version`, checked now
    pub fn now(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            last_check_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn path(config_dir: &Path) -> PathBuf {
        config_dir.join(METADATA_FILE)
    }

    /// Read metadata; `None` if the file is missing or unreadable
    pub fn load(config_dir: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(Self::path(config_dir)).ok()?;
        match serde_json::from_str(&content) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                tracing::debug!("Ignoring unreadable {}: {}", METADATA_FILE, e);
                None
            }
        }
    }

    pub fn save(&self, config_dir: &Path) -> Result<()> {
        let path = Self::path(config_dir);
        let content = serde_json::to_string_pretty(self).context("Failed to serialize metadata")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write metadata: {}", path.display()))?;

        Ok(())
    }
}

/// Version of the data the loader would currently serve.
///
/// Falls back to the bundled version when nothing was recorded, or when the
/// recorded release's files are gone from disk.
pub fn local_version(config_dir: &Path) -> String {
    match Metadata::load(config_dir) {
        Some(metadata)
            if metadata.version == BUNDLED_VERSION
                || config_dir.join(PROVIDERS_DIR).is_dir() =>
        {
            metadata.version
        }
        _ => BUNDLED_VERSION.to_string(),
    }
}
