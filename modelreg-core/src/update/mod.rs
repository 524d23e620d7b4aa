//! Release updater - keeps the local catalog data current
//!
//! An [`Updater`] checks whether a newer data release exists and, if so,
//! replaces `<config_dir>/providers/` with it. Every completed check is
//! recorded in `<config_dir>/metadata.json`, including checks that found the
//! local data already current.

mod metadata;

#[cfg(feature = "remote")]
mod github;

pub use metadata::{local_version, Metadata, METADATA_FILE};

#[cfg(feature = "remote")]
pub use github::{GithubReleaseUpdater, DEFAULT_RELEASE_OWNER, DEFAULT_RELEASE_REPO};

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of one successful update check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Local data already matches the latest release
    AlreadyCurrent { version: String },
    /// A newer release was downloaded and installed
    Updated { from: String, to: String },
}

impl UpdateOutcome {
    /// Version the local data is at after the check
    pub fn version(&self) -> &str {
        match self {
            UpdateOutcome::AlreadyCurrent { version } => version,
            UpdateOutcome::Updated { to, .. } => to,
        }
    }
}

impl fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateOutcome::AlreadyCurrent { version } => write!(f, "already at {version}"),
            UpdateOutcome::Updated { from, to } => write!(f, "updated {from} -> {to}"),
        }
    }
}

/// Source of catalog data releases
///
/// Implementations own their network timeouts; the registry never cancels
/// an update in flight.
#[async_trait]
pub trait Updater: Send + Sync {
    /// Bring the local data directory up to the latest release
    async fn update(&self) -> Result<UpdateOutcome>;

    /// Updater identifier for logging
    fn name(&self) -> &'static str;
}

/// Updater that never downloads anything
///
/// Still records the check in `metadata.json`.
#[derive(Debug, Clone)]
pub struct NoopUpdater {
    config_dir: PathBuf,
}

impl NoopUpdater {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }
}

#[async_trait]
impl Updater for NoopUpdater {
    async fn update(&self) -> Result<UpdateOutcome> {
        let version = local_version(&self.config_dir);
        if let Err(e) = Metadata::now(version.as_str()).save(&self.config_dir) {
            tracing::warn!("Failed to record catalog version {}: {:#}", version, e);
        }
        Ok(UpdateOutcome::AlreadyCurrent { version })
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}

/// The updater used when the caller does not supply one
#[cfg(feature = "remote")]
pub fn default_updater(config_dir: &Path) -> Result<Arc<dyn Updater>> {
    Ok(Arc::new(GithubReleaseUpdater::new(config_dir)?))
}

/// The updater used when the caller does not supply one
#[cfg(not(feature = "remote"))]
pub fn default_updater(config_dir: &Path) -> Result<Arc<dyn Updater>> {
    tracing::debug!("Built without the 'remote' feature; release updates are disabled");
    Ok(Arc::new(NoopUpdater::new(config_dir)))
}
