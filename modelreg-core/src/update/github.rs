//! Updates catalog data from GitHub releases
//!
//! The latest release's source tarball is downloaded and every `.yaml` file
//! below its `providers/` directory is installed into
//! `<config_dir>/providers/`. The new tree is assembled next to the old one
//! and swapped in with a rename, so the loader never sees a half-written
//! directory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use super::metadata::{local_version, Metadata};
use super::{UpdateOutcome, Updater};
use crate::catalog::{DATA_EXTENSION, PROVIDERS_DIR};

/// Organization publishing the catalog data releases
pub const DEFAULT_RELEASE_OWNER: &str = "workpi-ai";

/// Repository publishing the catalog data releases
pub const DEFAULT_RELEASE_REPO: &str = "model-registry";

const GITHUB_API: &str = "https://api.github.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// The fields of a GitHub release we use
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: Option<String>,
    tarball_url: Option<String>,
}

/// Updater backed by the GitHub releases API
pub struct GithubReleaseUpdater {
    client: reqwest::Client,
    config_dir: PathBuf,
    owner: String,
    repo: String,
    api_base: String,
}

impl GithubReleaseUpdater {
    /// Updater for the default release repository
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("modelreg/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            config_dir: config_dir.into(),
            owner: DEFAULT_RELEASE_OWNER.to_string(),
            repo: DEFAULT_RELEASE_REPO.to_string(),
            api_base: GITHUB_API.to_string(),
        })
    }

    /// Pull releases from another repository
    pub fn with_repository(mut self, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        self.owner = owner.into();
        self.repo = repo.into();
        self
    }

    /// Use a different API root (GitHub Enterprise, mirrors)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    async fn latest_release(&self) -> Result<Release> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base, self.owner, self.repo
        );

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .context("Failed to fetch latest release")?;

        if !response.status().is_success() {
            anyhow::bail!("Release lookup failed: HTTP {} for {}", response.status(), url);
        }

        response
            .json()
            .await
            .context("Failed to parse release response")
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        tracing::info!("Downloading catalog release from {}", url);

        let response = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .context("Failed to download release")?;

        if !response.status().is_success() {
            anyhow::bail!("Download failed: HTTP {} for {}", response.status(), url);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read download response")?;

        Ok(bytes.to_vec())
    }

    /// Replace `<config_dir>/providers` with the tarball's provider data
    fn install(&self, tarball: &[u8]) -> Result<usize> {
        std::fs::create_dir_all(&self.config_dir).with_context(|| {
            format!("Failed to create config directory: {}", self.config_dir.display())
        })?;

        let staging = tempfile::Builder::new()
            .prefix(".providers-new-")
            .tempdir_in(&self.config_dir)
            .context("Failed to create staging directory")?;

        let installed = extract_providers(tarball, staging.path())?;
        if installed == 0 {
            anyhow::bail!("Release archive contains no provider data");
        }

        let target = self.config_dir.join(PROVIDERS_DIR);
        let retired = tempfile::Builder::new()
            .prefix(".providers-old-")
            .tempdir_in(&self.config_dir)
            .context("Failed to create staging directory")?;
        let retired_providers = retired.path().join(PROVIDERS_DIR);

        if target.exists() {
            std::fs::rename(&target, &retired_providers)
                .with_context(|| format!("Failed to move aside {}", target.display()))?;
        }

        if let Err(e) = std::fs::rename(staging.path(), &target) {
            if retired_providers.exists() {
                if let Err(restore) = std::fs::rename(&retired_providers, &target) {
                    tracing::error!("Failed to restore {}: {}", target.display(), restore);
                }
            }
            return Err(e).with_context(|| format!("Failed to install {}", target.display()));
        }

        // dropping `retired` removes the previous data; `staging` is already gone
        Ok(installed)
    }

    fn record(&self, version: &str) {
        if let Err(e) = Metadata::now(version).save(&self.config_dir) {
            tracing::warn!("Failed to record catalog version {}: {:#}", version, e);
        }
    }
}

#[async_trait]
impl Updater for GithubReleaseUpdater {
    async fn update(&self) -> Result<UpdateOutcome> {
        let release = self
            .latest_release()
            .await
            .context("Failed to get latest version")?;
        let latest = release
            .tag_name
            .context("Release has no tag name")?;

        let local = local_version(&self.config_dir);
        if latest == local {
            tracing::debug!("Catalog data already at {}", local);
            self.record(&local);
            return Ok(UpdateOutcome::AlreadyCurrent { version: local });
        }

        let url = release
            .tarball_url
            .context("Release has no tarball URL")?;
        let tarball = self.download(&url).await?;
        let installed = self.install(&tarball)?;

        tracing::info!(
            "Installed catalog {} ({} files, was {})",
            latest,
            installed,
            local
        );
        self.record(&latest);

        Ok(UpdateOutcome::Updated {
            from: local,
            to: latest,
        })
    }

    fn name(&self) -> &'static str {
        "github"
    }
}

/// Path of an archive entry relative to its `providers/` directory.
///
/// `None` for entries outside a `providers/` directory, for non-data files,
/// and for paths that could escape the destination.
fn providers_relative(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();

    loop {
        match components.next()? {
            Component::Normal(part) if part == PROVIDERS_DIR => break,
            Component::Normal(_) | Component::CurDir => continue,
            _ => return None,
        }
    }

    let mut relative = PathBuf::new();
    for component in components {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }

    let is_data = relative
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(DATA_EXTENSION));

    is_data.then_some(relative)
}

/// Extract provider data from a gzipped tarball into `dest`
fn extract_providers(tarball: &[u8], dest: &Path) -> Result<usize> {
    let gz_decoder = flate2::read::GzDecoder::new(Cursor::new(tarball));
    let mut archive = tar::Archive::new(gz_decoder);
    let mut installed = 0;

    for entry in archive.entries().context("Failed to read tarball")? {
        let mut entry = entry.context("Failed to read tarball entry")?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry.path().context("Invalid path in tarball")?.into_owned();
        let Some(relative) = providers_relative(&path) else {
            tracing::trace!("Skipping archive entry {}", path.display());
            continue;
        };

        let dest_path = dest.join(&relative);
        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        entry
            .unpack(&dest_path)
            .with_context(|| format!("Failed to extract {}", path.display()))?;
        installed += 1;
    }

    Ok(installed)
}
