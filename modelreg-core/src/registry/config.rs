//! Registry options and the optional YAML config file
//!
//! Options are built in code with [`RegistryOptions`] or read from a
//! `config.yaml` such as:
//!
//! ```yaml
//! auto_update: true
//! check_interval_secs: 3600
//! providers:
//!   - name: openai
//!     api_key: sk-...
//!   - name: acme
//!     base_url: https://llm.acme.internal
//!     models:
//!       m1:
//!         name: m1
//!         apis:
//!           chat_completion:
//!             context: { max_input: 1000, max_output: 500 }
//!             parameters: { max_tokens: 100 }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::Provider;
use crate::update::Updater;

/// Interval between background update checks unless configured otherwise
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Config file name inside the config directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Construction options for [`Registry`](super::Registry)
#[derive(Clone)]
pub struct RegistryOptions {
    /// Local data directory; created if absent. Required.
    pub config_dir: PathBuf,

    /// Run the background refresh loop
    pub auto_update: bool,

    /// Time between background update checks; zero means the default
    pub check_interval: Duration,

    /// Caller overrides, folded into every snapshot in this order
    pub custom_providers: Vec<Provider>,

    /// Release updater; `None` selects the default for this build
    pub updater: Option<Arc<dyn Updater>>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::new(),
            auto_update: false,
            check_interval: DEFAULT_CHECK_INTERVAL,
            custom_providers: Vec::new(),
            updater: None,
        }
    }
}

impl fmt::Debug for RegistryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let custom: Vec<&str> = self
            .custom_providers
            .iter()
            .map(|p| p.name.as_str())
            .collect();

        f.debug_struct("RegistryOptions")
            .field("config_dir", &self.config_dir)
            .field("auto_update", &self.auto_update)
            .field("check_interval", &self.check_interval)
            .field("custom_providers", &custom)
            .field("updater", &self.updater.as_ref().map(|u| u.name()))
            .finish()
    }
}

impl RegistryOptions {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_auto_update(mut self, enabled: bool) -> Self {
        self.auto_update = enabled;
        self
    }

    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    pub fn with_custom_provider(mut self, provider: Provider) -> Self {
        self.custom_providers.push(provider);
        self
    }

    pub fn with_updater(mut self, updater: Arc<dyn Updater>) -> Self {
        self.updater = Some(updater);
        self
    }

    /// Check interval with zero replaced by [`DEFAULT_CHECK_INTERVAL`]
    pub fn effective_check_interval(&self) -> Duration {
        if self.check_interval.is_zero() {
            DEFAULT_CHECK_INTERVAL
        } else {
            self.check_interval
        }
    }

    /// Per-user config directory, e.g. `~/.config/modelreg` on Linux
    pub fn default_config_dir() -> Result<PathBuf> {
        directories::ProjectDirs::from("", "", "modelreg")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .or_else(|| dirs::config_dir().map(|d| d.join("modelreg")))
            .context("Could not determine config directory")
    }
}

/// On-disk form of [`RegistryOptions`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfigFile {
    pub auto_update: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_interval_secs: Option<u64>,

    /// Custom providers, applied in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<Provider>,
}

impl RegistryConfigFile {
    /// Read a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut config: Self = serde_yaml_ng::from_str(content)?;
        for provider in &mut config.providers {
            provider.relink_models();
        }
        Ok(config)
    }

    pub fn into_options(self, config_dir: impl Into<PathBuf>) -> RegistryOptions {
        RegistryOptions {
            config_dir: config_dir.into(),
            auto_update: self.auto_update,
            check_interval: self
                .check_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CHECK_INTERVAL),
            custom_providers: self.providers,
            updater: None,
        }
    }
}
