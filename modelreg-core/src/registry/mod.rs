//! The live, self-updating provider catalog
//!
//! A [`Registry`] publishes an immutable [`Snapshot`] of every provider.
//! Readers clone the current snapshot pointer and never touch disk or
//! network. A reload builds a complete new snapshot off to the side
//! (load, fold in custom providers, validate) and swaps it in under a brief
//! write lock; any failure leaves the previous snapshot in place.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──► serving ──► close() ──► closed
//!              │  ▲
//!              ▼  │  (auto_update)
//!         refresh loop: update → reload, every check_interval
//! ```

mod config;
mod refresh;

pub use config::{RegistryConfigFile, RegistryOptions, CONFIG_FILE, DEFAULT_CHECK_INTERVAL};

use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Once};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::catalog::{Catalog, Loader, Model, Provider};
use crate::error::{RegistryError, Result};
use crate::update::{default_updater, UpdateOutcome, Updater};

/// The complete provider catalog at one point in time
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    providers: HashMap<String, Arc<Provider>>,
}

impl Snapshot {
    pub fn provider(&self, name: &str) -> Option<&Arc<Provider>> {
        self.providers.get(name)
    }

    pub fn model(&self, provider: &str, model: &str) -> Option<&Model> {
        self.providers.get(provider)?.model(model)
    }

    /// All providers, sorted by name
    pub fn providers(&self) -> Vec<Arc<Provider>> {
        let mut providers: Vec<_> = self.providers.values().cloned().collect();
        providers.sort_by(|a, b| a.name.cmp(&b.name));
        providers
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl From<Catalog> for Snapshot {
    fn from(catalog: Catalog) -> Self {
        Self {
            providers: catalog
                .into_iter()
                .map(|(name, provider)| (name, Arc::new(provider)))
                .collect(),
        }
    }
}

/// Fold custom providers into a freshly loaded catalog.
///
/// Known providers are merged field by field; unknown ones are added as
/// independent copies. Every touched provider is validated, and the first
/// violation rejects the whole catalog.
fn apply_custom_providers(catalog: &mut Catalog, custom: &[Provider]) -> Result<()> {
    for provider in custom {
        let merged = match catalog.entry(provider.name.clone()) {
            Entry::Occupied(entry) => {
                let existing = entry.into_mut();
                existing.merge(provider);
                existing
            }
            Entry::Vacant(entry) => entry.insert(provider.deep_copy()),
        };

        merged.validate()?;
    }

    Ok(())
}

/// State shared with the refresh task
pub(crate) struct Shared {
    loader: Loader,
    custom_providers: Vec<Provider>,
    updater: Arc<dyn Updater>,
    snapshot: RwLock<Arc<Snapshot>>,
    /// Serializes updater runs; they write the same directory
    update_lock: tokio::sync::Mutex<()>,
}

impl Shared {
    fn build_snapshot(loader: &Loader, custom: &[Provider]) -> Result<Snapshot> {
        let mut catalog = loader.load()?;
        apply_custom_providers(&mut catalog, custom)?;
        Ok(Snapshot::from(catalog))
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    fn reload(&self) -> Result<()> {
        let snapshot = Arc::new(Self::build_snapshot(&self.loader, &self.custom_providers)?);
        let count = snapshot.len();

        *self.snapshot.write() = snapshot;

        debug!("Published catalog snapshot ({} providers)", count);
        Ok(())
    }

    async fn update_and_reload(&self) -> Result<UpdateOutcome> {
        let _guard = self.update_lock.lock().await;

        let outcome = self
            .updater
            .update()
            .await
            .map_err(RegistryError::Update)?;

        self.reload()?;
        Ok(outcome)
    }
}

/// Thread-safe, self-updating catalog of providers and models
///
/// Must be created inside a tokio runtime. Dropping the registry closes it.
pub struct Registry {
    shared: Arc<Shared>,
    shutdown: watch::Sender<bool>,
    close_once: Once,
}

impl Registry {
    /// Create the config directory, publish the first snapshot and, with
    /// `auto_update`, start the refresh loop.
    ///
    /// Fails without starting anything if the first snapshot cannot be
    /// built.
    pub async fn new(options: RegistryOptions) -> Result<Self> {
        if options.config_dir.as_os_str().is_empty() {
            return Err(RegistryError::MissingConfigDir);
        }

        let config_dir = options.config_dir.clone();
        std::fs::create_dir_all(&config_dir).map_err(|source| {
            RegistryError::CreateConfigDir {
                path: config_dir.clone(),
                source,
            }
        })?;

        let updater = match options.updater.clone() {
            Some(updater) => updater,
            None => default_updater(&config_dir).map_err(RegistryError::CreateUpdater)?,
        };

        let loader = Loader::for_config_dir(&config_dir);
        let snapshot = Shared::build_snapshot(&loader, &options.custom_providers)?;
        info!(
            "Loaded {} providers from {}",
            snapshot.len(),
            loader.source().describe()
        );

        let shared = Arc::new(Shared {
            loader,
            custom_providers: options.custom_providers.clone(),
            updater,
            snapshot: RwLock::new(Arc::new(snapshot)),
            update_lock: tokio::sync::Mutex::new(()),
        });

        let (shutdown, shutdown_rx) = watch::channel(false);

        if options.auto_update {
            let interval = options.effective_check_interval();
            info!(
                "Auto-update enabled ({} updater, every {:?})",
                shared.updater.name(),
                interval
            );
            tokio::spawn(refresh::run(shared.clone(), interval, shutdown_rx));
        }

        Ok(Self {
            shared,
            shutdown,
            close_once: Once::new(),
        })
    }

    pub fn config_dir(&self) -> &Path {
        self.shared.loader.config_dir()
    }

    /// Provider by name
    pub fn provider(&self, name: &str) -> Option<Arc<Provider>> {
        self.shared.snapshot().provider(name).cloned()
    }

    /// All providers, sorted by name
    pub fn list_providers(&self) -> Vec<Arc<Provider>> {
        self.shared.snapshot().providers()
    }

    /// Model by provider and model name
    pub fn model(&self, provider: &str, model: &str) -> Option<Model> {
        self.shared.snapshot().model(provider, model).cloned()
    }

    /// The currently published snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.shared.snapshot()
    }

    /// Rebuild the snapshot from local data without checking for updates
    pub fn reload(&self) -> Result<()> {
        self.shared.reload()
    }

    /// Run one update cycle now, then reload
    pub async fn force_update(&self) -> Result<UpdateOutcome> {
        self.shared.update_and_reload().await
    }

    /// Stop the refresh loop. Idempotent; an update already in flight runs
    /// to completion.
    pub fn close(&self) -> Result<()> {
        self.close_once.call_once(|| {
            // no receiver just means the loop never started or already ended
            let _ = self.shutdown.send(true);
            debug!("Registry closed");
        });
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.close_once.is_completed()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
