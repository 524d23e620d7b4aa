//! Builds the provider -> model tree from a catalog source
//!
//! Layout:
//!
//! ```text
//! <provider>/provider.yaml          ← Provider record
//! <provider>/models/<model>.yaml    ← one Model record per file
//! ```
//!
//! Loading takes two passes because models find their provider through the
//! directory they live in, so every provider must exist first.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::source::{CatalogSource, DirSource, EmbeddedSource};
use super::types::{Model, Provider};
use crate::error::LoadError;

/// Directory inside the config dir holding downloaded release data
pub const PROVIDERS_DIR: &str = "providers";

/// File name distinguishing a provider manifest from model files
pub const PROVIDER_MANIFEST: &str = "provider.yaml";

/// Extension of every catalog data file
pub const DATA_EXTENSION: &str = ".yaml";

/// `<provider>/<dir>/<model>.yaml` is the shallowest valid model path
const MIN_MODEL_PATH_SEGMENTS: usize = 3;

/// Providers keyed by name
pub type Catalog = HashMap<String, Provider>;

/// Loads the catalog for a config directory
#[derive(Debug, Clone)]
pub struct Loader {
    config_dir: PathBuf,
}

impl Loader {
    pub fn for_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Downloaded release data if present, else the embedded bundle
    pub fn source(&self) -> Box<dyn CatalogSource> {
        let local = self.config_dir.join(PROVIDERS_DIR);
        if local.is_dir() {
            Box::new(DirSource::new(local))
        } else {
            Box::new(EmbeddedSource)
        }
    }

    /// Load the catalog from whichever source is current
    pub fn load(&self) -> Result<Catalog, LoadError> {
        let source = self.source();
        debug!("Loading catalog from {}", source.describe());
        load_from(source.as_ref())
    }
}

fn is_data_file(path: &str) -> bool {
    path.ends_with(DATA_EXTENSION)
}

fn is_manifest(path: &str) -> bool {
    path.rsplit('/').next() == Some(PROVIDER_MANIFEST)
}

/// Build a catalog from any source.
///
/// Any read or decode failure aborts the whole load. Providers are keyed by
/// their decoded name, so two manifests declaring the same name leave the
/// later one (in path order). Models whose directory names no known provider
/// are skipped.
pub fn load_from(source: &dyn CatalogSource) -> Result<Catalog, LoadError> {
    let paths = source.paths()?;
    let mut providers = Catalog::new();

    for path in paths.iter().filter(|p| is_data_file(p) && is_manifest(p)) {
        let data = source.read(path)?;
        let mut provider: Provider =
            serde_yaml_ng::from_slice(&data).map_err(|source| LoadError::ParseProvider {
                path: path.clone(),
                source,
            })?;

        provider.models.clear();
        if providers.contains_key(&provider.name) {
            debug!("Provider '{}' redefined by {}", provider.name, path);
        }
        providers.insert(provider.name.clone(), provider);
    }

    for path in paths.iter().filter(|p| is_data_file(p) && !is_manifest(p)) {
        let data = source.read(path)?;
        let model: Model =
            serde_yaml_ng::from_slice(&data).map_err(|source| LoadError::ParseModel {
                path: path.clone(),
                source,
            })?;

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < MIN_MODEL_PATH_SEGMENTS {
            return Err(LoadError::InvalidModelPath { path: path.clone() });
        }

        match providers.get_mut(segments[0]) {
            Some(provider) => provider.insert_model(model),
            None => trace!("Skipping {}: no provider '{}'", path, segments[0]),
        }
    }

    Ok(providers)
}
