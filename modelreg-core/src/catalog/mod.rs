//! Provider and model catalog
//!
//! This module provides the catalog data model and everything needed to
//! turn catalog files into an in-memory provider tree.
//!
//! # Overview
//!
//! - Decode provider manifests and model files from a [`CatalogSource`]
//! - Merge layered data (bundled < downloaded < caller overrides)
//! - Validate records before they are published
//!
//! # Architecture
//!
//! ```text
//! Release (GitHub)            Library
//!     │                           │
//!     ▼                           ▼
//! <config_dir>/providers/    embedded bundle
//!            │                    │
//!            └──── Loader ────────┘
//!                    │
//!                    ▼
//!      merge custom providers → validate
//! ```

pub mod bundled;
mod loader;
mod merge;
mod source;
mod types;
mod validate;

pub use bundled::BUNDLED_VERSION;
pub use loader::{load_from, Catalog, Loader, DATA_EXTENSION, PROVIDERS_DIR, PROVIDER_MANIFEST};
pub use merge::set_if_not_zero;
pub use source::{CatalogSource, DirSource, EmbeddedSource};
pub use types::{
    ApiFormat, Apis, AuthType, ChatCompletion, Context, Features, Model, Parameters, Provider,
    ProviderType,
};
