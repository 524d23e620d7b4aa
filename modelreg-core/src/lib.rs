//! modelreg - a self-updating catalog of AI providers and their models
//!
//! ```no_run
//! use modelreg_core::{Registry, RegistryOptions};
//!
//! # async fn demo() -> modelreg_core::error::Result<()> {
//! let registry = Registry::new(RegistryOptions::new("/tmp/modelreg")).await?;
//! if let Some(model) = registry.model("openai", "gpt-4o") {
//!     println!("{:?}", model.chat_completion().map(|c| c.context));
//! }
//! registry.close()?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod registry;
pub mod update;

pub use catalog::{Model, Provider};
pub use error::{LoadError, RegistryError, ValidationError};
pub use registry::{Registry, RegistryConfigFile, RegistryOptions, Snapshot};
pub use update::{NoopUpdater, UpdateOutcome, Updater};
