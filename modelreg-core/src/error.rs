//! Error types with clear, actionable messages

use std::path::PathBuf;
use thiserror::Error;

/// A catalog record violates one of its invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("provider name cannot be empty")]
    EmptyProviderName,

    #[error("provider {provider}: api_key is required when auth_type is api_key")]
    MissingApiKey { provider: String },

    #[error("provider {provider}: model name cannot be empty")]
    EmptyModelName { provider: String },

    #[error("provider {provider}: model {model}: max_input must be positive (got {value})")]
    NonPositiveMaxInput {
        provider: String,
        model: String,
        value: i64,
    },

    #[error("provider {provider}: model {model}: max_output must be positive (got {value})")]
    NonPositiveMaxOutput {
        provider: String,
        model: String,
        value: i64,
    },

    #[error(
        "provider {provider}: model {model}: max_output ({max_output}) cannot exceed max_input ({max_input})"
    )]
    OutputExceedsInput {
        provider: String,
        model: String,
        max_input: i64,
        max_output: i64,
    },

    #[error("provider {provider}: model {model}: max_tokens must be positive (got {value})")]
    NonPositiveMaxTokens {
        provider: String,
        model: String,
        value: i64,
    },
}

/// Building a catalog from a data source failed
#[derive(Error, Debug)]
pub enum LoadError {
    /// A file in the data source could not be read
    #[error("Failed to read catalog file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Walking the data directory failed
    #[error("Failed to walk catalog directory {path}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A provider manifest did not decode
    #[error("Failed to parse provider {path}")]
    ParseProvider {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// A model file did not decode
    #[error("Failed to parse model {path}")]
    ParseModel {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// A model file sits too shallow in the tree to name its provider
    #[error("Invalid model path: {path} (expected <provider>/.../<model>.yaml)")]
    InvalidModelPath { path: String },
}

/// Errors surfaced by the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("config_dir is required")]
    MissingConfigDir,

    #[error("Failed to create config directory {path}")]
    CreateConfigDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The release updater could not be constructed
    #[error("Failed to create updater: {0:#}")]
    CreateUpdater(#[source] anyhow::Error),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("Invalid provider data: {0}")]
    Validation(#[from] ValidationError),

    /// The release updater could not bring the local data up to date
    #[error("Update failed: {0:#}")]
    Update(#[source] anyhow::Error),
}

pub type Result<T, E = RegistryError> = std::result::Result<T, E>;
