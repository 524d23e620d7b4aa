//! modelreg - browse and update the AI provider and model catalog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use modelreg_core::registry::CONFIG_FILE;
use modelreg_core::{NoopUpdater, Registry, RegistryConfigFile, RegistryOptions};

mod commands;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Log output formats
#[derive(Debug, Clone, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[clap(
    name = "modelreg",
    about = "Catalog of AI providers and model capabilities",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Data directory (defaults to the per-user config directory)
    #[clap(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Config file (defaults to <config-dir>/config.yaml)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Log output format
    #[clap(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    /// Never contact the release server
    #[clap(long, global = true)]
    offline: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all providers
    Providers {
        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// List the models of one provider
    Models {
        /// Provider name
        provider: String,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show a model's full descriptor as YAML
    Show {
        /// Provider name
        provider: String,

        /// Model name
        model: String,
    },

    /// Download the latest catalog release now
    Update,

    /// Keep the catalog updated in the background until Ctrl-C
    Watch {
        /// Seconds between update checks (default: config file, then 1 hour)
        #[clap(long)]
        interval_secs: Option<u64>,
    },
}

/// Initialize tracing with CLI flags
///
/// Logs always go to stderr so command output on stdout stays parseable.
fn initialize_tracing(log_level: &LogLevel, log_format: &LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    match log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
    }
}

/// Resolve registry options from flags and the config file
fn registry_options(cli: &Cli) -> Result<RegistryOptions> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => RegistryOptions::default_config_dir()?,
    };
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join(CONFIG_FILE));

    let mut options = RegistryConfigFile::load(&config_path)?.into_options(&config_dir);

    // only `watch` runs the background loop
    options.auto_update = false;
    if let Command::Watch { interval_secs } = &cli.command {
        options.auto_update = true;
        if let Some(secs) = interval_secs {
            options.check_interval = Duration::from_secs(*secs);
        }
    }

    if cli.offline {
        options.updater = Some(Arc::new(NoopUpdater::new(&config_dir)));
    }

    Ok(options)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level, &cli.log_format);

    let options = registry_options(&cli)?;
    let registry = Registry::new(options)
        .await
        .context("Failed to open model registry")?;

    let result = match &cli.command {
        Command::Providers { json } => commands::execute_providers(&registry, *json),
        Command::Models { provider, json } => {
            commands::execute_models(&registry, provider, *json)
        }
        Command::Show { provider, model } => commands::execute_show(&registry, provider, model),
        Command::Update => commands::execute_update(&registry).await,
        Command::Watch { .. } => commands::execute_watch(&registry).await,
    };

    registry.close()?;
    result
}
