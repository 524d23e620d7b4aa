//! Test helpers shared by the integration tests
#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use modelreg_core::catalog::{ChatCompletion, Context, Model, Parameters, Provider};
use modelreg_core::{UpdateOutcome, Updater};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Once;

/// Initialize logging for tests (only once per test run)
static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// A model with a chat-completion descriptor
pub fn chat_model(name: &str, max_input: i64, max_output: i64, max_tokens: i64) -> Model {
    let mut model = Model::new(name);
    model.apis.chat_completion = Some(ChatCompletion {
        context: Context {
            max_input,
            max_output,
        },
        parameters: Parameters {
            max_tokens,
            ..Default::default()
        },
        ..Default::default()
    });
    model
}

/// `acme` with one model `m1` (1000 in / 500 out)
pub fn acme_provider() -> Provider {
    let mut acme = Provider::new("acme");
    acme.insert_model(chat_model("m1", 1000, 500, 100));
    acme
}

/// Write a file below `root`, creating parent directories
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Counts calls; fails while `failing` is set
#[derive(Default)]
pub struct CountingUpdater {
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl CountingUpdater {
    pub fn failing() -> Self {
        let updater = Self::default();
        updater.set_failing(true);
        updater
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Updater for CountingUpdater {
    async fn update(&self) -> Result<UpdateOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("network unreachable");
        }
        Ok(UpdateOutcome::AlreadyCurrent {
            version: "test".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

/// Installs a fixed provider tree into `<config_dir>/providers`, like a
/// downloaded release would
pub struct DirUpdater {
    config_dir: PathBuf,
    files: Vec<(String, String)>,
    version: String,
}

impl DirUpdater {
    pub fn new(config_dir: &Path, version: &str, files: &[(&str, &str)]) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            files: files
                .iter()
                .map(|(path, contents)| (path.to_string(), contents.to_string()))
                .collect(),
            version: version.to_string(),
        }
    }
}

#[async_trait]
impl Updater for DirUpdater {
    async fn update(&self) -> Result<UpdateOutcome> {
        let root = self.config_dir.join("providers");
        for (path, contents) in &self.files {
            write_file(&root, path, contents);
        }
        Ok(UpdateOutcome::Updated {
            from: modelreg_core::catalog::BUNDLED_VERSION.to_string(),
            to: self.version.clone(),
        })
    }

    fn name(&self) -> &'static str {
        "dir"
    }
}
