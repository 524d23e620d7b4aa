//! Background refresh loop timing and shutdown

mod common;

use common::{init_test_logging, CountingUpdater};
use modelreg_core::{Registry, RegistryOptions};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn auto_update_options(
    config_dir: &std::path::Path,
    updater: Arc<CountingUpdater>,
    interval: Duration,
) -> RegistryOptions {
    RegistryOptions::new(config_dir)
        .with_auto_update(true)
        .with_check_interval(interval)
        .with_updater(updater)
}

#[tokio::test]
async fn test_no_loop_without_auto_update() {
    let temp_dir = TempDir::new().unwrap();
    let updater = Arc::new(CountingUpdater::default());

    let registry = Registry::new(RegistryOptions::new(temp_dir.path()).with_updater(updater.clone()))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(updater.calls(), 0);
    registry.close().unwrap();
}

#[tokio::test]
async fn test_first_update_runs_immediately() {
    init_test_logging();
    let temp_dir = TempDir::new().unwrap();
    let updater = Arc::new(CountingUpdater::default());

    let registry = Registry::new(auto_update_options(
        temp_dir.path(),
        updater.clone(),
        Duration::from_secs(3600),
    ))
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(updater.calls(), 1);
    registry.close().unwrap();
}

#[tokio::test]
async fn test_zero_interval_uses_default() {
    let temp_dir = TempDir::new().unwrap();
    let updater = Arc::new(CountingUpdater::default());

    let registry = Registry::new(auto_update_options(
        temp_dir.path(),
        updater.clone(),
        Duration::ZERO,
    ))
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // an hour-long interval: only the immediate run
    assert_eq!(updater.calls(), 1);
    registry.close().unwrap();
}

#[tokio::test]
async fn test_loop_ticks_and_survives_errors() {
    init_test_logging();
    let temp_dir = TempDir::new().unwrap();
    let updater = Arc::new(CountingUpdater::failing());

    let registry = Registry::new(auto_update_options(
        temp_dir.path(),
        updater.clone(),
        Duration::from_millis(20),
    ))
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(updater.calls() >= 3, "calls: {}", updater.calls());
    // failed updates never disturb the published data
    assert!(registry.provider("openai").is_some());

    updater.set_failing(false);
    let calls = updater.calls();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(updater.calls() > calls);

    registry.close().unwrap();
}

#[tokio::test]
async fn test_close_stops_loop() {
    let temp_dir = TempDir::new().unwrap();
    let updater = Arc::new(CountingUpdater::default());

    let registry = Registry::new(auto_update_options(
        temp_dir.path(),
        updater.clone(),
        Duration::from_millis(20),
    ))
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    registry.close().unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let calls = updater.calls();
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(updater.calls(), calls);
}

#[tokio::test]
async fn test_drop_stops_loop() {
    let temp_dir = TempDir::new().unwrap();
    let updater = Arc::new(CountingUpdater::default());

    let registry = Registry::new(auto_update_options(
        temp_dir.path(),
        updater.clone(),
        Duration::from_millis(20),
    ))
    .await
    .unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;

    drop(registry);
    tokio::time::sleep(Duration::from_millis(50)).await;
    let calls = updater.calls();
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(updater.calls(), calls);
}
