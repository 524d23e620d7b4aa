//! Background refresh loop
//!
//! Runs one update cycle immediately, then one per interval tick. Failures
//! are logged and the loop waits for the next tick. Only the shutdown signal
//! ends the loop, and it is observed between cycles, never during one.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use super::Shared;
use crate::update::UpdateOutcome;

pub(super) async fn run(
    shared: Arc<Shared>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!("Catalog refresh loop started (interval {:?})", interval);

    loop {
        // the first tick completes immediately
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }

        if *shutdown.borrow() {
            break;
        }

        match shared.update_and_reload().await {
            Ok(UpdateOutcome::Updated { from, to }) => {
                info!("Catalog updated from {} to {}", from, to);
            }
            Ok(UpdateOutcome::AlreadyCurrent { version }) => {
                debug!("Catalog already current at {}", version);
            }
            Err(e) => error!("Catalog refresh failed: {}", e),
        }
    }

    debug!("Catalog refresh loop stopped");
}
