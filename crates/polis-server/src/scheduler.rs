//! Periodic monthly step.
//!
//! When `session.step_interval_secs` is configured the server steps the
//! simulation on a fixed cadence. Ticks that find no active session are
//! skipped, so the timer can run for the lifetime of the process.

use std::sync::Arc;
use std::time::Duration;

use polis_core::Task;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::state::AppState;

/// Spawn the step timer.
pub fn spawn_step_timer(state: Arc<AppState>, every: Duration) -> JoinHandle<()> {
    info!(interval_secs = every.as_secs(), "Step timer started");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if state.coordinator().is_active().await {
                drop(state.dispatch(Task::Step));
            } else {
                debug!("Step timer idle: no active session");
            }
        }
    })
}
