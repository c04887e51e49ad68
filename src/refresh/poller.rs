//! Interval polling.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

use super::{RefreshSender, RefreshTrigger};

/// Send a [`RefreshTrigger::Poll`] every `interval` until shutdown.
///
/// The first trigger fires one full interval after start; the initial
/// value is loaded by startup.
pub async fn run_poller(interval: Duration, triggers: RefreshSender, mut shutdown: broadcast::Receiver<()>) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(interval = ?interval, "Polling config source");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if triggers.send(RefreshTrigger::Poll).is_err() {
                    break;
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}
