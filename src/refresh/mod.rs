//! Refresh triggers.
//!
//! # Data Flow
//! ```text
//! poller.rs  (interval tick)      ─┐
//! watcher.rs (source file change) ─┼→ RefreshSender → run_refresh_loop → MessageEndpoint::refresh()
//! lifecycle::signals (SIGHUP)     ─┘
//!
//! POST /actuator/refresh calls MessageEndpoint::refresh() directly so it can
//! answer with the changed keys.
//! ```
//!
//! # Design Decisions
//! - One loop consumes every trigger; triggers queued during a refresh
//!   collapse into a single follow-up refresh
//! - Failures are logged by the endpoint and otherwise ignored here

pub mod poller;
pub mod watcher;

use std::fmt;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use crate::message::MessageEndpoint;

pub use poller::run_poller;
pub use watcher::SourceWatcher;

/// What asked for a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    Poll,
    FileChanged,
    Signal,
    Manual,
}

impl fmt::Display for RefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefreshTrigger::Poll => "poll",
            RefreshTrigger::FileChanged => "file_changed",
            RefreshTrigger::Signal => "signal",
            RefreshTrigger::Manual => "manual",
        };
        f.write_str(name)
    }
}

pub type RefreshSender = mpsc::UnboundedSender<RefreshTrigger>;
pub type RefreshReceiver = mpsc::UnboundedReceiver<RefreshTrigger>;

pub fn refresh_channel() -> (RefreshSender, RefreshReceiver) {
    mpsc::unbounded_channel()
}

/// Refresh `endpoint` once per trigger until the channel closes or shutdown fires.
pub async fn run_refresh_loop(
    endpoint: Arc<MessageEndpoint>,
    mut triggers: RefreshReceiver,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        let trigger = tokio::select! {
            trigger = triggers.recv() => match trigger {
                Some(trigger) => trigger,
                None => break,
            },
            _ = shutdown.recv() => break,
        };

        let mut coalesced = 0usize;
        while triggers.try_recv().is_ok() {
            coalesced += 1;
        }

        tracing::debug!(trigger = %trigger, coalesced, "Refresh requested");
        if let Ok(changed) = endpoint.refresh().await {
            if !changed.is_empty() {
                tracing::info!(trigger = %trigger, keys = ?changed, "Refresh applied");
            }
        }
    }

    tracing::debug!("Refresh loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use std::time::Duration;

    #[tokio::test]
    async fn test_loop_applies_triggers() {
        let source = Arc::new(MemorySource::with_value("example.message", "hello"));
        let endpoint = Arc::new(MessageEndpoint::new(
            "example.message",
            Some("hello".into()),
            source.clone(),
        ));
        let (tx, rx) = refresh_channel();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(run_refresh_loop(endpoint.clone(), rx, shutdown_rx));

        source.set_value("example.message", "world");
        tx.send(RefreshTrigger::Manual).unwrap();
        tx.send(RefreshTrigger::Poll).unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        while endpoint.current().unwrap().value != "world" {
            assert!(tokio::time::Instant::now() < deadline, "refresh never applied");
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        shutdown_tx.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_loop_exits_when_senders_drop() {
        let source = Arc::new(MemorySource::with_value("example.message", "hello"));
        let endpoint = Arc::new(MessageEndpoint::new("example.message", None, source));
        let (tx, rx) = refresh_channel();
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        drop(tx);
        tokio::time::timeout(
            Duration::from_secs(1),
            run_refresh_loop(endpoint, rx, shutdown_rx),
        )
        .await
        .unwrap();
    }
}
