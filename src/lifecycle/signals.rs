//! OS signal handling.
//!
//! - SIGINT (Ctrl+C) / SIGTERM → graceful shutdown
//! - SIGHUP → refresh request, not shutdown

use std::future::Future;

use crate::lifecycle::Shutdown;
use crate::refresh::{RefreshSender, RefreshTrigger};

/// Wait for OS signals until a shutdown signal arrives.
///
/// SIGHUP is forwarded as a refresh trigger when `refresh` is given.
pub async fn handle_signals(shutdown: Shutdown, refresh: Option<RefreshSender>) {
    imp::wait(refresh).await;
    tracing::info!("Shutdown signal received");
    shutdown.trigger();
}

/// Resolve when `signal` fires; if it cannot be listened for, never resolve.
async fn received_or_pending<F>(signal: F, name: &str)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::warn!(error = %e, signal = name, "Cannot listen for signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
mod imp {
    use super::*;
    use tokio::signal::unix::{signal, SignalKind};

    pub(super) async fn wait(refresh: Option<RefreshSender>) {
        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(s) => Some(s),
            Err(e) => {
                tracing::warn!(error = %e, "Cannot install SIGTERM handler");
                None
            }
        };
        let mut hangup = match refresh.as_ref().map(|_| signal(SignalKind::hangup())) {
            Some(Ok(s)) => Some(s),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Cannot install SIGHUP handler");
                None
            }
            None => None,
        };

        loop {
            tokio::select! {
                _ = received_or_pending(tokio::signal::ctrl_c(), "SIGINT") => return,
                _ = recv_or_pending(&mut terminate) => return,
                _ = recv_or_pending(&mut hangup) => {
                    tracing::info!("SIGHUP received, requesting refresh");
                    if let Some(tx) = &refresh {
                        let _ = tx.send(RefreshTrigger::Signal);
                    }
                }
            }
        }
    }

    async fn recv_or_pending(stream: &mut Option<tokio::signal::unix::Signal>) {
        match stream {
            Some(s) => {
                s.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use super::*;

    pub(super) async fn wait(_refresh: Option<RefreshSender>) {
        received_or_pending(tokio::signal::ctrl_c(), "ctrl-c").await;
    }
}
