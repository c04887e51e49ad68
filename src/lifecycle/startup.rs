//! Startup orchestration.
//!
//! # Order
//! 1. Start metrics exporter
//! 2. Build the config source
//! 3. Fetch the initial value (with retries)
//! 4. Start refresh loop and triggers (poller, file watcher)
//! 5. Bind listener, serve
//!
//! Listeners start last so traffic only arrives once a value (or the
//! documented placeholder) is ready.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use notify::RecommendedWatcher;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{ClientConfig, ConfigError, SourceConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::message::MessageEndpoint;
use crate::observability::metrics;
use crate::refresh::{refresh_channel, run_poller, run_refresh_loop, RefreshSender, SourceWatcher};
use crate::source::{self, ConfigFetchError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build config source: {0}")]
    Source(#[from] reqwest::Error),

    #[error("initial config fetch failed: {0}")]
    Fetch(#[from] ConfigFetchError),

    #[error("failed to watch config source: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Running background services around one endpoint.
pub struct Services {
    pub endpoint: Arc<MessageEndpoint>,
    pub refresh: RefreshSender,
    _watcher: Option<RecommendedWatcher>,
}

/// Steps 2–4: source, initial value, refresh machinery.
pub async fn start_services(config: &ClientConfig, shutdown: &Shutdown) -> Result<Services, StartupError> {
    let source = source::from_config(&config.source)?;
    tracing::info!(source = source.name(), key = %config.message.key, "Config source ready");

    let endpoint = Arc::new(
        MessageEndpoint::bootstrap(config.message.key.clone(), source, &config.retry).await?,
    );

    let (refresh, triggers) = refresh_channel();
    tokio::spawn(run_refresh_loop(endpoint.clone(), triggers, shutdown.subscribe()));

    if config.refresh.poll_interval_secs > 0 {
        tokio::spawn(run_poller(
            Duration::from_secs(config.refresh.poll_interval_secs),
            refresh.clone(),
            shutdown.subscribe(),
        ));
    }

    let watcher = match (&config.source, config.refresh.watch_file) {
        (SourceConfig::File { path }, true) => Some(SourceWatcher::new(path, refresh.clone()).run()?),
        _ => None,
    };

    Ok(Services {
        endpoint,
        refresh,
        _watcher: watcher,
    })
}

/// Run the whole client until a shutdown signal arrives.
pub async fn run(config: ClientConfig) -> Result<(), StartupError> {
    // The recorder must exist before the endpoint records its first gauge.
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let services = start_services(&config, &shutdown).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let sighup = config.refresh.on_sighup.then(|| services.refresh.clone());
    tokio::spawn(signals::handle_signals(shutdown.clone(), sighup));

    let server = HttpServer::new(config, services.endpoint.clone());
    server.run(listener, shutdown.subscribe()).await?;

    shutdown.trigger();
    Ok(())
}
