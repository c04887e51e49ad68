//! Refreshable config client.
//!
//! ```text
//!   config source (file / config server)
//!          │  fetch (startup, refresh)
//!          ▼
//!   ┌──────────────────┐   GET /message     ┌────────┐
//!   │ MessageEndpoint  │◀───────────────────│ client │
//!   │  ArcSwap<value>  │                    └────────┘
//!   └──────────────────┘
//!          ▲  refresh()
//!          │
//!   POST /actuator/refresh · poll interval · file watch · SIGHUP
//! ```

use std::path::PathBuf;

use clap::Parser;

use config_client::config::{load_config, with_bind_override, ClientConfig};
use config_client::lifecycle;
use config_client::observability::logging;

#[derive(Parser)]
#[command(name = "config-client")]
#[command(about = "Serves a refreshable configuration value over HTTP", long_about = None)]
struct Args {
    /// Path to the client configuration (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(bind) = &args.bind {
        config = with_bind_override(config, bind)?;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!("config-client v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_path = ?args.config,
        bind_address = %config.listener.bind_address,
        key = %config.message.key,
        poll_interval_secs = config.refresh.poll_interval_secs,
        watch_file = config.refresh.watch_file,
        "Configuration loaded"
    );

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
