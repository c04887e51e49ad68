//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Build source → Fetch initial value → Start refresh triggers → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → server drains, refresh loop and poller stop
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Trigger refresh
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{run, start_services, Services, StartupError};
