//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Startup fetch:
//!     → retries.rs (fetch, on failure wait and try again)
//!     → backoff.rs (exponential delay, capped, with jitter)
//! ```
//!
//! # Design Decisions
//! - Timeouts belong to the source (reqwest client) and the HTTP layer
//! - Jittered backoff prevents a fleet restarting in lockstep against the config server

pub mod backoff;
pub mod retries;

pub use retries::fetch_with_retry;
