//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handlers, refresh loop, sources produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is recorded on every request span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
