//! Refreshable config client.
//!
//! Serves one configuration property on `GET /message` and re-fetches it from
//! a file or a config server without restarting.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod message;
pub mod observability;
pub mod refresh;
pub mod resilience;
pub mod source;

pub use config::ClientConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use message::{ConfigValue, MessageEndpoint, MessageError};
pub use source::{ConfigFetchError, ConfigSource};
