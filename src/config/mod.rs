//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! client config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → read once at startup by lifecycle::startup
//! ```
//!
//! The client's own configuration is static for the process lifetime. The
//! refreshable value lives behind `message::MessageEndpoint` and comes from a
//! `source::ConfigSource`, not from this file.
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, with_bind_override, ConfigError};
pub use schema::{
    AdminConfig, ClientConfig, ListenerConfig, MessageConfig, ObservabilityConfig, RefreshConfig,
    RetryConfig, SourceConfig, TimeoutConfig,
};
pub use validation::ValidationError;
