//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the config client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Which property is exposed on `/message`.
    pub message: MessageConfig,

    /// Where properties are fetched from.
    pub source: SourceConfig,

    /// Refresh triggers.
    pub refresh: RefreshConfig,

    /// Retry policy for the initial fetch.
    pub retry: RetryConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Admin (actuator) endpoints.
    pub admin: AdminConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// The served property.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Property key looked up in the source bundle.
    pub key: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            key: "example.message".to_string(),
        }
    }
}

/// Config source selection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// A local TOML file, flattened into dotted keys.
    File {
        #[serde(default = "default_source_path")]
        path: PathBuf,
    },

    /// A config server speaking the Spring Cloud Config environment protocol.
    Remote {
        /// Base URI of the config server (e.g., "http://localhost:8888").
        uri: String,

        /// Application name requested from the server.
        #[serde(default = "default_application")]
        application: String,

        /// Profile requested from the server.
        #[serde(default = "default_profile")]
        profile: String,

        /// Optional label (branch, tag).
        #[serde(default)]
        label: Option<String>,

        /// Optional basic auth user.
        #[serde(default)]
        username: Option<String>,

        /// Optional basic auth password.
        #[serde(default)]
        password: Option<String>,

        /// Per-request timeout in seconds.
        #[serde(default = "default_remote_timeout")]
        timeout_secs: u64,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::File {
            path: default_source_path(),
        }
    }
}

fn default_source_path() -> PathBuf {
    PathBuf::from("application.toml")
}

fn default_application() -> String {
    "application".to_string()
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_remote_timeout() -> u64 {
    5
}

/// Refresh trigger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Poll the source every N seconds (0 = disabled).
    pub poll_interval_secs: u64,

    /// Watch the file source for changes.
    pub watch_file: bool,

    /// Refresh on SIGHUP (Unix only).
    pub on_sighup: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 0,
            watch_file: false,
            on_sighup: true,
        }
    }
}

/// Retry configuration for the initial fetch.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of fetch attempts (including the first).
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Abort startup when every attempt fails.
    pub fail_fast: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            base_delay_ms: 1000,
            max_delay_ms: 2000,
            fail_fast: false,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Admin endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Mount `POST /actuator/refresh`.
    pub enabled: bool,

    /// Bearer token required by the refresh endpoint, if set.
    pub api_key: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.message.key, "example.message");
        assert_eq!(config.source, SourceConfig::default());
        assert!(config.admin.enabled);
        assert!(config.refresh.on_sighup);
    }

    #[test]
    fn test_remote_source_fills_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [source]
            kind = "remote"
            uri = "http://localhost:8888"
            application = "config-client"
            "#,
        )
        .unwrap();

        match config.source {
            SourceConfig::Remote {
                uri,
                application,
                profile,
                label,
                timeout_secs,
                ..
            } => {
                assert_eq!(uri, "http://localhost:8888");
                assert_eq!(application, "config-client");
                assert_eq!(profile, "default");
                assert_eq!(label, None);
                assert_eq!(timeout_secs, 5);
            }
            other => panic!("expected remote source, got {:?}", other),
        }
    }
}
