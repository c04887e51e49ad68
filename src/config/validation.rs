//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and the remote source URI
//! - Reject trigger combinations that cannot work
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{ClientConfig, SourceConfig};

/// A single semantic problem in a [`ClientConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("message.key must not be empty")]
    EmptyKey,

    #[error("{field} `{value}` is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("source.uri `{0}` is not an http(s) URL")]
    InvalidSourceUri(String),

    #[error("source.application must not be empty")]
    EmptyApplication,

    #[error("retry.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("retry.base_delay_ms must not exceed retry.max_delay_ms")]
    InvertedBackoff,

    #[error("timeouts.request_secs must be greater than 0")]
    ZeroTimeout,

    #[error("refresh.watch_file requires a file source")]
    WatchWithoutFile,
}

/// `ip:port` or `host:port`; host names are resolved at bind time.
fn is_bind_address(value: &str) -> bool {
    if value.parse::<SocketAddr>().is_ok() {
        return true;
    }
    match value.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty()
                && !host.contains(':')
                && !host.chars().any(char::is_whitespace)
                && port.parse::<u16>().is_ok()
        }
        None => false,
    }
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.message.key.trim().is_empty() {
        errors.push(ValidationError::EmptyKey);
    }

    if !is_bind_address(&config.listener.bind_address) {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    match &config.source {
        SourceConfig::File { .. } => {}
        SourceConfig::Remote { uri, application, .. } => {
            let valid = Url::parse(uri)
                .map(|u| matches!(u.scheme(), "http" | "https") && !u.cannot_be_a_base())
                .unwrap_or(false);
            if !valid {
                errors.push(ValidationError::InvalidSourceUri(uri.clone()));
            }
            if application.trim().is_empty() {
                errors.push(ValidationError::EmptyApplication);
            }
            if config.refresh.watch_file {
                errors.push(ValidationError::WatchWithoutFile);
            }
        }
    }

    if config.retry.max_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts);
    }
    if config.retry.base_delay_ms > config.retry.max_delay_ms {
        errors.push(ValidationError::InvertedBackoff);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(uri: &str) -> SourceConfig {
        SourceConfig::Remote {
            uri: uri.to_string(),
            application: "app".to_string(),
            profile: "default".to_string(),
            label: None,
            username: None,
            password: None,
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ClientConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ClientConfig::default();
        config.message.key = "  ".into();
        config.listener.bind_address = "not-an-address".into();
        config.retry.max_attempts = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::EmptyKey));
        assert!(errors.contains(&ValidationError::ZeroAttempts));
    }

    #[test]
    fn test_bind_address_accepts_host_names() {
        let mut config = ClientConfig::default();
        for ok in ["localhost:8080", "config-client.internal:80", "[::1]:8080", "127.0.0.1:0"] {
            config.listener.bind_address = ok.into();
            assert_eq!(validate_config(&config), Ok(()), "{ok}");
        }
        for bad in ["localhost", ":8080", "localhost:http", "local host:80", "localhost:70000"] {
            config.listener.bind_address = bad.into();
            assert!(validate_config(&config).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_remote_uri_must_be_http() {
        let mut config = ClientConfig::default();
        config.source = remote("ftp://config.local");
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::InvalidSourceUri("ftp://config.local".into())]
        );

        config.source = remote("https://config.local:8888/base");
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_watch_requires_file_source() {
        let mut config = ClientConfig::default();
        config.source = remote("http://localhost:8888");
        config.refresh.watch_file = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::WatchWithoutFile]);
    }
}
