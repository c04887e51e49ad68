//! The refreshable message value.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::RetryConfig;
use crate::message::value::ConfigValue;
use crate::observability::metrics;
use crate::resilience::fetch_with_retry;
use crate::source::{lookup, ConfigFetchError, ConfigSource};

/// Read-side failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("`{key}` has not been loaded yet")]
    NotYetInitialized { key: String },
}

/// Holds the current value of one key and re-fetches it on demand.
///
/// Reads are a single atomic pointer load. Refreshes fetch from the source,
/// then swap the pointer; they are serialised among themselves so a slow,
/// older fetch cannot land after a newer one.
pub struct MessageEndpoint {
    key: String,
    current: ArcSwapOption<ConfigValue>,
    source: Arc<dyn ConfigSource>,
    refresh_lock: Mutex<()>,
}

impl MessageEndpoint {
    /// Create an endpoint with an already known initial value (or none).
    pub fn new(key: impl Into<String>, initial: Option<String>, source: Arc<dyn ConfigSource>) -> Self {
        let key = key.into();
        let current = initial.map(|value| Arc::new(ConfigValue::new(key.clone(), value)));
        metrics::set_message_loaded(current.is_some());

        Self {
            key,
            current: ArcSwapOption::new(current),
            source,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Fetch the initial value with retries, then create the endpoint.
    ///
    /// When every attempt fails the endpoint starts empty, unless
    /// `policy.fail_fast` is set, in which case the last error is returned.
    pub async fn bootstrap(
        key: impl Into<String>,
        source: Arc<dyn ConfigSource>,
        policy: &RetryConfig,
    ) -> Result<Self, ConfigFetchError> {
        let key = key.into();
        let initial = match fetch_with_retry(source.as_ref(), &key, policy).await {
            Ok(value) => {
                tracing::info!(key = %key, source = source.name(), "Initial value loaded");
                Some(value)
            }
            Err(e) if policy.fail_fast => return Err(e),
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    source = source.name(),
                    error = %e,
                    "Starting without a value; serving placeholder until a refresh succeeds"
                );
                None
            }
        };

        Ok(Self::new(key, initial, source))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// The value as of the last successful load.
    pub fn current(&self) -> Result<Arc<ConfigValue>, MessageError> {
        self.current
            .load_full()
            .ok_or_else(|| MessageError::NotYetInitialized { key: self.key.clone() })
    }

    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    /// Re-fetch the key and swap it in.
    ///
    /// Returns the keys whose value changed (empty if the source still holds
    /// the same value). On error the previously held value is kept.
    pub async fn refresh(&self) -> Result<Vec<String>, ConfigFetchError> {
        let _guard = self.refresh_lock.lock().await;

        let fetched = match self.source.fetch().await {
            Ok(properties) => lookup(self.source.name(), &properties, &self.key),
            Err(e) => Err(e),
        };

        let value = match fetched {
            Ok(value) => value,
            Err(e) => {
                metrics::record_refresh("failure");
                tracing::warn!(
                    key = %self.key,
                    source = self.source.name(),
                    error = %e,
                    "Refresh failed, keeping last known value"
                );
                return Err(e);
            }
        };

        let previous = self.current.load_full();
        if previous.as_deref().map(|p| p.value == value).unwrap_or(false) {
            metrics::record_refresh("unchanged");
            tracing::debug!(key = %self.key, "Refresh found no change");
            return Ok(Vec::new());
        }

        self.current
            .store(Some(Arc::new(ConfigValue::new(self.key.clone(), value))));
        metrics::record_refresh("changed");
        metrics::set_message_loaded(true);
        tracing::info!(
            key = %self.key,
            source = self.source.name(),
            had_value = previous.is_some(),
            "Value refreshed"
        );

        Ok(vec![self.key.clone()])
    }
}
