//! Retry logic for the initial fetch.
//!
//! # Responsibilities
//! - Retry a source fetch with exponential backoff + jitter
//! - Stop after `max_attempts` and hand back the last error
//!
//! # Design Decisions
//! - Only the startup fetch retries; refreshes keep the last good value instead
//! - A missing key is retried like any other failure

use crate::config::RetryConfig;
use crate::resilience::backoff::calculate_backoff;
use crate::source::{lookup, ConfigFetchError, ConfigSource};

/// Fetch `key` from `source`, retrying per `policy`.
pub async fn fetch_with_retry(
    source: &dyn ConfigSource,
    key: &str,
    policy: &RetryConfig,
) -> Result<String, ConfigFetchError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        let result = match source.fetch().await {
            Ok(properties) => lookup(source.name(), &properties, key),
            Err(e) => Err(e),
        };

        match result {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(source = source.name(), attempt, "Config source recovered");
                }
                return Ok(value);
            }
            Err(e) if attempt < max_attempts => {
                let delay = calculate_backoff(attempt, policy.base_delay_ms, policy.max_delay_ms);
                tracing::warn!(
                    source = source.name(),
                    attempt,
                    max_attempts,
                    delay = ?delay,
                    error = %e,
                    "Config fetch failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                tracing::error!(
                    source = source.name(),
                    attempts = attempt,
                    error = %e,
                    "Config fetch failed, giving up"
                );
                return Err(e);
            }
        }
    }
}
