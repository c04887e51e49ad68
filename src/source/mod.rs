//! Config sources.
//!
//! # Data Flow
//! ```text
//! refresh request
//!     → ConfigSource::fetch()
//!         file.rs   (TOML on disk, flattened to dotted keys)
//!         remote.rs (config server environment endpoint)
//!         memory.rs (in-process, replaceable)
//!     → Properties (flat key → value bundle)
//!     → message::MessageEndpoint picks its key
//! ```
//!
//! # Design Decisions
//! - Sources only read; they never cache or merge across fetches
//! - A fetch either returns a whole bundle or an error, never a partial one
//! - Every fetch error is a `ConfigFetchError`; callers decide whether it is fatal

pub mod file;
pub mod memory;
pub mod remote;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::SourceConfig;

pub use file::FileSource;
pub use memory::MemorySource;
pub use remote::RemoteSource;

/// Flat bundle of properties returned by one fetch.
pub type Properties = BTreeMap<String, String>;

/// Failure to obtain a usable bundle from a source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigFetchError {
    #[error("config source `{source_name}` is unreachable: {reason}")]
    Unreachable { source_name: String, reason: String },

    #[error("config source `{source_name}` returned a malformed response: {reason}")]
    Malformed { source_name: String, reason: String },

    #[error("config source `{source_name}` has no value for `{key}`")]
    MissingKey { source_name: String, key: String },
}

impl ConfigFetchError {
    pub fn unreachable(source_name: &str, reason: impl ToString) -> Self {
        Self::Unreachable {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(source_name: &str, reason: impl ToString) -> Self {
        Self::Malformed {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// An external supplier of configuration properties.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Human readable identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Fetch the current bundle.
    async fn fetch(&self) -> Result<Properties, ConfigFetchError>;
}

/// Look up `key` in a fetched bundle.
pub fn lookup(source_name: &str, properties: &Properties, key: &str) -> Result<String, ConfigFetchError> {
    properties
        .get(key)
        .cloned()
        .ok_or_else(|| ConfigFetchError::MissingKey {
            source_name: source_name.to_string(),
            key: key.to_string(),
        })
}

/// Build the source described by the client configuration.
pub fn from_config(config: &SourceConfig) -> Result<Arc<dyn ConfigSource>, reqwest::Error> {
    let source: Arc<dyn ConfigSource> = match config {
        SourceConfig::File { path } => Arc::new(FileSource::new(path.clone())),
        SourceConfig::Remote {
            uri,
            application,
            profile,
            label,
            username,
            password,
            timeout_secs,
        } => {
            let mut remote = RemoteSource::builder(uri, application, profile)
                .timeout(std::time::Duration::from_secs(*timeout_secs));
            if let Some(label) = label {
                remote = remote.label(label);
            }
            if let Some(username) = username {
                remote = remote.basic_auth(username, password.as_deref());
            }
            Arc::new(remote.build()?)
        }
    };
    Ok(source)
}
