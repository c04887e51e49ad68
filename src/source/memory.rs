//! In-process source.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;

use super::{ConfigFetchError, ConfigSource, Properties};

/// A source held in memory.
///
/// Properties are replaced wholesale with [`MemorySource::set`]; while
/// [`MemorySource::set_unreachable`] is in effect every fetch fails.
pub struct MemorySource {
    name: String,
    properties: ArcSwapOption<Properties>,
}

impl MemorySource {
    pub fn new(name: &str, properties: Properties) -> Self {
        Self {
            name: name.to_string(),
            properties: ArcSwapOption::from_pointee(properties),
        }
    }

    /// A source holding a single property.
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut properties = Properties::new();
        properties.insert(key.to_string(), value.to_string());
        Self::new("memory", properties)
    }

    pub fn set(&self, properties: Properties) {
        self.properties.store(Some(Arc::new(properties)));
    }

    /// Replace one property, keeping the rest.
    pub fn set_value(&self, key: &str, value: &str) {
        let mut next = self
            .properties
            .load_full()
            .map(|p| p.as_ref().clone())
            .unwrap_or_default();
        next.insert(key.to_string(), value.to_string());
        self.set(next);
    }

    pub fn set_unreachable(&self) {
        self.properties.store(None);
    }
}

#[async_trait]
impl ConfigSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Properties, ConfigFetchError> {
        match self.properties.load_full() {
            Some(properties) => Ok(properties.as_ref().clone()),
            None => Err(ConfigFetchError::unreachable(&self.name, "source marked unreachable")),
        }
    }
}
