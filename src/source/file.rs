//! TOML file source.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{ConfigFetchError, ConfigSource, Properties};

/// Reads a TOML file on every fetch and flattens it into dotted keys.
///
/// `[example] message = "hi"` yields `example.message = hi`; arrays yield
/// `key[0]`, `key[1]`, ...; non-string scalars use their TOML text.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConfigSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Properties, ConfigFetchError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == ErrorKind::InvalidData {
                ConfigFetchError::malformed(&self.name, e)
            } else {
                ConfigFetchError::unreachable(&self.name, e)
            }
        })?;

        let table: toml::Table = content
            .parse()
            .map_err(|e: toml::de::Error| ConfigFetchError::malformed(&self.name, e.message()))?;

        let mut properties = Properties::new();
        flatten_table("", &table, &mut properties);
        Ok(properties)
    }
}

fn flatten_table(prefix: &str, table: &toml::Table, out: &mut Properties) {
    for (key, value) in table {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        flatten_value(full, value, out);
    }
}

fn flatten_value(key: String, value: &toml::Value, out: &mut Properties) {
    match value {
        toml::Value::String(s) => {
            out.insert(key, s.clone());
        }
        toml::Value::Table(table) => flatten_table(&key, table, out),
        toml::Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten_value(format!("{}[{}]", key, i), item, out);
            }
        }
        other => {
            out.insert(key, other.to_string());
        }
    }
}
