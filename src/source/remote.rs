//! Remote config server source.
//!
//! Speaks the environment endpoint of a Spring Cloud Config style server:
//!
//! ```text
//! GET {uri}/{application}/{profile}[/{label}]
//!
//! {
//!   "name": "config-client",
//!   "profiles": ["default"],
//!   "label": "main",
//!   "version": "e3b0c442",
//!   "propertySources": [
//!     { "name": "config-client.yml", "source": { "example.message": "hello" } },
//!     { "name": "application.yml",   "source": { "example.message": "fallback" } }
//!   ]
//! }
//! ```
//!
//! Property sources are listed highest precedence first.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::{ConfigFetchError, ConfigSource, Properties};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Environment {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    property_sources: Vec<PropertySource>,
}

#[derive(Debug, Deserialize)]
struct PropertySource {
    #[serde(default)]
    name: String,
    source: serde_json::Map<String, serde_json::Value>,
}

/// Builder for [`RemoteSource`].
pub struct RemoteSourceBuilder {
    uri: String,
    application: String,
    profile: String,
    label: Option<String>,
    credentials: Option<(String, Option<String>)>,
    timeout: Duration,
}

impl RemoteSourceBuilder {
    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn basic_auth(mut self, username: &str, password: Option<&str>) -> Self {
        self.credentials = Some((username.to_string(), password.map(str::to_string)));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<RemoteSource, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;
        let name = format!("remote:{}/{}/{}", self.uri.trim_end_matches('/'), self.application, self.profile);
        Ok(RemoteSource {
            client,
            name,
            uri: self.uri,
            application: self.application,
            profile: self.profile,
            label: self.label,
            credentials: self.credentials,
        })
    }
}

/// Fetches properties from a config server over HTTP.
pub struct RemoteSource {
    client: reqwest::Client,
    name: String,
    uri: String,
    application: String,
    profile: String,
    label: Option<String>,
    credentials: Option<(String, Option<String>)>,
}

impl RemoteSource {
    pub fn builder(uri: &str, application: &str, profile: &str) -> RemoteSourceBuilder {
        RemoteSourceBuilder {
            uri: uri.to_string(),
            application: application.to_string(),
            profile: profile.to_string(),
            label: None,
            credentials: None,
            timeout: Duration::from_secs(5),
        }
    }

    /// URL of the environment endpoint for this application/profile/label.
    pub fn environment_url(&self) -> Result<Url, ConfigFetchError> {
        let mut url = Url::parse(&self.uri).map_err(|e| ConfigFetchError::unreachable(&self.name, e))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ConfigFetchError::unreachable(&self.name, "URI cannot be a base"))?;
            segments.pop_if_empty();
            segments.push(&self.application);
            segments.push(&self.profile);
            if let Some(label) = &self.label {
                segments.push(label);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl ConfigSource for RemoteSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Properties, ConfigFetchError> {
        let url = self.environment_url()?;

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, password.as_ref());
        }

        let response = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ConfigFetchError::unreachable(&self.name, e))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| ConfigFetchError::unreachable(&self.name, e))?;

        let properties = parse_environment(&body).map_err(|e| ConfigFetchError::malformed(&self.name, e))?;
        tracing::debug!(
            source = %self.name,
            properties = properties.len(),
            "Fetched remote environment"
        );
        Ok(properties)
    }
}

/// Merge the property sources of an environment document, first source wins.
fn parse_environment(body: &[u8]) -> Result<Properties, serde_json::Error> {
    let environment: Environment = serde_json::from_slice(body)?;

    let mut properties = Properties::new();
    for property_source in &environment.property_sources {
        tracing::trace!(
            property_source = %property_source.name,
            version = environment.version.as_deref().unwrap_or("-"),
            "Merging property source"
        );
        for (key, value) in &property_source.source {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            properties.entry(key.clone()).or_insert(text);
        }
    }
    Ok(properties)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earlier_property_sources_win() {
        let body = br#"{
            "name": "config-client",
            "profiles": ["dev"],
            "label": null,
            "version": "abc123",
            "propertySources": [
                { "name": "config-client-dev.yml", "source": { "example.message": "dev" } },
                { "name": "config-client.yml", "source": { "example.message": "base", "example.count": 4 } }
            ]
        }"#;

        let properties = parse_environment(body).unwrap();
        assert_eq!(properties["example.message"], "dev");
        assert_eq!(properties["example.count"], "4");
    }

    #[test]
    fn test_rejects_non_environment_body() {
        assert!(parse_environment(b"<html>oops</html>").is_err());
        assert!(parse_environment(br#"{"propertySources": [{"name": "x"}]}"#).is_err());
    }

    #[test]
    fn test_environment_url_appends_segments() {
        let source = RemoteSource::builder("http://localhost:8888/config/", "config-client", "prod")
            .label("release/1.0")
            .build()
            .unwrap();

        assert_eq!(
            source.environment_url().unwrap().as_str(),
            "http://localhost:8888/config/config-client/prod/release%2F1.0"
        );
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Port 9 (discard) on localhost is closed in test environments.
        let source = RemoteSource::builder("http://127.0.0.1:9", "app", "default")
            .timeout(Duration::from_secs(1))
            .build()
            .unwrap();

        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, ConfigFetchError::Unreachable { .. }));
    }
}
