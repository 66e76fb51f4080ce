//! SysMonitor backend over HTTP.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sysmon_dash::source::{HttpBackend, MetricsBackend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = HttpBackend::builder()
//!         .endpoint("http://localhost:5000")
//!         .build()?;
//!
//!     let payload = backend.fetch_metrics().await?;
//!     println!("{} device samples", payload.device_metrics.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{DeviceMetricsPage, FetchError, MetricsBackend, MetricsPayload, WeatherDataPayload};
use crate::data::MetricCategory;

const DEFAULT_ENDPOINT: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend client issuing plain `GET`s against the dashboard API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoint: String,
    collection_url: Option<String>,
    description: String,
}

impl HttpBackend {
    /// Create a new builder for configuring the backend.
    pub fn builder() -> HttpBackendBuilder {
        HttpBackendBuilder::default()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.url(path);
        tracing::debug!(url = %url, ?query, "GET");

        let response = self.client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl MetricsBackend for HttpBackend {
    async fn fetch_metrics(&self) -> Result<MetricsPayload, FetchError> {
        self.get_json("/api/metrics", &[]).await
    }

    async fn fetch_device_page(
        &self,
        page: usize,
        limit: usize,
    ) -> Result<DeviceMetricsPage, FetchError> {
        self.get_json(
            "/api/device_metrics",
            &[("page", page.to_string()), ("limit", limit.to_string())],
        )
        .await
    }

    async fn fetch_weather(
        &self,
        category: MetricCategory,
    ) -> Result<WeatherDataPayload, FetchError> {
        self.get_json("/api/weather_data", &[("type", category.as_param().to_string())])
            .await
    }

    async fn start_collection(&self) -> Result<(), FetchError> {
        let url = self
            .collection_url
            .as_deref()
            .ok_or(FetchError::NotConfigured("collection URL"))?;
        tracing::info!(url = %url, "Requesting data collection start");

        let response = self.client.post(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Builder for HttpBackend.
#[derive(Debug, Default)]
pub struct HttpBackendBuilder {
    endpoint: Option<String>,
    collection_url: Option<String>,
    timeout: Option<Duration>,
}

impl HttpBackendBuilder {
    /// Set the backend base URL (default: "http://localhost:5000").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the URL that starts data collection on the backend.
    pub fn collection_url(mut self, url: Option<String>) -> Self {
        self.collection_url = url;
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the backend.
    pub fn build(self) -> Result<HttpBackend, FetchError> {
        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();
        let description = format!("http: {}", endpoint);

        Ok(HttpBackend {
            client,
            endpoint,
            collection_url: self.collection_url,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let backend = HttpBackend::builder().build().unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:5000");
        assert_eq!(backend.description(), "http: http://localhost:5000");
        assert!(backend.collection_url.is_none());
    }

    #[test]
    fn test_builder_trims_trailing_slash() {
        let backend = HttpBackend::builder()
            .endpoint("http://sysmon.local:8080/")
            .build()
            .unwrap();
        assert_eq!(backend.url("/api/metrics"), "http://sysmon.local:8080/api/metrics");
    }

    #[tokio::test]
    async fn test_start_collection_without_url() {
        let backend = HttpBackend::builder().build().unwrap();
        let err = backend.start_collection().await.unwrap_err();
        assert!(matches!(err, FetchError::NotConfigured(_)));
    }
}
