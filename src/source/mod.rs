//! Backend abstraction for fetching metrics.
//!
//! [`MetricsBackend`] is the seam between the polling controller and the
//! network. [`HttpBackend`] talks to the real dashboard API; tests substitute
//! an in-memory implementation.

mod error;
mod http;
mod payload;

pub use error::FetchError;
pub use http::{HttpBackend, HttpBackendBuilder};
pub use payload::{DeviceMetricsPage, MetricsPayload, WeatherDataPayload};

use std::fmt::{self, Debug};
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::data::MetricCategory;

/// Which backend API shape the dashboard polls.
///
/// The two shapes come from different backend revisions and are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Contract {
    /// `GET /api/metrics` returns device and weather metrics together.
    #[default]
    Combined,
    /// `GET /api/device_metrics?page&limit`, plus `GET /api/weather_data?type` on demand.
    Paged,
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contract::Combined => f.write_str("combined"),
            Contract::Paged => f.write_str("paged"),
        }
    }
}

impl FromStr for Contract {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "combined" => Ok(Contract::Combined),
            "paged" => Ok(Contract::Paged),
            other => Err(format!("Unknown backend contract: {}", other)),
        }
    }
}

/// Source of metric payloads.
///
/// Every method is a single request with no retry; callers decide what a
/// failure means.
#[async_trait]
pub trait MetricsBackend: Send + Sync + Debug {
    /// Fetch device and weather metrics in one call (combined contract).
    async fn fetch_metrics(&self) -> Result<MetricsPayload, FetchError>;

    /// Fetch one page of device metrics (paged contract).
    async fn fetch_device_page(
        &self,
        page: usize,
        limit: usize,
    ) -> Result<DeviceMetricsPage, FetchError>;

    /// Fetch weather observations for one category.
    async fn fetch_weather(
        &self,
        category: MetricCategory,
    ) -> Result<WeatherDataPayload, FetchError>;

    /// Ask the backend to start collecting data.
    async fn start_collection(&self) -> Result<(), FetchError>;

    /// Human-readable description, shown in the status bar.
    fn description(&self) -> &str;
}
