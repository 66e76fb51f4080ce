//! Fetch cadence, on-demand requests, and response ordering.
//!
//! The poller is split in two halves:
//!
//! - [`PollingController`] is plain state owned by the UI thread. It decides
//!   which requests to issue (as [`Command`]s) and applies the resulting
//!   [`Update`]s to the [`MetricStore`](crate::data::MetricStore).
//! - [`PollHandle`] runs the ticker and fetch worker on the tokio runtime.
//!   Fetches run concurrently, so updates can arrive out of order; every
//!   command carries a sequence number and stale responses are discarded
//!   by the [`SequenceGate`].
//!
//! ```text
//!  ticker ──Tick──▶ ┌──────────────┐ ──Command──▶ worker ──▶ MetricsBackend
//!                   │  Controller  │                │
//!  keys ──────────▶ │  (UI thread) │ ◀──Update──────┘
//!                   └──────────────┘
//! ```

mod controller;
mod worker;

pub use controller::{PollingController, RequestKey, SequenceGate};
pub use worker::{execute, PollHandle};

use crate::data::MetricCategory;
use crate::source::{DeviceMetricsPage, FetchError, MetricsPayload, WeatherDataPayload};

/// A request for the fetch worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Combined contract: `GET /api/metrics`.
    FetchMetrics { seq: u64 },
    /// Paged contract: `GET /api/device_metrics?page&limit`.
    FetchDevicePage { seq: u64, page: usize, limit: usize },
    /// `GET /api/weather_data?type=<category>`.
    FetchWeather { seq: u64, category: MetricCategory },
    /// `POST` to the configured collection endpoint.
    StartCollection,
}

/// A message from the ticker or the fetch worker.
#[derive(Debug)]
pub enum Update {
    /// The refresh interval elapsed.
    Tick,
    Snapshot {
        seq: u64,
        result: Result<MetricsPayload, FetchError>,
    },
    DevicePage {
        seq: u64,
        page: usize,
        result: Result<DeviceMetricsPage, FetchError>,
    },
    Weather {
        seq: u64,
        category: MetricCategory,
        result: Result<WeatherDataPayload, FetchError>,
    },
    Collection {
        result: Result<(), FetchError>,
    },
}
