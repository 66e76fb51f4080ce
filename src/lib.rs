//! # sysmon-dash
//!
//! A terminal dashboard for SysMonitor device telemetry and weather metrics.
//!
//! The dashboard polls a SysMonitor backend over HTTP, keeps the latest
//! snapshot in memory, and renders one metric category per tab: a usage
//! gauge, a history bar chart and a paginated table for device metrics, or a
//! world map with observation markers for weather metrics.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌──────────┐  │
//! │  │   app   │───▶│   data   │───▶│   ui    │───▶│ Terminal │  │
//! │  │ (state) │    │(store,   │    │(render) │    │          │  │
//! │  └────┬────┘    │ view)    │    └─────────┘    └──────────┘  │
//! │       │         └──────────┘                                 │
//! │       ▼                                                      │
//! │  ┌─────────┐    ┌──────────┐                                 │
//! │  │ poller  │───▶│  source  │◀── HttpBackend | test doubles   │
//! │  │(ticker, │    │(backend) │                                 │
//! │  │ worker) │    └──────────┘                                 │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: wire records, the [`MetricStore`], and the [`ViewModel`]
//!   that derives gauge values, bar series, map markers and table pages
//! - **[`source`]**: the [`MetricsBackend`] trait and its reqwest implementation
//! - **[`poller`]**: the [`PollingController`] state machine plus the
//!   background ticker and fetch worker ([`PollHandle`])
//! - **[`app`]** / **[`events`]**: UI state and key/mouse handling
//! - **[`ui`]**: ratatui rendering
//! - **[`config`]**: layered settings
//!
//! ## Usage
//!
//! ```bash
//! # Poll the combined /api/metrics endpoint every minute
//! sysmon-dash --url http://localhost:5000
//!
//! # Poll a paged backend every 30 seconds and print one snapshot as JSON
//! sysmon-dash --contract paged --refresh 30s --once
//! ```
//!
//! ### As a library
//!
//! ```
//! use sysmon_dash::{DeviceMetricIds, MetricCategory, PollingController};
//! use sysmon_dash::source::Contract;
//!
//! let mut controller = PollingController::new(Contract::Combined, DeviceMetricIds::default(), 5);
//! controller.refresh();
//! assert_eq!(controller.take_commands().len(), 1);
//!
//! let view = controller.view();
//! assert_eq!(view.gauge_value(MetricCategory::CpuUsage), 0.0);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod poller;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{
    DeviceMetricIds, DeviceMetricRecord, MetricCategory, MetricStore, ThirdPartyMetricRecord,
    ViewModel,
};
pub use poller::{PollHandle, PollingController};
pub use source::{FetchError, HttpBackend, MetricsBackend};
