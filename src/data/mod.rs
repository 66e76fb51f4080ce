//! Metric records, the snapshot store, and the derived view model.
//!
//! ## Submodules
//!
//! - [`record`]: Wire records for device telemetry and weather observations
//! - [`category`]: [`MetricCategory`], the cache key and tab identifier
//! - [`store`]: [`MetricStore`], the latest fetched snapshot
//! - [`view`]: [`ViewModel`], gauge/histogram/marker/table derivation
//! - [`duration`]: Parsing and formatting of duration strings (e.g. "60s", "1m")
//!
//! ## Data Flow
//!
//! ```text
//! MetricsPayload (raw JSON)
//!        │
//!        ▼
//! MetricStore::ingest_*()
//!        │
//!        ▼
//! ViewModel::{gauge_value, histogram_series, map_markers}, table_rows()
//!        │
//!        ▼
//! ui::render_*
//! ```

pub mod category;
pub mod duration;
pub mod record;
pub mod store;
pub mod view;

pub use category::MetricCategory;
pub use record::{DeviceMetricRecord, ThirdPartyMetricRecord};
pub use store::{DeviceMetricIds, MetricStore};
pub use view::{table_rows, HistogramSeries, MapMarker, Pagination, ViewModel};
