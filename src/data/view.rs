//! Derivation of chart-ready data from the metric store.
//!
//! [`ViewModel`] reads a [`MetricStore`] snapshot and produces exactly what a
//! renderer needs for one tab: a gauge reading, a histogram series, map
//! markers, or a page of table rows. It never touches rendering.

use chrono::{DateTime, NaiveDateTime};

use super::category::MetricCategory;
use super::record::DeviceMetricRecord;
use super::store::MetricStore;

/// Naive timestamp layouts the backend has been seen to emit.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%a, %d %b %Y %H:%M:%S GMT",
];

/// Successive raw values with their axis labels.
///
/// A bar series, not a binned distribution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl HistogramSeries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// A point annotation on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub value: f64,
}

/// Table pagination: a 1-based page and a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    page_size: usize,
}

impl Pagination {
    /// Start on page 1. A zero page size is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Move by `delta` pages, never below page 1.
    ///
    /// Returns true if the page changed.
    pub fn change_page(&mut self, delta: i64) -> bool {
        let target = (self.current_page as i64).saturating_add(delta).max(1) as usize;
        let changed = target != self.current_page;
        self.current_page = target;
        changed
    }

    /// Number of pages needed for `total` rows (at least 1).
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size).max(1)
    }
}

/// Rows to display: one page of `records`, or all of them.
pub fn table_rows<'a>(
    records: &'a [DeviceMetricRecord],
    pagination: Option<&Pagination>,
) -> &'a [DeviceMetricRecord] {
    let Some(p) = pagination else {
        return records;
    };
    let start = (p.current_page - 1).saturating_mul(p.page_size).min(records.len());
    let end = p.current_page.saturating_mul(p.page_size).min(records.len());
    &records[start..end]
}

/// Format a backend timestamp for a chart axis (`HH:MM`).
///
/// Unparseable timestamps are returned unchanged.
pub fn format_axis_label(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.format("%H:%M").to_string();
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(timestamp, fmt).ok())
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Read-only view over a [`MetricStore`].
#[derive(Debug, Clone, Copy)]
pub struct ViewModel<'a> {
    store: &'a MetricStore,
}

impl<'a> ViewModel<'a> {
    pub fn new(store: &'a MetricStore) -> Self {
        Self { store }
    }

    /// Latest reading for a device category, or 0 if there is none.
    ///
    /// "Latest" is the last record in arrival order; the ingest contract
    /// requires the backend to deliver records chronologically.
    pub fn gauge_value(&self, category: MetricCategory) -> f64 {
        self.store.query_device(category).last().map_or(0.0, |r| r.value)
    }

    /// Remaining capacity to 100. Not clamped: readings above 100 go negative.
    pub fn gauge_complement(&self, category: MetricCategory) -> f64 {
        100.0 - self.gauge_value(category)
    }

    /// Every record for `category` as a bar series, in arrival order.
    pub fn histogram_series(&self, category: MetricCategory) -> HistogramSeries {
        if category.is_device() {
            let records = self.store.query_device(category);
            HistogramSeries {
                labels: records.iter().map(|r| format_axis_label(&r.timestamp)).collect(),
                values: records.iter().map(|r| r.value).collect(),
            }
        } else {
            let records = self.store.query_weather(category);
            HistogramSeries {
                labels: records.iter().map(|r| format_axis_label(&r.timestamp)).collect(),
                values: records.iter().map(|r| r.value).collect(),
            }
        }
    }

    /// Map markers for a weather category.
    pub fn map_markers(&self, category: MetricCategory) -> Vec<MapMarker> {
        self.store
            .query_weather(category)
            .iter()
            .map(|r| MapMarker {
                latitude: r.latitude,
                longitude: r.longitude,
                name: r.name.clone(),
                value: r.value,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::ThirdPartyMetricRecord;

    fn device(metric: &str, value: f64, timestamp: &str) -> DeviceMetricRecord {
        DeviceMetricRecord {
            device_id: "d1".to_string(),
            metric_id: metric.to_string(),
            value,
            timestamp: timestamp.to_string(),
        }
    }

    fn store_with(records: Vec<DeviceMetricRecord>) -> MetricStore {
        let mut store = MetricStore::default();
        store.ingest_device_metrics(records);
        store
    }

    #[test]
    fn test_gauge_value_empty_is_zero() {
        let store = MetricStore::default();
        let view = ViewModel::new(&store);
        assert_eq!(view.gauge_value(MetricCategory::CpuUsage), 0.0);
        assert_eq!(view.gauge_complement(MetricCategory::CpuUsage), 100.0);
    }

    #[test]
    fn test_gauge_value_single() {
        let store = store_with(vec![device("cpu_usage", 42.0, "t")]);
        assert_eq!(ViewModel::new(&store).gauge_value(MetricCategory::CpuUsage), 42.0);
    }

    #[test]
    fn test_gauge_value_last_wins() {
        let store = store_with(vec![device("cpu_usage", 10.0, "t1"), device("cpu_usage", 77.0, "t0")]);
        // Arrival order, not timestamp order
        assert_eq!(ViewModel::new(&store).gauge_value(MetricCategory::CpuUsage), 77.0);
    }

    #[test]
    fn test_gauge_cpu_55() {
        let store = store_with(vec![device("cpu_usage", 55.0, "t")]);
        let view = ViewModel::new(&store);
        assert_eq!(view.gauge_value(MetricCategory::CpuUsage), 55.0);
        assert_eq!(view.gauge_complement(MetricCategory::CpuUsage), 45.0);
        assert_eq!(view.gauge_value(MetricCategory::RamUsage), 0.0);
    }

    #[test]
    fn test_gauge_complement_is_not_clamped() {
        let store = store_with(vec![device("ram_usage", 120.0, "t")]);
        assert_eq!(ViewModel::new(&store).gauge_complement(MetricCategory::RamUsage), -20.0);
    }

    #[test]
    fn test_histogram_series_device() {
        let store = store_with(vec![
            device("cpu_usage", 10.0, "2025-01-01T10:15:00Z"),
            device("ram_usage", 50.0, "2025-01-01T10:16:00Z"),
            device("cpu_usage", 20.0, "2025-01-01 10:17:30"),
        ]);
        let series = ViewModel::new(&store).histogram_series(MetricCategory::CpuUsage);
        assert_eq!(series.values, vec![10.0, 20.0]);
        assert_eq!(series.labels, vec!["10:15".to_string(), "10:17".to_string()]);
    }

    #[test]
    fn test_histogram_series_weather() {
        let mut store = MetricStore::default();
        store.ingest_weather_metrics(vec![
            ThirdPartyMetricRecord {
                name: "Temperature".to_string(),
                value: 14.5,
                latitude: 53.3,
                longitude: -6.2,
                timestamp: "2025-01-01T08:00:00+01:00".to_string(),
            },
            ThirdPartyMetricRecord {
                name: "Temperature".to_string(),
                value: 15.0,
                latitude: 53.3,
                longitude: -6.2,
                timestamp: "yesterday".to_string(),
            },
        ]);
        let series = ViewModel::new(&store).histogram_series(MetricCategory::Temperature);
        assert_eq!(series.values, vec![14.5, 15.0]);
        assert_eq!(series.labels, vec!["08:00".to_string(), "yesterday".to_string()]);
    }

    #[test]
    fn test_map_markers() {
        let mut store = MetricStore::default();
        store.ingest_weather_metrics(vec![ThirdPartyMetricRecord {
            name: "Humidity Level".to_string(),
            value: 60.0,
            latitude: 53.1,
            longitude: -8.2,
            timestamp: "2025-01-01T00:00:00Z".to_string(),
        }]);
        let view = ViewModel::new(&store);
        let markers = view.map_markers(MetricCategory::Humidity);
        assert_eq!(
            markers,
            vec![MapMarker {
                latitude: 53.1,
                longitude: -8.2,
                name: "Humidity Level".to_string(),
                value: 60.0,
            }]
        );
        assert!(view.map_markers(MetricCategory::Pressure).is_empty());
    }

    #[test]
    fn test_change_page_clamps_at_one() {
        let mut p = Pagination::new(5);
        assert!(!p.change_page(-5));
        assert_eq!(p.current_page(), 1);

        assert!(p.change_page(2));
        assert_eq!(p.current_page(), 3);

        p.change_page(i64::MIN);
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn test_table_rows_pagination() {
        let records: Vec<_> = (0..12).map(|i| device("cpu_usage", i as f64, "t")).collect();
        let mut p = Pagination::new(5);

        assert_eq!(table_rows(&records, Some(&p)).len(), 5);
        assert_eq!(table_rows(&records, Some(&p))[0].value, 0.0);

        p.change_page(2);
        let page3 = table_rows(&records, Some(&p));
        assert_eq!(page3.len(), 2);
        assert_eq!(page3[0].value, 10.0);

        p.change_page(5);
        assert!(table_rows(&records, Some(&p)).is_empty());

        assert_eq!(table_rows(&records, None).len(), 12);
        assert_eq!(p.page_count(records.len()), 3);
        assert_eq!(p.page_count(0), 1);
    }
}
