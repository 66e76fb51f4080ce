//! Latest snapshot of device and weather metrics.

use std::collections::BTreeMap;

use super::category::MetricCategory;
use super::record::{DeviceMetricRecord, ThirdPartyMetricRecord};

/// Backend metric ids that back the device-usage categories.
///
/// Deployments identify metrics by opaque ids (often UUIDs), so the mapping
/// is configuration rather than a constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMetricIds {
    pub cpu: String,
    pub ram: String,
}

impl Default for DeviceMetricIds {
    fn default() -> Self {
        Self {
            cpu: "cpu_usage".to_string(),
            ram: "ram_usage".to_string(),
        }
    }
}

impl DeviceMetricIds {
    /// Backing metric id for a device category, `None` for weather.
    pub fn for_category(&self, category: MetricCategory) -> Option<&str> {
        match category {
            MetricCategory::CpuUsage => Some(&self.cpu),
            MetricCategory::RamUsage => Some(&self.ram),
            _ => None,
        }
    }
}

/// Holds the most recent device and weather records.
///
/// Every ingest replaces the previous snapshot wholesale. Arrival order is
/// preserved and is assumed to be chronological.
#[derive(Debug, Clone, Default)]
pub struct MetricStore {
    metric_ids: DeviceMetricIds,
    device: Vec<DeviceMetricRecord>,
    weather: BTreeMap<MetricCategory, Vec<ThirdPartyMetricRecord>>,
}

impl MetricStore {
    pub fn new(metric_ids: DeviceMetricIds) -> Self {
        Self {
            metric_ids,
            device: Vec::new(),
            weather: BTreeMap::new(),
        }
    }

    /// Replace the device-metric snapshot.
    pub fn ingest_device_metrics(&mut self, records: Vec<DeviceMetricRecord>) {
        self.device = records;
    }

    /// Partition weather records by category keyword and replace the cache.
    ///
    /// Records whose name matches no keyword are dropped.
    pub fn ingest_weather_metrics(&mut self, records: Vec<ThirdPartyMetricRecord>) {
        let mut weather: BTreeMap<MetricCategory, Vec<ThirdPartyMetricRecord>> = BTreeMap::new();
        for record in records {
            if let Some(category) = MetricCategory::classify_weather(&record.name) {
                weather.entry(category).or_default().push(record);
            }
        }
        self.weather = weather;
    }

    /// Replace the cached records for a single weather category.
    ///
    /// Used for on-demand fetches, where the backend has already scoped the
    /// records to `category`.
    pub fn cache_weather(&mut self, category: MetricCategory, records: Vec<ThirdPartyMetricRecord>) {
        self.weather.insert(category, records);
    }

    /// Device records backing `category`, in arrival order.
    pub fn query_device(&self, category: MetricCategory) -> Vec<&DeviceMetricRecord> {
        let Some(metric_id) = self.metric_ids.for_category(category) else {
            return Vec::new();
        };
        self.device.iter().filter(|r| r.metric_id == metric_id).collect()
    }

    /// Cached weather records for `category`, empty if never populated.
    pub fn query_weather(&self, category: MetricCategory) -> &[ThirdPartyMetricRecord] {
        self.weather.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the weather cache has an entry for `category`.
    pub fn has_weather(&self, category: MetricCategory) -> bool {
        self.weather.contains_key(&category)
    }

    /// The full device-metric sequence.
    pub fn device_metrics(&self) -> &[DeviceMetricRecord] {
        &self.device
    }

    /// Number of weather records across all categories.
    pub fn weather_count(&self) -> usize {
        self.weather.values().map(Vec::len).sum()
    }
}
