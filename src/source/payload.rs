//! Response bodies of the SysMonitor backend.
//!
//! Two backend contracts exist. The combined contract serves everything from
//! `/api/metrics`; the paged contract splits device metrics
//! (`/api/device_metrics`) from weather data (`/api/weather_data`).

use serde::{Deserialize, Serialize};

use crate::data::{DeviceMetricRecord, ThirdPartyMetricRecord};

/// Body of `GET /api/metrics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsPayload {
    #[serde(default)]
    pub device_metrics: Vec<DeviceMetricRecord>,
    #[serde(default)]
    pub third_party_metrics: Vec<ThirdPartyMetricRecord>,
}

/// Body of `GET /api/device_metrics?page=&limit=`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceMetricsPage {
    #[serde(default)]
    pub device_metrics: Vec<DeviceMetricRecord>,
}

/// Body of `GET /api/weather_data?type=`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherDataPayload {
    #[serde(default)]
    pub weather_data: Vec<ThirdPartyMetricRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_metrics_payload() {
        let json = r#"{
            "device_metrics": [
                {"device_id": "d1", "metric_id": "cpu_usage", "value": 30, "timestamp": "2025-01-01T00:00:00Z"}
            ],
            "third_party_metrics": [
                {"name": "Humidity Level", "value": 60, "latitude": 53.1, "longitude": -8.2, "timestamp": "2025-01-01T00:00:00Z"}
            ]
        }"#;

        let payload: MetricsPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.device_metrics.len(), 1);
        assert_eq!(payload.third_party_metrics.len(), 1);
        assert_eq!(payload.third_party_metrics[0].name, "Humidity Level");
    }

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let payload: MetricsPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.device_metrics.is_empty());
        assert!(payload.third_party_metrics.is_empty());

        let page: DeviceMetricsPage = serde_json::from_str("{}").unwrap();
        assert!(page.device_metrics.is_empty());
    }

    #[test]
    fn test_malformed_record_fails_whole_payload() {
        let json = r#"{"weather_data": [{"name": "Pressure", "value": 1013}]}"#;
        assert!(serde_json::from_str::<WeatherDataPayload>(json).is_err());
    }
}
