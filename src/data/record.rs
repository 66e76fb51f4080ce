//! Metric records as received from the SysMonitor backend.
//!
//! Records are immutable once received. They live until the next fetch
//! replaces them.

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// One sample of a device-level measurement (e.g. CPU usage).
///
/// Backend revisions disagree on field names, so both spellings are accepted:
/// `device_id`/`device_name` and `metric_id`/`metric_name`/`metric_type_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceMetricRecord {
    #[serde(alias = "device_name", deserialize_with = "string_or_number")]
    pub device_id: String,
    #[serde(
        alias = "metric_name",
        alias = "metric_type_id",
        deserialize_with = "string_or_number"
    )]
    pub metric_id: String,
    pub value: f64,
    pub timestamp: String,
}

/// A geolocated third-party weather observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThirdPartyMetricRecord {
    pub name: String,
    pub value: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
}

/// Accepts a JSON string or integer and yields its string form.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumber;

    impl Visitor<'_> for StringOrNumber {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or an integer")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}
