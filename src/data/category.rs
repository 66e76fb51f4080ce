//! Metric categories: the cache key and the tab identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A metric category shown as one dashboard tab.
///
/// Declaration order is tab order; the first variant is the initial tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricCategory {
    /// Device CPU usage in percent.
    CpuUsage,
    /// Device RAM usage in percent.
    RamUsage,
    AirQuality,
    Humidity,
    Precipitation,
    Pressure,
    Temperature,
    UvIndex,
    WindSpeed,
}

impl MetricCategory {
    /// Every category, in tab order.
    pub const ALL: [MetricCategory; 9] = [
        MetricCategory::CpuUsage,
        MetricCategory::RamUsage,
        MetricCategory::AirQuality,
        MetricCategory::Humidity,
        MetricCategory::Precipitation,
        MetricCategory::Pressure,
        MetricCategory::Temperature,
        MetricCategory::UvIndex,
        MetricCategory::WindSpeed,
    ];

    /// The weather categories, in tab order.
    pub const WEATHER: [MetricCategory; 7] = [
        MetricCategory::AirQuality,
        MetricCategory::Humidity,
        MetricCategory::Precipitation,
        MetricCategory::Pressure,
        MetricCategory::Temperature,
        MetricCategory::UvIndex,
        MetricCategory::WindSpeed,
    ];

    /// Returns true for the device-usage categories.
    pub fn is_device(self) -> bool {
        matches!(self, MetricCategory::CpuUsage | MetricCategory::RamUsage)
    }

    /// Returns true for the third-party weather categories.
    pub fn is_weather(self) -> bool {
        !self.is_device()
    }

    /// Substring that a weather record's `name` must contain to belong here.
    ///
    /// Matching is case-sensitive. Device categories have no keyword.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            MetricCategory::CpuUsage | MetricCategory::RamUsage => None,
            MetricCategory::AirQuality => Some("Air Quality"),
            MetricCategory::Humidity => Some("Humidity"),
            MetricCategory::Precipitation => Some("Precipitation"),
            MetricCategory::Pressure => Some("Pressure"),
            MetricCategory::Temperature => Some("Temperature"),
            MetricCategory::UvIndex => Some("UV Index"),
            MetricCategory::WindSpeed => Some("Wind Speed"),
        }
    }

    /// Identifier used on the wire (`/api/weather_data?type=...`).
    pub fn as_param(self) -> &'static str {
        match self {
            MetricCategory::CpuUsage => "CPUUsage",
            MetricCategory::RamUsage => "RAMUsage",
            MetricCategory::AirQuality => "AirQuality",
            MetricCategory::Humidity => "Humidity",
            MetricCategory::Precipitation => "Precipitation",
            MetricCategory::Pressure => "Pressure",
            MetricCategory::Temperature => "Temperature",
            MetricCategory::UvIndex => "UVIndex",
            MetricCategory::WindSpeed => "WindSpeed",
        }
    }

    /// Human-readable label for tabs and chart titles.
    pub fn label(self) -> &'static str {
        match self {
            MetricCategory::CpuUsage => "CPU Usage",
            MetricCategory::RamUsage => "RAM Usage",
            MetricCategory::AirQuality => "Air Quality",
            MetricCategory::Humidity => "Humidity",
            MetricCategory::Precipitation => "Precipitation",
            MetricCategory::Pressure => "Pressure",
            MetricCategory::Temperature => "Temperature",
            MetricCategory::UvIndex => "UV Index",
            MetricCategory::WindSpeed => "Wind Speed",
        }
    }

    /// Compact label for the tab bar.
    pub fn short_label(self) -> &'static str {
        match self {
            MetricCategory::CpuUsage => "CPU",
            MetricCategory::RamUsage => "RAM",
            MetricCategory::AirQuality => "AirQ",
            MetricCategory::Humidity => "Humid",
            MetricCategory::Precipitation => "Precip",
            MetricCategory::Pressure => "Press",
            MetricCategory::Temperature => "Temp",
            MetricCategory::UvIndex => "UV",
            MetricCategory::WindSpeed => "Wind",
        }
    }

    /// Position of this category in tab order.
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    /// Cycle to the next tab.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Cycle to the previous tab.
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Finds the weather category whose keyword occurs in `name`.
    pub fn classify_weather(name: &str) -> Option<Self> {
        Self::WEATHER
            .into_iter()
            .find(|c| c.keyword().is_some_and(|k| name.contains(k)))
    }
}

impl Default for MetricCategory {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for MetricCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_param().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown metric category: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_tab_is_first_declared() {
        assert_eq!(MetricCategory::default(), MetricCategory::CpuUsage);
    }

    #[test]
    fn test_tab_cycling_wraps() {
        assert_eq!(MetricCategory::WindSpeed.next(), MetricCategory::CpuUsage);
        assert_eq!(MetricCategory::CpuUsage.prev(), MetricCategory::WindSpeed);
        assert_eq!(MetricCategory::RamUsage.next(), MetricCategory::AirQuality);
    }

    #[test]
    fn test_weather_keywords_are_disjoint() {
        for a in MetricCategory::WEATHER {
            for b in MetricCategory::WEATHER {
                if a != b {
                    let (ka, kb) = (a.keyword().unwrap(), b.keyword().unwrap());
                    assert!(!ka.contains(kb), "{} contains {}", ka, kb);
                }
            }
        }
    }

    #[test]
    fn test_classify_weather() {
        assert_eq!(
            MetricCategory::classify_weather("Humidity Level"),
            Some(MetricCategory::Humidity)
        );
        assert_eq!(
            MetricCategory::classify_weather("Dublin Air Quality Index"),
            Some(MetricCategory::AirQuality)
        );
        // Case-sensitive
        assert_eq!(MetricCategory::classify_weather("humidity level"), None);
        assert_eq!(MetricCategory::classify_weather("Sunshine"), None);
    }

    #[test]
    fn test_param_round_trip() {
        assert_eq!("UVIndex".parse::<MetricCategory>(), Ok(MetricCategory::UvIndex));
        assert_eq!("cpuusage".parse::<MetricCategory>(), Ok(MetricCategory::CpuUsage));
        assert!("Snowfall".parse::<MetricCategory>().is_err());
    }
}
