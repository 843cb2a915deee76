use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, ValidationGap};

/// A geocoding hit: a place name and its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationCandidate {
    pub fn new(display_name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            display_name: display_name.into(),
            latitude,
            longitude,
        }
    }

    /// Portion of the display name before the first comma.
    pub fn city_name(&self) -> &str {
        self.display_name.split(',').next().unwrap_or_default().trim()
    }

    /// Last comma-separated segment of the display name (usually the country).
    pub fn qualifier(&self) -> Option<&str> {
        let (_, last) = self.display_name.rsplit_once(',')?;
        Some(last.trim()).filter(|s| !s.is_empty())
    }
}

/// Surface-level series returned by the point-forecast service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeriesKey {
    Temperature,
    WindU,
    WindV,
    Humidity,
    Pressure,
    DewPoint,
    LowClouds,
    MidClouds,
    HighClouds,
}

impl SeriesKey {
    /// Key under which the series appears in the response payload.
    pub fn wire_name(&self) -> &'static str {
        match self {
            SeriesKey::Temperature => "temp-surface",
            SeriesKey::WindU => "wind_u-surface",
            SeriesKey::WindV => "wind_v-surface",
            SeriesKey::Humidity => "rh-surface",
            SeriesKey::Pressure => "pressure-surface",
            SeriesKey::DewPoint => "dewpoint-surface",
            SeriesKey::LowClouds => "lclouds-surface",
            SeriesKey::MidClouds => "mclouds-surface",
            SeriesKey::HighClouds => "hclouds-surface",
        }
    }

    pub const fn all() -> &'static [SeriesKey] {
        &[
            SeriesKey::Temperature,
            SeriesKey::WindU,
            SeriesKey::WindV,
            SeriesKey::Humidity,
            SeriesKey::Pressure,
            SeriesKey::DewPoint,
            SeriesKey::LowClouds,
            SeriesKey::MidClouds,
            SeriesKey::HighClouds,
        ]
    }
}

impl std::fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Raw point-forecast payload for one coordinate pair.
///
/// Series are aligned by index with `timestamps`. A missing series, an empty
/// series, or a `null` sample all read as "absent" through [`Self::first`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecastSample {
    // Never empty; enforced by `new`.
    timestamps: Vec<DateTime<Utc>>,
    series: BTreeMap<SeriesKey, Vec<Option<f64>>>,
}

impl RawForecastSample {
    /// Build a sample from epoch-millisecond timestamps and per-parameter series.
    pub fn new(
        timestamps_ms: &[i64],
        series: BTreeMap<SeriesKey, Vec<Option<f64>>>,
    ) -> Result<Self, ForecastError> {
        if timestamps_ms.is_empty() {
            return Err(ForecastError::EmptyTimeline);
        }

        let timestamps = timestamps_ms
            .iter()
            .map(|&ms| {
                DateTime::from_timestamp_millis(ms).ok_or(ForecastError::InvalidTimestamp(ms))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { timestamps, series })
    }

    /// Earliest sample time.
    pub fn first_timestamp(&self) -> DateTime<Utc> {
        self.timestamps[0]
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Value of `key` at index 0, if the service supplied one.
    pub fn first(&self, key: SeriesKey) -> Option<f64> {
        self.series.get(&key).and_then(|values| values.first().copied().flatten())
    }

    /// Parameters with no usable value at index 0.
    pub fn gaps(&self) -> Vec<ValidationGap> {
        SeriesKey::all()
            .iter()
            .copied()
            .filter(|key| self.first(*key).is_none())
            .map(ValidationGap)
            .collect()
    }
}

/// Sky condition shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    Rainy,
    Cloudy,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
    Clear,
}

impl WeatherCondition {
    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::Rainy => "Rainy",
            WeatherCondition::Cloudy => "Cloudy",
            WeatherCondition::PartlyCloudy => "Partly Cloudy",
            WeatherCondition::Clear => "Clear",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Display theme tag. Only used to pick how the dashboard looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCategory {
    Summer,
    Winter,
    Rainy,
    Normal,
}

impl WeatherCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCategory::Summer => "summer",
            WeatherCategory::Winter => "winter",
            WeatherCategory::Rainy => "rainy",
            WeatherCategory::Normal => "normal",
        }
    }
}

impl std::fmt::Display for WeatherCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized, display-ready weather for one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
    pub pressure_hpa: f64,
    pub dew_point_c: f64,
    pub condition: WeatherCondition,
    pub cloud_cover_pct: f64,
    pub visibility_km: f64,
    pub observed_at: DateTime<Utc>,
    pub category: WeatherCategory,
}
