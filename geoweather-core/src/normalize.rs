//! Raw forecast fields → display-ready [`WeatherRecord`].

use crate::model::{
    RawForecastSample, SeriesKey, WeatherCategory, WeatherCondition, WeatherRecord,
};

const KELVIN_OFFSET: f64 = 273.15;
const PA_PER_HPA: f64 = 100.0;
const WIND_CHILL_FACTOR: f64 = 0.3;

/// Values substituted when the forecast does not supply a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fallbacks {
    pub temperature_c: f64,
    pub wind_component_mps: f64,
    pub humidity_pct: f64,
    pub pressure_hpa: f64,
    pub dew_point_c: f64,
    pub cloud_layer_pct: f64,
}

pub const FALLBACKS: Fallbacks = Fallbacks {
    temperature_c: 20.0,
    wind_component_mps: 0.0,
    humidity_pct: 50.0,
    pressure_hpa: 1013.0,
    dew_point_c: 15.0,
    cloud_layer_pct: 0.0,
};

/// Build a [`WeatherRecord`] from the earliest sample of `sample`.
///
/// Total: every absent parameter falls back to [`FALLBACKS`].
pub fn normalize(sample: &RawForecastSample, city_name: &str, lat: f64, lon: f64) -> WeatherRecord {
    let gaps = sample.gaps();
    if !gaps.is_empty() {
        tracing::debug!(city = city_name, gaps = ?gaps, "forecast sample has missing parameters");
    }

    let temperature_c = sample
        .first(SeriesKey::Temperature)
        .map(kelvin_to_celsius)
        .unwrap_or(FALLBACKS.temperature_c);

    let u = sample.first(SeriesKey::WindU).unwrap_or(FALLBACKS.wind_component_mps);
    let v = sample.first(SeriesKey::WindV).unwrap_or(FALLBACKS.wind_component_mps);
    let wind_speed_mps = u.hypot(v);

    let humidity_pct = sample.first(SeriesKey::Humidity).unwrap_or(FALLBACKS.humidity_pct);

    let pressure_hpa = sample
        .first(SeriesKey::Pressure)
        .map(|pa| pa / PA_PER_HPA)
        .unwrap_or(FALLBACKS.pressure_hpa);

    let dew_point_c = sample
        .first(SeriesKey::DewPoint)
        .map(kelvin_to_celsius)
        .unwrap_or(FALLBACKS.dew_point_c);

    let cloud_cover_pct = [SeriesKey::LowClouds, SeriesKey::MidClouds, SeriesKey::HighClouds]
        .into_iter()
        .map(|key| sample.first(key).unwrap_or(FALLBACKS.cloud_layer_pct))
        .fold(f64::NEG_INFINITY, f64::max);

    WeatherRecord {
        city_name: city_name.to_string(),
        latitude: lat,
        longitude: lon,
        temperature_c,
        feels_like_c: temperature_c - WIND_CHILL_FACTOR * wind_speed_mps,
        humidity_pct,
        wind_speed_mps,
        pressure_hpa,
        dew_point_c,
        condition: classify_condition(cloud_cover_pct, humidity_pct),
        cloud_cover_pct,
        visibility_km: estimate_visibility_km(humidity_pct),
        observed_at: sample.first_timestamp(),
        category: classify_category(temperature_c, humidity_pct, cloud_cover_pct),
    }
}

/// First matching threshold wins.
pub fn classify_condition(cloud_pct: f64, humidity_pct: f64) -> WeatherCondition {
    if cloud_pct > 80.0 && humidity_pct > 80.0 {
        WeatherCondition::Rainy
    } else if cloud_pct > 60.0 {
        WeatherCondition::Cloudy
    } else if cloud_pct > 30.0 {
        WeatherCondition::PartlyCloudy
    } else {
        WeatherCondition::Clear
    }
}

/// Temperature thresholds take priority over humidity and cloud.
pub fn classify_category(temperature_c: f64, humidity_pct: f64, cloud_pct: f64) -> WeatherCategory {
    if temperature_c > 30.0 {
        WeatherCategory::Summer
    } else if temperature_c < 10.0 {
        WeatherCategory::Winter
    } else if humidity_pct > 80.0 || cloud_pct > 70.0 {
        WeatherCategory::Rainy
    } else {
        WeatherCategory::Normal
    }
}

/// Two-level proxy, not a physical model.
pub fn estimate_visibility_km(humidity_pct: f64) -> f64 {
    if humidity_pct < 90.0 { 10.0 } else { 5.0 }
}

fn kelvin_to_celsius(k: f64) -> f64 {
    k - KELVIN_OFFSET
}
