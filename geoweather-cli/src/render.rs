//! Plain-text dashboard output.

use std::fmt::Write;

use chrono::Local;
use geoweather_core::{
    LocationCandidate, WeatherCategory, WeatherRecord, session::SelectedPlace,
};

pub fn candidate_line(place: &LocationCandidate) -> String {
    format!("{} ({:.4}, {:.4})", place.display_name, place.latitude, place.longitude)
}

fn theme_banner(category: WeatherCategory) -> &'static str {
    match category {
        WeatherCategory::Summer => "[ summer ] hot out there",
        WeatherCategory::Winter => "[ winter ] bundle up",
        WeatherCategory::Rainy => "[ rainy ] grab an umbrella",
        WeatherCategory::Normal => "[ normal ] mild conditions",
    }
}

pub fn dashboard(record: &WeatherRecord, selected: Option<&SelectedPlace>) -> String {
    let mut out = String::new();

    let title = match selected.and_then(|p| p.qualifier.as_deref()) {
        Some(q) => format!("{}, {q}", record.city_name),
        None => record.city_name.clone(),
    };
    let observed = record.observed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M %Z");

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{title} · {}", record.condition);
    let _ = writeln!(out, "{}", theme_banner(record.category));
    let _ = writeln!(
        out,
        "  Temperature  {:.1} °C (feels like {:.1} °C)",
        record.temperature_c, record.feels_like_c
    );
    let _ = writeln!(out, "  Humidity     {:.0} %", record.humidity_pct);
    let _ = writeln!(out, "  Wind         {:.1} m/s", record.wind_speed_mps);
    let _ = writeln!(out, "  Pressure     {:.1} hPa", record.pressure_hpa);
    let _ = writeln!(out, "  Dew point    {:.1} °C", record.dew_point_c);
    let _ = writeln!(out, "  Cloud cover  {:.0} %", record.cloud_cover_pct);
    let _ = writeln!(out, "  Visibility   {:.0} km", record.visibility_km);
    let _ = writeln!(out, "  Location     {:.4}, {:.4}", record.latitude, record.longitude);
    let _ = writeln!(out, "  Sampled at   {observed}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use geoweather_core::WeatherCondition;

    fn record() -> WeatherRecord {
        WeatherRecord {
            city_name: "Paris".into(),
            latitude: 48.8534951,
            longitude: 2.3483915,
            temperature_c: 20.0,
            feels_like_c: 19.4,
            humidity_pct: 40.0,
            wind_speed_mps: 2.0,
            pressure_hpa: 1012.5,
            dew_point_c: 6.2,
            condition: WeatherCondition::PartlyCloudy,
            cloud_cover_pct: 35.0,
            visibility_km: 10.0,
            observed_at: DateTime::from_timestamp_millis(1_760_000_000_000).expect("valid ts"),
            category: WeatherCategory::Normal,
        }
    }

    #[test]
    fn dashboard_shows_title_condition_and_figures() {
        let place = SelectedPlace {
            city: "Paris".into(),
            qualifier: Some("France".into()),
        };
        let text = dashboard(&record(), Some(&place));

        assert!(text.starts_with("Paris, France · Partly Cloudy\n"));
        assert!(text.contains("[ normal ]"));
        assert!(text.contains("20.0 °C (feels like 19.4 °C)"));
        assert!(text.contains("1012.5 hPa"));
        assert!(text.contains("48.8535, 2.3484"));
    }

    #[test]
    fn dashboard_without_qualifier_uses_city_only() {
        let text = dashboard(&record(), None);
        assert!(text.starts_with("Paris · Partly Cloudy\n"));
    }

    #[test]
    fn candidate_line_includes_coordinates() {
        let oslo = LocationCandidate::new("Oslo, Norway", 59.9133301, 10.7389701);
        let line = candidate_line(&oslo);
        assert_eq!(line, "Oslo, Norway (59.9133, 10.7390)");
    }
}
