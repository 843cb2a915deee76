use std::{sync::Arc, time::Duration};

use geoweather_core::{
    ForecastModel, NoticeKind, RunOutcome, SearchController, SearchPhase, SharedSession,
    ViewState, WeatherCategory, WeatherCondition, WeatherPipeline,
    provider::{nominatim::NominatimGeocoder, windy::WindyForecastClient},
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn controller(server: &MockServer) -> SearchController {
    let geocoder =
        NominatimGeocoder::new(format!("{}/search", server.uri()), "geoweather-test".into());
    let forecast = WindyForecastClient::new(
        format!("{}/api/point-forecast/v2", server.uri()),
        "KEY".into(),
        ForecastModel::Gfs,
    );
    let pipeline = WeatherPipeline::new(Arc::new(forecast), SharedSession::new());
    SearchController::new(Arc::new(geocoder), pipeline, Duration::ZERO)
}

async fn mount_paris(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "display_name": "Paris, Ile-de-France, Metropolitan France, France",
                "lat": "48.8534951",
                "lon": "2.3483915"
            },
            {
                "display_name": "Paris, Lamar County, Texas, United States",
                "lat": "33.6617962",
                "lon": "-95.5555130"
            }
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn paris_search_to_dashboard() {
    let server = MockServer::start().await;
    mount_paris(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/point-forecast/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ts": [1760000000000_i64, 1760010800000_i64],
            "temp-surface": [293.15, 291.0],
            "rh-surface": [40, 42],
            "lclouds-surface": [10, 12],
            "mclouds-surface": [10, 20],
            "hclouds-surface": [10, 5]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctl = controller(&server);

    ctl.on_input("Paris").await;
    let snap = ctl.session().snapshot();
    assert_eq!(snap.phase(), SearchPhase::Suggesting);
    let first = snap.visible_suggestions().first().cloned().expect("at least one candidate");

    let outcome = ctl.on_select(&first).await;
    assert_eq!(outcome, RunOutcome::Committed);

    let snap = ctl.session().snapshot();
    assert_eq!(snap.view(), ViewState::Dashboard);
    assert_eq!(snap.phase(), SearchPhase::Idle);

    let record = snap.record().expect("record committed");
    assert_eq!(record.city_name, "Paris");
    assert!((record.temperature_c - 20.0).abs() < 1e-9);
    assert_eq!(record.condition, WeatherCondition::Clear);
    assert_eq!(record.category, WeatherCategory::Normal);
    assert_eq!(record.humidity_pct, 40.0);
    assert_eq!(record.cloud_cover_pct, 10.0);
    assert_eq!(record.wind_speed_mps, 0.0);
    assert_eq!(record.pressure_hpa, 1013.0);
    assert_eq!(record.observed_at.timestamp_millis(), 1_760_000_000_000);

    let selected = snap.selected().expect("selection");
    assert_eq!(selected.qualifier.as_deref(), Some("France"));
}

#[tokio::test]
async fn forecast_outage_returns_to_search() {
    let server = MockServer::start().await;
    mount_paris(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/point-forecast/v2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let ctl = controller(&server);
    ctl.on_input("Paris").await;
    let first = ctl.session().snapshot().visible_suggestions()[0].clone();

    assert_eq!(ctl.on_select(&first).await, RunOutcome::Failed);

    let snap = ctl.session().snapshot();
    assert_eq!(snap.view(), ViewState::Searching);
    assert!(snap.record().is_none());
    let notice = snap.notice().expect("notice");
    assert_eq!(notice.kind, NoticeKind::Forecast);
    assert!(notice.message.contains("upstream unavailable"));
}

#[tokio::test]
async fn geocoder_outage_leaves_suggestions_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let ctl = controller(&server);
    ctl.on_input("Paris").await;

    let snap = ctl.session().snapshot();
    assert!(snap.visible_suggestions().is_empty());
    assert_eq!(snap.view(), ViewState::Searching);
    assert_eq!(snap.notice().map(|n| n.kind), Some(NoticeKind::Lookup));
}
