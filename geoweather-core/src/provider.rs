use crate::{
    Config, LocationCandidate, RawForecastSample,
    error::{ForecastError, LookupError},
    provider::{nominatim::NominatimGeocoder, windy::WindyForecastClient},
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod nominatim;
pub mod windy;

/// Numerical model queried by the point-forecast client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ForecastModel {
    #[default]
    Gfs,
    IconEu,
    Arome,
    NamConus,
}

impl ForecastModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastModel::Gfs => "gfs",
            ForecastModel::IconEu => "iconEu",
            ForecastModel::Arome => "arome",
            ForecastModel::NamConus => "namConus",
        }
    }

    pub const fn all() -> &'static [ForecastModel] {
        &[
            ForecastModel::Gfs,
            ForecastModel::IconEu,
            ForecastModel::Arome,
            ForecastModel::NamConus,
        ]
    }
}

impl std::fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ForecastModel {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ForecastModel::all()
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown forecast model '{value}'. \
                     Supported models: gfs, iconEu, arome, namConus."
                )
            })
    }
}

/// Free text → candidate locations.
#[async_trait]
pub trait GeocodeClient: Send + Sync + Debug {
    async fn lookup(&self, query: &str) -> Result<Vec<LocationCandidate>, LookupError>;
}

/// Coordinates → raw surface-level forecast fields.
#[async_trait]
pub trait ForecastClient: Send + Sync + Debug {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<RawForecastSample, ForecastError>;
}

/// Construct the geocoder described by `config`.
pub fn geocoder_from_config(config: &Config) -> Arc<dyn GeocodeClient> {
    Arc::new(
        NominatimGeocoder::new(
            config.geocoder.endpoint.clone(),
            config.geocoder.user_agent.clone(),
        )
        .with_timeout(config.request_timeout()),
    )
}

/// Construct the forecast client described by `config`.
pub fn forecast_client_from_config(config: &Config) -> anyhow::Result<Arc<dyn ForecastClient>> {
    let api_key = config.forecast_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No forecast API key configured.\n\
                 Hint: run `geoweather configure` and enter your point-forecast API key."
        )
    })?;
    let model = config.forecast_model()?;

    Ok(Arc::new(
        WindyForecastClient::new(config.forecast.endpoint.clone(), api_key.to_owned(), model)
            .with_timeout(config.request_timeout()),
    ))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
