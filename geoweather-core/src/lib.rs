//! Core library for the `geoweather` app.
//!
//! This crate defines:
//! - Geocoding and point-forecast clients behind async traits
//! - Normalization of raw model fields into a display-ready record
//! - The search controller and weather pipeline driving the view state
//! - Configuration & credentials handling
//!
//! It is used by `geoweather-cli`, but any front end can drive the
//! [`SearchController`] and render the [`Session`] it maintains.

pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod provider;
pub mod search;
pub mod session;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{ForecastError, LookupError, ValidationGap};
pub use model::{
    LocationCandidate, RawForecastSample, SeriesKey, WeatherCategory, WeatherCondition,
    WeatherRecord,
};
pub use normalize::normalize;
pub use pipeline::{RunOutcome, WeatherPipeline};
pub use provider::{ForecastClient, ForecastModel, GeocodeClient};
pub use search::SearchController;
pub use session::{Notice, NoticeKind, SearchPhase, Session, SharedSession, ViewState};

/// Wire a controller, pipeline and fresh session from `config`.
pub fn controller_from_config(config: &Config) -> anyhow::Result<SearchController> {
    let geocoder = provider::geocoder_from_config(config);
    let forecast = provider::forecast_client_from_config(config)?;
    let pipeline = WeatherPipeline::new(forecast, SharedSession::new());
    Ok(SearchController::new(geocoder, pipeline, config.debounce()))
}
