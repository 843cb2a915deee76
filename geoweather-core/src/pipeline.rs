//! Selected location → forecast → normalized record → dashboard.

use std::sync::Arc;

use crate::{
    model::LocationCandidate,
    normalize::normalize,
    provider::ForecastClient,
    session::{Notice, SelectedPlace, SharedSession},
};

/// How a single [`WeatherPipeline::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Record stored, view moved to the dashboard.
    Committed,
    /// Fetch failed; a notice was raised and the view is back to searching.
    Failed,
    /// A newer run (or a reset) started first; this result was dropped.
    Superseded,
}

#[derive(Debug, Clone)]
pub struct WeatherPipeline {
    forecast: Arc<dyn ForecastClient>,
    session: SharedSession,
}

impl WeatherPipeline {
    pub fn new(forecast: Arc<dyn ForecastClient>, session: SharedSession) -> Self {
        Self { forecast, session }
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub async fn run(&self, candidate: &LocationCandidate) -> RunOutcome {
        let ticket = self.session.with(|s| s.begin_loading());
        let city = candidate.city_name();
        tracing::debug!(
            city,
            lat = candidate.latitude,
            lon = candidate.longitude,
            "loading forecast"
        );

        let result = self.forecast.fetch(candidate.latitude, candidate.longitude).await;

        // Normalize outside the lock; only the commit needs exclusive access.
        let result = result
            .map(|sample| normalize(&sample, city, candidate.latitude, candidate.longitude));

        match result {
            Ok(record) => {
                let condition = record.condition;
                let temperature_c = record.temperature_c;
                let place = SelectedPlace::from_candidate(candidate);
                if self.session.with(|s| s.commit_record(ticket, record, place)) {
                    tracing::info!(city, %condition, temperature_c, "weather record committed");
                    RunOutcome::Committed
                } else {
                    tracing::debug!(city, "dropping superseded forecast");
                    RunOutcome::Superseded
                }
            }
            Err(err) => {
                if self.session.with(|s| s.fail_loading(ticket, Notice::forecast(&err))) {
                    tracing::warn!(city, error = %err, "forecast fetch failed");
                    RunOutcome::Failed
                } else {
                    tracing::debug!(city, error = %err, "dropping superseded forecast failure");
                    RunOutcome::Superseded
                }
            }
        }
    }

    /// The dashboard "back" action.
    pub fn reset(&self) {
        self.session.with(|s| s.reset());
    }
}
