//! Debounced location search feeding the weather pipeline.

use std::{sync::Arc, time::Duration};

use crate::{
    model::LocationCandidate,
    pipeline::{RunOutcome, WeatherPipeline},
    provider::GeocodeClient,
    session::{Notice, SharedSession},
};

/// Shorter input never reaches the geocoder.
pub const MIN_QUERY_CHARS: usize = 3;

#[derive(Debug, Clone)]
pub struct SearchController {
    geocoder: Arc<dyn GeocodeClient>,
    pipeline: WeatherPipeline,
    debounce: Duration,
}

impl SearchController {
    pub fn new(
        geocoder: Arc<dyn GeocodeClient>,
        pipeline: WeatherPipeline,
        debounce: Duration,
    ) -> Self {
        Self {
            geocoder,
            pipeline,
            debounce,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn session(&self) -> &SharedSession {
        self.pipeline.session()
    }

    /// Handle a change of the search box text.
    ///
    /// The most recently issued input wins: a lookup whose input has since
    /// been replaced is either skipped (still debouncing) or has its result
    /// dropped, whichever order the responses arrive in.
    pub async fn on_input(&self, text: &str) {
        let session = self.session();
        let too_short = text.chars().count() < MIN_QUERY_CHARS;
        let ticket = session.with(|s| {
            let ticket = s.begin_search(text);
            if too_short {
                s.clear_suggestions();
            }
            ticket
        });
        if too_short {
            return;
        }

        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
            if !session.with(|s| s.is_current_search(ticket)) {
                tracing::trace!(query = text, "input replaced while debouncing");
                return;
            }
        }

        match self.geocoder.lookup(text).await {
            Ok(candidates) => {
                let count = candidates.len();
                if !session.with(|s| s.show_suggestions(ticket, candidates)) {
                    tracing::debug!(query = text, "dropping stale suggestions");
                    return;
                }
                tracing::debug!(query = text, count, "suggestions updated");
            }
            Err(err) => {
                if session.with(|s| s.fail_search(ticket, Notice::lookup(&err))) {
                    tracing::warn!(query = text, error = %err, "location lookup failed");
                } else {
                    tracing::debug!(query = text, error = %err, "dropping stale lookup failure");
                }
            }
        }
    }

    /// Pick a suggestion: close the list and load its weather.
    ///
    /// The dashboard title follows the record, so it only changes once the
    /// run commits.
    pub async fn on_select(&self, candidate: &LocationCandidate) -> RunOutcome {
        self.session().with(|s| s.close_suggestions());
        self.pipeline.run(candidate).await
    }

    /// Click outside the search box: hide suggestions, keep the text.
    pub fn on_blur_outside(&self) {
        self.session().with(|s| s.close_suggestions());
    }
}
