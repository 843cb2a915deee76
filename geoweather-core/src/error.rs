use thiserror::Error;

use crate::model::SeriesKey;

/// Failure while resolving free text to candidate locations.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("geocoding service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode geocoding response: {0}")]
    Decode(String),
}

/// Failure while fetching or decoding a point forecast.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("forecast request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("forecast service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode forecast response: {0}")]
    Decode(String),

    #[error("forecast response contained no timestamps")]
    EmptyTimeline,

    #[error("forecast timestamp {0} ms is out of range")]
    InvalidTimestamp(i64),
}

/// A requested parameter the forecast did not supply at index 0.
///
/// Never surfaced as an error: the normalizer substitutes its fallback value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationGap(pub SeriesKey);

impl std::fmt::Display for ValidationGap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} missing, using fallback", self.0)
    }
}
