use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::USER_AGENT};
use serde::Deserialize;

use crate::{error::LookupError, model::LocationCandidate};

use super::{GeocodeClient, truncate_body};

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_USER_AGENT: &str = concat!("geoweather/", env!("CARGO_PKG_VERSION"));

/// Upper bound on suggestions per query.
pub const MAX_CANDIDATES: usize = 5;

/// Forward geocoder speaking the Nominatim search API.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    endpoint: String,
    user_agent: String,
    timeout: Option<Duration>,
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(endpoint: String, user_agent: String) -> Self {
        Self {
            endpoint,
            user_agent,
            timeout: None,
            http: Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct NmPlace {
    display_name: String,
    lat: String,
    lon: String,
}

impl TryFrom<NmPlace> for LocationCandidate {
    type Error = LookupError;

    fn try_from(place: NmPlace) -> Result<Self, Self::Error> {
        let parse = |field: &str, raw: &str| {
            raw.trim().parse::<f64>().map_err(|e| {
                let name = &place.display_name;
                LookupError::Decode(format!("invalid {field} '{raw}' for '{name}': {e}"))
            })
        };
        let latitude = parse("lat", &place.lat)?;
        let longitude = parse("lon", &place.lon)?;

        Ok(LocationCandidate {
            display_name: place.display_name,
            latitude,
            longitude,
        })
    }
}

#[async_trait]
impl GeocodeClient for NominatimGeocoder {
    async fn lookup(&self, query: &str) -> Result<Vec<LocationCandidate>, LookupError> {
        let limit = MAX_CANDIDATES.to_string();

        let mut req = self
            .http
            .get(&self.endpoint)
            .header(USER_AGENT, &self.user_agent)
            .query(&[("format", "json"), ("q", query), ("limit", limit.as_str())]);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let res = req.send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(LookupError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let places: Vec<NmPlace> =
            serde_json::from_str(&body).map_err(|e| LookupError::Decode(e.to_string()))?;

        let candidates = places
            .into_iter()
            .take(MAX_CANDIDATES)
            .map(LocationCandidate::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(query, count = candidates.len(), "geocoding lookup resolved");
        Ok(candidates)
    }
}
