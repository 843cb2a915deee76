use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::ForecastError,
    model::{RawForecastSample, SeriesKey},
};

use super::{ForecastClient, ForecastModel, truncate_body};

pub const DEFAULT_ENDPOINT: &str = "https://api.windy.com/api/point-forecast/v2";

/// Requested parameters. `wind` expands to `wind_u`/`wind_v` in the response.
const PARAMETERS: &[&str] =
    &["temp", "wind", "rh", "pressure", "dewpoint", "lclouds", "mclouds", "hclouds"];
const LEVELS: &[&str] = &["surface"];

/// Point-forecast client for the Windy API. One model per client.
#[derive(Debug, Clone)]
pub struct WindyForecastClient {
    endpoint: String,
    api_key: String,
    model: ForecastModel,
    timeout: Option<Duration>,
    http: Client,
}

impl WindyForecastClient {
    pub fn new(endpoint: String, api_key: String, model: ForecastModel) -> Self {
        Self {
            endpoint,
            api_key,
            model,
            timeout: None,
            http: Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct WdRequest<'a> {
    lat: f64,
    lon: f64,
    model: &'a str,
    parameters: &'a [&'a str],
    levels: &'a [&'a str],
    key: &'a str,
}

#[derive(Debug, Deserialize)]
struct WdResponse {
    #[serde(default)]
    ts: Vec<i64>,
    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

impl TryFrom<WdResponse> for RawForecastSample {
    type Error = ForecastError;

    fn try_from(mut res: WdResponse) -> Result<Self, Self::Error> {
        let mut series = BTreeMap::new();

        for key in SeriesKey::all() {
            let Some(raw) = res.fields.remove(key.wire_name()) else {
                continue;
            };
            let values: Vec<Option<f64>> = serde_json::from_value(raw).map_err(|e| {
                ForecastError::Decode(format!("series '{}' is not numeric: {e}", key.wire_name()))
            })?;
            series.insert(*key, values);
        }

        RawForecastSample::new(&res.ts, series)
    }
}

#[async_trait]
impl ForecastClient for WindyForecastClient {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<RawForecastSample, ForecastError> {
        let body = WdRequest {
            lat,
            lon,
            model: self.model.as_str(),
            parameters: PARAMETERS,
            levels: LEVELS,
            key: &self.api_key,
        };

        let mut req = self.http.post(&self.endpoint).json(&body);
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }

        let res = req.send().await?;

        let status = res.status();
        let text = res.text().await?;

        if !status.is_success() {
            return Err(ForecastError::Status {
                status,
                body: truncate_body(&text),
            });
        }

        let parsed: WdResponse =
            serde_json::from_str(&text).map_err(|e| ForecastError::Decode(e.to_string()))?;

        let sample = RawForecastSample::try_from(parsed)?;
        tracing::debug!(
            lat,
            lon,
            model = %self.model,
            samples = sample.timestamps().len(),
            "point forecast received"
        );
        Ok(sample)
    }
}
