//! In-process fakes for the network clients.

use std::{
    collections::{BTreeMap, HashMap},
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    error::{ForecastError, LookupError},
    model::{LocationCandidate, RawForecastSample, SeriesKey},
    provider::{ForecastClient, GeocodeClient},
};

pub fn candidate(name: &str, lat: f64, lon: f64) -> LocationCandidate {
    LocationCandidate::new(name, lat, lon)
}

/// Geocoder answering from a fixed table after a per-query delay.
#[derive(Debug, Default)]
pub struct FakeGeocoder {
    replies: HashMap<String, (Duration, Result<Vec<LocationCandidate>, String>)>,
    calls: AtomicUsize,
}

impl FakeGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, query: &str, delay: Duration, names: &[&str]) -> Self {
        let hits = names
            .iter()
            .enumerate()
            .map(|(i, n)| candidate(n, i as f64, i as f64))
            .collect();
        self.replies.insert(query.to_string(), (delay, Ok(hits)));
        self
    }

    pub fn fail(mut self, query: &str, delay: Duration, message: &str) -> Self {
        self.replies.insert(query.to_string(), (delay, Err(message.to_string())));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocodeClient for FakeGeocoder {
    async fn lookup(&self, query: &str) -> Result<Vec<LocationCandidate>, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some((delay, reply)) = self.replies.get(query) else {
            return Ok(Vec::new());
        };
        tokio::time::sleep(*delay).await;
        reply.clone().map_err(LookupError::Decode)
    }
}

/// Forecast service keyed by latitude. Each reply has rh 40% and 10% cloud on every layer.
#[derive(Debug, Default)]
pub struct FakeForecast {
    replies: Vec<(f64, Duration, Option<f64>)>,
    calls: AtomicUsize,
}

impl FakeForecast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, lat: f64, temp_k: f64, delay: Duration) -> Self {
        self.replies.push((lat, delay, Some(temp_k)));
        self
    }

    pub fn fail(mut self, lat: f64, delay: Duration) -> Self {
        self.replies.push((lat, delay, None));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForecastClient for FakeForecast {
    async fn fetch(&self, lat: f64, _lon: f64) -> Result<RawForecastSample, ForecastError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (delay, temp_k) = self
            .replies
            .iter()
            .find(|(l, _, _)| *l == lat)
            .map(|(_, d, t)| (*d, *t))
            .unwrap_or((Duration::ZERO, None));
        tokio::time::sleep(delay).await;

        let temp_k = temp_k.ok_or_else(|| ForecastError::Decode("fake outage".into()))?;
        let series = BTreeMap::from([
            (SeriesKey::Temperature, vec![Some(temp_k)]),
            (SeriesKey::Humidity, vec![Some(40.0)]),
            (SeriesKey::LowClouds, vec![Some(10.0)]),
            (SeriesKey::MidClouds, vec![Some(10.0)]),
            (SeriesKey::HighClouds, vec![Some(10.0)]),
        ]);
        RawForecastSample::new(&[1_760_000_000_000], series)
    }
}
