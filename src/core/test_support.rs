use crate::domain::model::Coordinate;
use crate::domain::ports::Geocoder;
use crate::utils::error::{AllocatorError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory geocoder that counts how often each place was requested.
#[derive(Default)]
pub(crate) struct StubGeocoder {
    places: HashMap<String, Coordinate>,
    failures: HashSet<String>,
    panics: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubGeocoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_place(mut self, place: &str, coordinate: Coordinate) -> Self {
        self.places.insert(place.to_string(), coordinate);
        self
    }

    pub(crate) fn with_failure(mut self, place: &str) -> Self {
        self.failures.insert(place.to_string());
        self
    }

    /// The lookup task for `place` panics instead of answering.
    pub(crate) fn with_panic(mut self, place: &str) -> Self {
        self.panics.insert(place.to_string());
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls_for(&self, place: &str) -> usize {
        self.calls.lock().unwrap().get(place).copied().unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Highest number of lookups that were running at the same time.
    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn locate(&self, place: &str, _language: &str) -> Result<Option<Coordinate>> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(place.to_string())
            .or_insert(0) += 1;

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panics.contains(place) {
            panic!("geocoder crashed on '{place}'");
        }
        if self.failures.contains(place) {
            return Err(AllocatorError::GeocodingError {
                place: place.to_string(),
                message: "503 Service Unavailable".to_string(),
            });
        }
        Ok(self.places.get(place).copied())
    }
}
