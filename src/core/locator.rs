use crate::domain::model::{Client, Coordinate, LocationState};
use crate::domain::ports::Geocoder;
use crate::domain::rules::AssignmentRules;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

pub const DEFAULT_LANGUAGE: &str = "ru_RU";
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 8;

enum CityLookup {
    Pending(JoinHandle<Option<Coordinate>>),
    Done(Option<Coordinate>),
}

/// City lookups launched for one run, keyed by the city string as written on the client.
///
/// Each city is awaited at most once; later requests for the same city get the
/// stored outcome.
pub struct CityLookups {
    lookups: HashMap<String, CityLookup>,
    failed: usize,
}

impl CityLookups {
    /// Awaits the lookup for `city`.
    ///
    /// Returns `None` when no lookup was launched for the city (foreign or blank),
    /// otherwise the resolved or unavailable location.
    pub async fn resolve(&mut self, city: &str) -> Option<LocationState> {
        let lookup = self.lookups.get_mut(city)?;
        let coordinate = match lookup {
            CityLookup::Done(coordinate) => return Some((*coordinate).into()),
            CityLookup::Pending(handle) => match handle.await {
                Ok(coordinate) => coordinate,
                Err(e) => {
                    tracing::warn!("Geocoding task for '{}' did not complete: {}", city, e);
                    None
                }
            },
        };

        if coordinate.is_none() {
            self.failed += 1;
        }
        *lookup = CityLookup::Done(coordinate);
        Some(coordinate.into())
    }

    /// Number of distinct cities a lookup was launched for.
    pub fn issued(&self) -> usize {
        self.lookups.len()
    }

    /// Number of awaited lookups that produced no coordinate.
    pub fn failed(&self) -> usize {
        self.failed
    }
}

impl Drop for CityLookups {
    fn drop(&mut self) {
        for lookup in self.lookups.values() {
            if let CityLookup::Pending(handle) = lookup {
                handle.abort();
            }
        }
    }
}

/// Launches geocoding lookups for the distinct home-country cities of a client list.
#[derive(Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn Geocoder>,
    language: String,
    limiter: Arc<Semaphore>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self::with_options(geocoder, DEFAULT_LANGUAGE, DEFAULT_CONCURRENT_REQUESTS)
    }

    pub fn with_options(
        geocoder: Arc<dyn Geocoder>,
        language: impl Into<String>,
        concurrent_requests: usize,
    ) -> Self {
        Self {
            geocoder,
            language: language.into(),
            limiter: Arc::new(Semaphore::new(concurrent_requests.max(1))),
        }
    }

    /// Spawns one lookup per distinct city of non-VIP home-country clients.
    ///
    /// Must run inside a tokio runtime.
    pub fn spawn_lookups(&self, clients: &[Client], rules: &AssignmentRules) -> CityLookups {
        let mut lookups = HashMap::new();

        for client in clients {
            if client.is_vip
                || lookups.contains_key(&client.city)
                || !client.has_city()
                || !rules.is_home_country(&client.country)
            {
                continue;
            }

            let handle = self.spawn_lookup(client.city.trim().to_string());
            lookups.insert(client.city.clone(), CityLookup::Pending(handle));
        }

        tracing::info!("🌍 Launched geocoding for {} distinct cities", lookups.len());
        CityLookups { lookups, failed: 0 }
    }

    fn spawn_lookup(&self, place: String) -> JoinHandle<Option<Coordinate>> {
        let geocoder = Arc::clone(&self.geocoder);
        let limiter = Arc::clone(&self.limiter);
        let language = self.language.clone();

        tokio::spawn(async move {
            let _permit = match limiter.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::warn!("Geocoding for '{}' skipped: {}", place, e);
                    return None;
                }
            };

            match geocoder.locate(&place, &language).await {
                Ok(Some(coordinate)) => {
                    tracing::debug!(
                        "Located '{}' at {}, {}",
                        place,
                        coordinate.latitude,
                        coordinate.longitude
                    );
                    Some(coordinate)
                }
                Ok(None) => {
                    tracing::warn!("Geocoder found no match for '{}'", place);
                    None
                }
                Err(e) => {
                    tracing::warn!("Geocoding failed for '{}': {}", place, e);
                    None
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::StubGeocoder;
    use std::time::Duration;

    fn astana() -> Coordinate {
        Coordinate::new(51.128, 71.430)
    }

    #[tokio::test]
    async fn test_shared_city_is_looked_up_once() {
        let geocoder = Arc::new(StubGeocoder::new().with_place("Астана", astana()));
        let resolver = LocationResolver::new(geocoder.clone());
        let clients: Vec<Client> = (0..25)
            .map(|i| Client::new(format!("c-{i}"), "Казахстан", "Астана", false))
            .collect();

        let mut lookups = resolver.spawn_lookups(&clients, &AssignmentRules::default());
        assert_eq!(lookups.issued(), 1);

        for client in &clients {
            assert_eq!(
                lookups.resolve(&client.city).await,
                Some(LocationState::Resolved(astana()))
            );
        }
        assert_eq!(geocoder.calls_for("Астана"), 1);
        assert_eq!(geocoder.total_calls(), 1);
    }

    #[tokio::test]
    async fn test_foreign_blank_and_vip_clients_are_skipped() {
        let geocoder = Arc::new(StubGeocoder::new().with_place("Астана", astana()));
        let resolver = LocationResolver::new(geocoder.clone());
        let clients = vec![
            Client::new("c-1", "Россия", "Москва", false),
            Client::new("c-2", "Kazahstan", "   ", false),
            Client::new("c-3", "Kazahstan", "Астана", false),
            Client::new("c-4", "Kazahstan", "Алматы", true),
        ];

        let mut lookups = resolver.spawn_lookups(&clients, &AssignmentRules::default());

        assert_eq!(lookups.issued(), 1);
        assert_eq!(lookups.resolve("Москва").await, None);
        assert_eq!(lookups.resolve("   ").await, None);
        assert!(lookups.resolve("Астана").await.is_some());
        assert_eq!(lookups.resolve("Алматы").await, None);
        assert_eq!(geocoder.calls_for("Москва"), 0);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_unavailable_and_not_reissued() {
        let geocoder = Arc::new(
            StubGeocoder::new()
                .with_failure("Караганда")
                .with_place("Астана", astana()),
        );
        let resolver = LocationResolver::with_options(geocoder.clone(), "ru_RU", 1);
        let clients = vec![
            Client::new("c-1", "Казахстан", "Караганда", false),
            Client::new("c-2", "Казахстан", "Жезказган", false),
            Client::new("c-3", "Казахстан", "Астана", false),
        ];

        let mut lookups = resolver.spawn_lookups(&clients, &AssignmentRules::default());

        assert_eq!(lookups.resolve("Караганда").await, Some(LocationState::Unavailable));
        assert_eq!(lookups.resolve("Караганда").await, Some(LocationState::Unavailable));
        assert_eq!(lookups.resolve("Жезказган").await, Some(LocationState::Unavailable));
        assert_eq!(
            lookups.resolve("Астана").await,
            Some(LocationState::Resolved(astana()))
        );
        assert_eq!(lookups.failed(), 2);
        assert_eq!(geocoder.calls_for("Караганда"), 1);
    }

    #[tokio::test]
    async fn test_panicked_lookup_counts_as_failure() {
        let geocoder = Arc::new(
            StubGeocoder::new()
                .with_panic("Семей")
                .with_place("Астана", astana()),
        );
        let resolver = LocationResolver::new(geocoder.clone());
        let clients = vec![
            Client::new("c-1", "Казахстан", "Семей", false),
            Client::new("c-2", "Казахстан", "Астана", false),
        ];

        let mut lookups = resolver.spawn_lookups(&clients, &AssignmentRules::default());

        assert_eq!(lookups.resolve("Семей").await, Some(LocationState::Unavailable));
        assert_eq!(lookups.resolve("Семей").await, Some(LocationState::Unavailable));
        assert_eq!(
            lookups.resolve("Астана").await,
            Some(LocationState::Resolved(astana()))
        );
        assert_eq!(lookups.failed(), 1);
        assert_eq!(geocoder.calls_for("Семей"), 1);
    }

    #[tokio::test]
    async fn test_in_flight_lookups_are_capped() {
        let geocoder = Arc::new(StubGeocoder::new().with_delay(Duration::from_millis(20)));
        let resolver = LocationResolver::with_options(geocoder.clone(), "ru_RU", 2);
        let clients: Vec<Client> = (0..8)
            .map(|i| Client::new(format!("c-{i}"), "Казахстан", format!("Город {i}"), false))
            .collect();

        let mut lookups = resolver.spawn_lookups(&clients, &AssignmentRules::default());
        for client in &clients {
            lookups.resolve(&client.city).await;
        }

        assert_eq!(geocoder.total_calls(), 8);
        assert!(geocoder.peak_in_flight() >= 1);
        assert!(geocoder.peak_in_flight() <= 2);
    }

    #[tokio::test]
    async fn test_cities_are_keyed_case_sensitively() {
        let geocoder = Arc::new(StubGeocoder::new().with_place("Астана", astana()));
        let resolver = LocationResolver::new(geocoder.clone());
        let clients = vec![
            Client::new("c-1", "Казахстан", "Астана", false),
            Client::new("c-2", "Казахстан", "АСТАНА", false),
        ];

        let lookups = resolver.spawn_lookups(&clients, &AssignmentRules::default());
        assert_eq!(lookups.issued(), 2);
    }
}
