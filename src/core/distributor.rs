use crate::adapters::geocoder::YandexGeocoder;
use crate::config::toml_config::AllocatorConfig;
use crate::core::distance::distance;
use crate::core::locator::LocationResolver;
use crate::core::pools::{least_loaded, ManagerPools};
use crate::domain::model::{Client, Coordinate, DistributionSummary, Office, Roster, Tier};
use crate::domain::rules::AssignmentRules;
use crate::utils::error::{AllocatorError, Result};
use std::sync::Arc;

enum Route {
    Vip,
    Foreign,
    Proximity(Coordinate),
}

impl Route {
    fn tier(&self) -> Tier {
        match self {
            Route::Vip => Tier::Vip,
            Route::Foreign => Tier::Foreign,
            Route::Proximity(_) => Tier::Proximity,
        }
    }
}

/// Distributes clients to managers by status, origin and office proximity.
///
/// Every client goes to the least-loaded manager of exactly one pool:
/// VIP clients to the VIP pool; foreign clients and clients whose city cannot be
/// located to the foreign pool; everyone else to the pool of the nearest office.
pub struct ClientDistributor {
    rules: AssignmentRules,
    resolver: LocationResolver,
}

impl ClientDistributor {
    pub fn new(rules: AssignmentRules, resolver: LocationResolver) -> Self {
        Self { rules, resolver }
    }

    /// Wires the HTTP geocoder and rules described by `config`.
    pub fn from_config(config: &AllocatorConfig) -> Result<Self> {
        let geocoder = YandexGeocoder::from_config(&config.geocoder)?;
        let resolver = LocationResolver::with_options(
            Arc::new(geocoder),
            config.geocoder.language.clone(),
            config.geocoder.concurrent_requests,
        );
        Ok(Self::new(config.rules.clone(), resolver))
    }

    /// Assigns every client in `roster` in input order, mutating managers in place.
    ///
    /// Fails without finishing the pass when a manager names an unknown office or
    /// a client has to go to an empty pool.
    pub async fn distribute(&self, roster: &mut Roster) -> Result<DistributionSummary> {
        let Roster {
            clients,
            managers,
            offices,
        } = roster;

        let pools = ManagerPools::build(managers, offices, &self.rules)?;
        let mut lookups = self.resolver.spawn_lookups(clients, &self.rules);
        let mut summary = DistributionSummary {
            lookups_issued: lookups.issued(),
            ..Default::default()
        };

        for client in clients.iter_mut() {
            if !client.is_vip {
                if let Some(location) = lookups.resolve(&client.city).await {
                    client.location = location;
                }
            }

            let route = self.route(client);
            let chosen = match route {
                Route::Vip => least_loaded(pools.vip(), managers)
                    .ok_or_else(|| empty_pool("VIP", client))?,
                Route::Foreign => least_loaded(pools.foreign(), managers)
                    .ok_or_else(|| empty_pool("foreign-client", client))?,
                Route::Proximity(location) => {
                    let office = nearest_office(location, offices).ok_or_else(|| {
                        AllocatorError::NoLocatableOffice {
                            client_id: client.id.clone(),
                        }
                    })?;
                    let office = &offices[office];
                    least_loaded(office.managers(), managers)
                        .ok_or_else(|| empty_pool(&format!("office '{}'", office.id), client))?
                }
            };

            managers[chosen].assign(&client.id);
            summary.record(route.tier());
            tracing::debug!(
                "Client '{}' -> manager '{}' ({} tier, load now {})",
                client.id,
                managers[chosen].id,
                route.tier(),
                managers[chosen].client_count()
            );
        }

        summary.lookups_failed = lookups.failed();
        tracing::info!(
            "📊 Distributed {} clients: {} VIP, {} foreign, {} by proximity ({} of {} city lookups failed)",
            summary.total(),
            summary.vip,
            summary.foreign,
            summary.proximity,
            summary.lookups_failed,
            summary.lookups_issued
        );

        Ok(summary)
    }

    fn route(&self, client: &Client) -> Route {
        if client.is_vip {
            return Route::Vip;
        }
        if !self.rules.is_home_country(&client.country) || !client.has_city() {
            return Route::Foreign;
        }
        match client.location.coordinate() {
            Some(location) => Route::Proximity(location),
            None => Route::Foreign,
        }
    }
}

fn empty_pool(pool: &str, client: &Client) -> AllocatorError {
    AllocatorError::EmptyPool {
        pool: pool.to_string(),
        client_id: client.id.clone(),
    }
}

/// Index of the office closest to `location`; offices without a location never win.
pub fn nearest_office(location: Coordinate, offices: &[Office]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, office) in offices.iter().enumerate() {
        let Some(office_location) = office.location else {
            continue;
        };
        let d = distance(location, office_location);
        if best.map_or(true, |(_, shortest)| d < shortest) {
            best = Some((index, d));
        }
    }
    best.map(|(index, _)| index)
}
