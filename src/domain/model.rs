use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Where a client's city is, as far as this run knows.
///
/// `Unresolved` means no lookup has been consulted yet; `Unavailable` means a
/// lookup was consulted and produced nothing. The two must not be conflated,
/// otherwise a known failure looks like work still to do.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocationState {
    #[default]
    Unresolved,
    Resolved(Coordinate),
    Unavailable,
}

impl LocationState {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            LocationState::Resolved(coordinate) => Some(*coordinate),
            LocationState::Unresolved | LocationState::Unavailable => None,
        }
    }
}

impl From<Option<Coordinate>> for LocationState {
    fn from(value: Option<Coordinate>) -> Self {
        match value {
            Some(coordinate) => LocationState::Resolved(coordinate),
            None => LocationState::Unavailable,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    pub id: String,
    pub country: String,
    pub city: String,
    pub is_vip: bool,
    pub location: LocationState,
}

impl Client {
    pub fn new(
        id: impl Into<String>,
        country: impl Into<String>,
        city: impl Into<String>,
        is_vip: bool,
    ) -> Self {
        Self {
            id: id.into(),
            country: country.into(),
            city: city.into(),
            is_vip,
            location: LocationState::Unresolved,
        }
    }

    pub fn has_city(&self) -> bool {
        !self.city.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Manager {
    pub id: String,
    pub office_id: String,
    pub is_vip: bool,
    initial_client_count: u32,
    clients: Vec<String>,
}

impl Manager {
    pub fn new(
        id: impl Into<String>,
        office_id: impl Into<String>,
        initial_client_count: u32,
        is_vip: bool,
    ) -> Self {
        Self {
            id: id.into(),
            office_id: office_id.into(),
            is_vip,
            initial_client_count,
            clients: Vec::new(),
        }
    }

    /// Clients assigned during this run, in assignment order.
    pub fn clients(&self) -> &[String] {
        &self.clients
    }

    /// Carried-over load plus everything assigned in this run.
    pub fn client_count(&self) -> usize {
        self.initial_client_count as usize + self.clients.len()
    }

    pub(crate) fn assign(&mut self, client_id: &str) {
        self.clients.push(client_id.to_string());
    }
}

#[derive(Debug, Clone)]
pub struct Office {
    pub id: String,
    pub location: Option<Coordinate>,
    managers: Vec<usize>,
}

impl Office {
    pub fn new(id: impl Into<String>, location: Option<Coordinate>) -> Self {
        Self {
            id: id.into(),
            location,
            managers: Vec::new(),
        }
    }

    /// Indices into the roster's manager list of everyone working from this office.
    pub fn managers(&self) -> &[usize] {
        &self.managers
    }

    pub(crate) fn clear_managers(&mut self) {
        self.managers.clear();
    }

    pub(crate) fn add_manager(&mut self, index: usize) {
        if !self.managers.contains(&index) {
            self.managers.push(index);
        }
    }
}

/// The working set of one allocation run.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub clients: Vec<Client>,
    pub managers: Vec<Manager>,
    pub offices: Vec<Office>,
}

impl Roster {
    pub fn new(clients: Vec<Client>, managers: Vec<Manager>, offices: Vec<Office>) -> Self {
        Self {
            clients,
            managers,
            offices,
        }
    }

    pub fn allocations(&self) -> Vec<ClientAllocation> {
        self.managers
            .iter()
            .flat_map(|manager| {
                manager.clients().iter().map(move |client_id| ClientAllocation {
                    manager_id: manager.id.clone(),
                    client_id: client_id.clone(),
                    final_client_count: manager.client_count(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAllocation {
    pub manager_id: String,
    pub client_id: String,
    pub final_client_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Vip,
    Foreign,
    Proximity,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Vip => write!(f, "VIP"),
            Tier::Foreign => write!(f, "foreign"),
            Tier::Proximity => write!(f, "proximity"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DistributionSummary {
    pub vip: usize,
    pub foreign: usize,
    pub proximity: usize,
    pub lookups_issued: usize,
    pub lookups_failed: usize,
}

impl DistributionSummary {
    pub fn record(&mut self, tier: Tier) {
        match tier {
            Tier::Vip => self.vip += 1,
            Tier::Foreign => self.foreign += 1,
            Tier::Proximity => self.proximity += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.vip + self.foreign + self.proximity
    }
}

#[derive(Debug, Clone)]
pub struct AllocationResult {
    pub roster: Roster,
    pub summary: DistributionSummary,
}
