pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{geocoder::YandexGeocoder, storage::LocalStorage};
pub use config::AllocatorConfig;
pub use crate::core::{
    distributor::ClientDistributor, locator::LocationResolver, pipeline::AllocationPipeline,
    runner::AllocationRunner,
};
pub use domain::model::{
    AllocationResult, Client, ClientAllocation, Coordinate, DistributionSummary, LocationState,
    Manager, Office, Roster,
};
pub use domain::ports::{Geocoder, Pipeline, Storage};
pub use domain::rules::AssignmentRules;
pub use utils::error::{AllocatorError, Result};
