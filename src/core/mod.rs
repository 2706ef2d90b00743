pub mod distance;
pub mod distributor;
pub mod locator;
pub mod pipeline;
pub mod pools;
pub mod runner;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{AllocationResult, Roster};
pub use crate::domain::ports::{Geocoder, Pipeline, Storage};
pub use crate::utils::error::Result;
