use crate::adapters::csv_records;
use crate::config::toml_config::{AllocatorConfig, InputConfig};
use crate::core::distributor::ClientDistributor;
use crate::core::{AllocationResult, Pipeline, Roster, Storage};
use crate::utils::error::Result;

/// Reads the client, manager and office files named in `input` from `storage`.
pub async fn read_roster<S: Storage>(storage: &S, input: &InputConfig) -> Result<Roster> {
    tracing::debug!("Reading clients from {}", input.clients);
    let clients = csv_records::parse_clients(&storage.read_file(&input.clients).await?)?;

    tracing::debug!("Reading managers from {}", input.managers);
    let managers = csv_records::parse_managers(&storage.read_file(&input.managers).await?)?;

    tracing::debug!("Reading offices from {}", input.offices);
    let offices = csv_records::parse_offices(&storage.read_file(&input.offices).await?)?;

    Ok(Roster::new(clients, managers, offices))
}

/// Reads the three rosters from storage, distributes clients and writes the allocations as JSON.
pub struct AllocationPipeline<S: Storage> {
    storage: S,
    config: AllocatorConfig,
    distributor: ClientDistributor,
}

impl<S: Storage> AllocationPipeline<S> {
    pub fn new(storage: S, config: AllocatorConfig, distributor: ClientDistributor) -> Self {
        Self {
            storage,
            config,
            distributor,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for AllocationPipeline<S> {
    async fn extract(&self) -> Result<Roster> {
        read_roster(&self.storage, &self.config.input).await
    }

    async fn transform(&self, mut roster: Roster) -> Result<AllocationResult> {
        let summary = self.distributor.distribute(&mut roster).await?;
        Ok(AllocationResult { roster, summary })
    }

    async fn load(&self, result: AllocationResult) -> Result<String> {
        let allocations = result.roster.allocations();
        let json = if self.config.output.pretty {
            serde_json::to_vec_pretty(&allocations)?
        } else {
            serde_json::to_vec(&allocations)?
        };

        tracing::debug!(
            "Writing {} allocations ({} bytes) to storage",
            allocations.len(),
            json.len()
        );
        self.storage.write_file(&self.config.output.path, &json).await?;

        Ok(self.config.output.path.clone())
    }
}
