use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Drives a pipeline through its extract, transform and load phases.
pub struct AllocationRunner<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> AllocationRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting client allocation");

        tracing::info!("📥 Reading rosters...");
        let roster = self.pipeline.extract().await?;
        tracing::info!(
            "Read {} clients, {} managers, {} offices",
            roster.clients.len(),
            roster.managers.len(),
            roster.offices.len()
        );

        tracing::info!("⚙️  Distributing clients...");
        let result = self.pipeline.transform(roster).await?;
        tracing::info!("Assigned {} clients", result.summary.total());

        tracing::info!("📤 Writing allocations...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!(
            "Allocations saved to {} in {:?}",
            output_path,
            started.elapsed()
        );

        Ok(output_path)
    }
}
