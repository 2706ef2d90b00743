use crate::domain::model::{AllocationResult, Coordinate, Roster};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// External geocoding provider.
///
/// `Ok(None)` means the provider answered but knows no such place; errors cover
/// transport failures, non-success responses and unreadable payloads.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn locate(&self, place: &str, language: &str) -> Result<Option<Coordinate>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Roster>;
    async fn transform(&self, roster: Roster) -> Result<AllocationResult>;
    async fn load(&self, result: AllocationResult) -> Result<String>;
}
