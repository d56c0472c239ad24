use crate::{EnrichedPackage, StdResult};

/// A trait for persisting aggregated package data to a storage medium.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PackagePersister: Sync + Send {
    /// Persists the package data, returning the number of packages written.
    async fn persist(&self, packages: &[EnrichedPackage]) -> StdResult<u32>;

    /// Loads the previously persisted package data.
    async fn load(&self) -> StdResult<Vec<EnrichedPackage>>;
}
