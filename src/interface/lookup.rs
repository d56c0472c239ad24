use crate::{RepositoryInfo, StdResult};

/// A trait for looking up repository metadata from its hosting service.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryLookup: Sync + Send {
    /// Fetches the metadata of the repository `owner/name`.
    async fn fetch_repository_info(&self, owner: &str, name: &str) -> StdResult<RepositoryInfo>;
}
