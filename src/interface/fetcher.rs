use crate::{FetchOutcome, PageRequest, StdResult};

/// A trait for fetching one page of packages from the listing API.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PageFetcher: Sync + Send {
    /// Fetches a single page of packages, classifying the result.
    async fn fetch(&self, request: &PageRequest) -> StdResult<FetchOutcome>;
}
