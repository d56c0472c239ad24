use crate::StdResult;

/// A trait for crawling the paginated package listing API.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PackageCrawler: Sync + Send {
    /// Crawls the listing API until every page in `[1, total_pages]` has been
    /// claimed and processed.
    async fn crawl(&self, total_pages: u32, page_size: u16) -> StdResult<()>;
}
