use std::{sync::Arc, time::Duration};

use anyhow::anyhow;
use log::warn;
use tokio::time::sleep;

use crate::{PackageCrawler, StdResult};

/// Delay between starting each worker, bounding the initial request burst.
pub const DELAY_BETWEEN_WORKERS: Duration = Duration::from_secs(1);

/// A parallel crawler that runs multiple worker crawlers concurrently over the
/// shared page counter.
pub struct ParallelCrawler {
    /// The worker crawlers
    crawlers: Vec<Arc<dyn PackageCrawler>>,

    /// The delay between starting each crawler
    delay_between_crawlers: Duration,
}

impl ParallelCrawler {
    /// Creates a new `ParallelCrawler` instance with the given crawlers.
    pub fn new(crawlers: Vec<Arc<dyn PackageCrawler>>, delay_between_crawlers: Duration) -> Self {
        Self {
            crawlers,
            delay_between_crawlers,
        }
    }
}

#[async_trait::async_trait]
impl PackageCrawler for ParallelCrawler {
    /// Starts every worker and joins them all before returning.
    async fn crawl(&self, total_pages: u32, page_size: u16) -> StdResult<()> {
        if self.crawlers.is_empty() {
            return Err(anyhow!("No worker crawlers provided"));
        }

        let mut handles = Vec::new();
        for crawler in &self.crawlers {
            if !handles.is_empty() {
                sleep(self.delay_between_crawlers).await;
            }
            let crawler_clone = Arc::clone(crawler);
            let handle =
                tokio::spawn(async move { crawler_clone.crawl(total_pages, page_size).await });
            handles.push(handle);
            warn!("Started crawler {}/{}", handles.len(), self.crawlers.len());
        }

        for handle in handles {
            handle.await??;
        }

        Ok(())
    }
}
