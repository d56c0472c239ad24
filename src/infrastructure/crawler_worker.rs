use std::{sync::Arc, time::Duration};

use futures::future::join_all;
use log::{error, info, warn};

use crate::{
    CrawlerState, EnrichedPackage, FetchOutcome, Package, PackageCrawler, PackageEnricher,
    PageFetcher, PageRequest, Sleeper, StdResult,
};

/// Delay observed by a worker between page claims, bounding the request rate
/// even when the API never throttles.
pub const PAGE_CLAIM_DELAY: Duration = Duration::from_secs(1);

/// A worker crawler that claims pages from the shared state until none remain.
///
/// A page abandoned by the fetcher is recorded as failed and skipped, it never
/// halts the worker.
pub struct WorkerCrawler {
    fetcher: Arc<dyn PageFetcher>,
    enricher: Arc<dyn PackageEnricher>,
    state: Arc<CrawlerState>,
    page_claim_delay: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl WorkerCrawler {
    /// Creates a new `WorkerCrawler` instance with the given fetcher and enricher.
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        enricher: Arc<dyn PackageEnricher>,
        state: Arc<CrawlerState>,
        page_claim_delay: Duration,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            fetcher,
            enricher,
            state,
            page_claim_delay,
            sleeper,
        }
    }

    async fn process_page(&self, page: u32, packages: Vec<Package>) {
        if packages.is_empty() {
            info!("No packages found on page {page}");
        }
        let total_packages = packages.len();
        let enriched_packages = self.enrich_packages(packages).await;
        self.state.append_packages(enriched_packages).await;
        info!("Page {page}: {total_packages} packages aggregated");
    }

    /// Enriches every package of one page concurrently, preserving the source order.
    async fn enrich_packages(&self, packages: Vec<Package>) -> Vec<EnrichedPackage> {
        join_all(
            packages
                .into_iter()
                .map(|package| self.enricher.enrich(package)),
        )
        .await
    }

    async fn abandon_page(&self, page: u32, cause: &str) {
        error!("Page {page} failed: {cause}");
        self.state.record_failed_page(page).await;
    }
}

#[async_trait::async_trait]
impl PackageCrawler for WorkerCrawler {
    async fn crawl(&self, total_pages: u32, page_size: u16) -> StdResult<()> {
        self.state.set_total_pages(total_pages).await;
        while let Some(page) = self.state.claim_page().await {
            let request = PageRequest::new(page, page_size);
            info!("Fetching page {page}/{total_pages}");
            match self.fetcher.fetch(&request).await {
                Ok(FetchOutcome::Success(packages)) => self.process_page(page, packages).await,
                Ok(outcome) => self.abandon_page(page, &outcome.to_string()).await,
                Err(e) => self.abandon_page(page, &e.to_string()).await,
            }
            warn!("{}", self.state.state_summary().await);
            self.sleeper.sleep(self.page_claim_delay).await;
        }

        Ok(())
    }
}
