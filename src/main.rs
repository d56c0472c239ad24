use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use log::{info, warn};

use registry_crawler::{
    CrawlerState, DEFAULT_RETRY_BUDGET, DELAY_BETWEEN_WORKERS, FetcherRetrier,
    FilteringPersister, GITHUB_GRAPHQL_ENDPOINT, GitHubPackageEnricher, GraphQlRepositoryLookup,
    HttpListingFetcher, JsonFilePersister, LIBRARIES_IO_API_ENDPOINT, PAGE_CLAIM_DELAY,
    PackageCrawler, PackageEnricher, PackagePersister, PageFetcher, ParallelCrawler,
    RATE_LIMIT_COOLDOWN, Sleeper, StdResult, TRANSIENT_RETRY_DELAY, TokioSleeper, WorkerCrawler,
    deprecated_packages_only,
};

/// Command line arguments for the registry crawler
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// API key for the libraries.io listing API
    #[arg(long, env = "LIBRARIES_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Token for the GitHub GraphQL API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: String,

    /// Platform whose packages are crawled
    #[arg(short = 'l', long, default_value = "npm")]
    platforms: String,

    /// Total pages to crawl
    #[arg(short, long, default_value_t = 2)]
    total_pages: u32,

    /// Number of packages fetched per page
    #[arg(short, long, default_value_t = 20)]
    page_size: u16,

    /// Number of concurrent crawler workers
    #[arg(short, long, default_value_t = 2)]
    concurrency: usize,

    /// Path of the output JSON file
    #[arg(short, long, default_value = "projects.json")]
    output_file: PathBuf,
}

#[tokio::main]
async fn main() -> StdResult<()> {
    env_logger::init();
    info!("Starting registry crawling");
    let args = Args::parse();

    let state = Arc::new(CrawlerState::default());
    let crawler = build_parallel_crawler(&args, state.clone())?;
    crawler.crawl(args.total_pages, args.page_size).await?;

    let failed_pages = state.failed_pages().await;
    if !failed_pages.is_empty() {
        warn!("Pages skipped after retry exhaustion: {failed_pages:?}");
    }
    let packages = state.take_aggregated_packages().await;
    info!(
        "Crawling completed, {} packages aggregated from {} pages",
        packages.len(),
        args.total_pages - failed_pages.len() as u32
    );

    let persister = build_filtering_persister(&args);
    let total_persisted = persister.persist(&packages).await?;
    info!(
        "Persisted {total_persisted} deprecated packages to {}",
        args.output_file.display()
    );

    Ok(())
}

fn build_parallel_crawler(
    args: &Args,
    state: Arc<CrawlerState>,
) -> StdResult<Arc<dyn PackageCrawler>> {
    let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);
    let fetcher: Arc<dyn PageFetcher> = Arc::new(FetcherRetrier::new(
        Arc::new(HttpListingFetcher::try_new(
            LIBRARIES_IO_API_ENDPOINT,
            &args.api_key,
            &args.platforms,
        )?),
        DEFAULT_RETRY_BUDGET,
        RATE_LIMIT_COOLDOWN,
        TRANSIENT_RETRY_DELAY,
        sleeper.clone(),
    ));
    let enricher: Arc<dyn PackageEnricher> = Arc::new(GitHubPackageEnricher::new(Arc::new(
        GraphQlRepositoryLookup::new(GITHUB_GRAPHQL_ENDPOINT, &args.github_token),
    )));
    let crawlers = (0..args.concurrency)
        .map(|_| {
            Arc::new(WorkerCrawler::new(
                fetcher.clone(),
                enricher.clone(),
                state.clone(),
                PAGE_CLAIM_DELAY,
                sleeper.clone(),
            )) as Arc<dyn PackageCrawler>
        })
        .collect::<Vec<_>>();

    Ok(Arc::new(ParallelCrawler::new(
        crawlers,
        DELAY_BETWEEN_WORKERS,
    )))
}

fn build_filtering_persister(args: &Args) -> Arc<dyn PackagePersister> {
    Arc::new(FilteringPersister::new(
        Arc::new(JsonFilePersister::new(&args.output_file)),
        deprecated_packages_only,
    ))
}
