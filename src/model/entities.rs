use std::{
    fmt::Display,
    ops::Deref,
    sync::atomic::{AtomicU32, Ordering},
};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};

/// The name of a package.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PackageName(pub String);

impl Deref for PackageName {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A package record returned by the listing API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// The name of the package.
    name: PackageName,

    /// The URL of the package source repository, if published.
    repository_url: Option<String>,

    /// The reason the package was deprecated, if it was.
    deprecation_reason: Option<String>,
}

impl Package {
    /// Creates a new `Package` instance.
    pub fn new(
        name: &str,
        repository_url: Option<&str>,
        deprecation_reason: Option<&str>,
    ) -> Self {
        Self {
            name: PackageName(name.to_string()),
            repository_url: repository_url.map(ToString::to_string),
            deprecation_reason: deprecation_reason.map(ToString::to_string),
        }
    }

    /// Retrieves the package name.
    pub fn name(&self) -> &PackageName {
        &self.name
    }

    /// Retrieves the source repository URL.
    pub fn repository_url(&self) -> Option<&str> {
        self.repository_url.as_deref()
    }

    /// Retrieves the deprecation reason.
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.deprecation_reason.as_deref()
    }

    /// Creates a dummy `Package` for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self::new("package-1", Some("https://github.com/org-1/package-1"), None)
    }
}

impl Display for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Package: {}, repository: {}",
            self.name,
            self.repository_url.as_deref().unwrap_or("none")
        )
    }
}

/// Metadata of a GitHub repository, as returned by the repository lookup API.
///
/// The crawler passes this payload through untouched, it only ever lands in
/// the output file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryInfo {
    pub name_with_owner: String,
    pub description: Option<String>,
    pub stargazer_count: u32,
    pub fork_count: u32,
    pub url: String,
    pub is_archived: bool,
    pub is_fork: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl RepositoryInfo {
    /// Creates a dummy `RepositoryInfo` instance for testing purposes.
    #[cfg(test)]
    pub(crate) fn dummy() -> Self {
        Self {
            name_with_owner: "org-1/package-1".to_string(),
            description: Some("A dummy repository".to_string()),
            stargazer_count: 100,
            fork_count: 10,
            url: "https://github.com/org-1/package-1".to_string(),
            is_archived: false,
            is_fork: false,
            created_at: "2020-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }
}

/// A package record enriched with the metadata of its GitHub repository.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EnrichedPackage {
    /// The name of the package.
    name: PackageName,

    /// The URL of the package source repository, if published.
    repository_url: Option<String>,

    /// The reason the package was deprecated, if it was.
    deprecation_reason: Option<String>,

    /// The repository metadata, absent when the package has no parseable
    /// GitHub URL or the lookup failed.
    github: Option<RepositoryInfo>,
}

impl EnrichedPackage {
    /// Creates a new `EnrichedPackage` from a package and its repository metadata.
    pub fn new(package: Package, github: Option<RepositoryInfo>) -> Self {
        Self {
            name: package.name,
            repository_url: package.repository_url,
            deprecation_reason: package.deprecation_reason,
            github,
        }
    }

    /// Retrieves the package name.
    pub fn name(&self) -> &PackageName {
        &self.name
    }

    /// Retrieves the repository metadata.
    pub fn github(&self) -> Option<&RepositoryInfo> {
        self.github.as_ref()
    }

    /// Whether the package carries a non-empty deprecation reason.
    pub fn is_deprecated(&self) -> bool {
        self.deprecation_reason
            .as_deref()
            .is_some_and(|reason| !reason.is_empty())
    }
}

impl Display for EnrichedPackage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EnrichedPackage: {}, enriched: {}, deprecated: {}",
            self.name,
            self.github.is_some(),
            self.is_deprecated()
        )
    }
}

/// The progress state shared by all crawler workers.
///
/// Created once before the workers start, mutated concurrently during the
/// run, drained once after all workers have joined.
#[derive(Debug)]
pub struct CrawlerState {
    /// The next page number to claim, monotonically increasing.
    next_page: AtomicU32,

    /// The total number of pages to crawl.
    total_pages: RwLock<u32>,

    /// The packages aggregated so far, appended one page at a time.
    aggregated_packages: Mutex<Vec<EnrichedPackage>>,

    /// The pages abandoned after their retry budget was exhausted.
    failed_pages: RwLock<Vec<u32>>,
}

impl Default for CrawlerState {
    fn default() -> Self {
        Self {
            next_page: AtomicU32::new(1),
            total_pages: RwLock::new(0),
            aggregated_packages: Mutex::new(Vec::new()),
            failed_pages: RwLock::new(Vec::new()),
        }
    }
}

impl CrawlerState {
    /// Sets the total number of pages to crawl.
    pub async fn set_total_pages(&self, total_pages: u32) {
        let mut total = self.total_pages.write().await;
        *total = total_pages;
    }

    /// Retrieves the total number of pages to crawl.
    pub async fn get_total_pages(&self) -> u32 {
        let total = self.total_pages.read().await;
        *total
    }

    /// Atomically claims the next unclaimed page.
    ///
    /// Returns `None` once every page in `[1, total_pages]` has been claimed.
    /// No two callers ever receive the same page number.
    pub async fn claim_page(&self) -> Option<u32> {
        let total_pages = self.get_total_pages().await;
        let page = self.next_page.fetch_add(1, Ordering::SeqCst);

        (page <= total_pages).then_some(page)
    }

    /// Appends the enriched packages of one completed page.
    pub async fn append_packages(&self, packages: Vec<EnrichedPackage>) {
        let mut aggregated_packages = self.aggregated_packages.lock().await;
        aggregated_packages.extend(packages);
    }

    /// Retrieves the number of packages aggregated so far.
    pub async fn total_aggregated_packages(&self) -> usize {
        let aggregated_packages = self.aggregated_packages.lock().await;
        aggregated_packages.len()
    }

    /// Drains the aggregated packages, to be called once after all workers joined.
    pub async fn take_aggregated_packages(&self) -> Vec<EnrichedPackage> {
        let mut aggregated_packages = self.aggregated_packages.lock().await;
        std::mem::take(&mut *aggregated_packages)
    }

    /// Records a page abandoned after retry exhaustion.
    pub async fn record_failed_page(&self, page: u32) {
        let mut failed_pages = self.failed_pages.write().await;
        failed_pages.push(page);
    }

    /// Retrieves the failed page numbers, sorted.
    pub async fn failed_pages(&self) -> Vec<u32> {
        let failed_pages = self.failed_pages.read().await;
        let mut pages = failed_pages.clone();
        pages.sort_unstable();

        pages
    }

    /// Returns the summary of the state.
    pub async fn state_summary(&self) -> String {
        let total_pages = self.get_total_pages().await;
        let next_page = self.next_page.load(Ordering::SeqCst);
        let total_claimed_pages = (next_page - 1).min(total_pages);
        let total_failed_pages = self.failed_pages.read().await.len();
        let total_aggregated_packages = self.total_aggregated_packages().await;

        format!(
            "Pages: claimed={total_claimed_pages}/{total_pages}, failed={total_failed_pages}, Packages: aggregated={total_aggregated_packages}",
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    mod crawler_state {
        use super::*;

        #[tokio::test]
        async fn claim_pages_sequentially_until_exhausted() {
            let state = CrawlerState::default();
            state.set_total_pages(3).await;

            assert_eq!(state.claim_page().await, Some(1));
            assert_eq!(state.claim_page().await, Some(2));
            assert_eq!(state.claim_page().await, Some(3));
            assert_eq!(state.claim_page().await, None);
            assert_eq!(state.claim_page().await, None);
        }

        #[tokio::test]
        async fn claim_page_without_pages_to_crawl() {
            let state = CrawlerState::default();

            assert_eq!(state.claim_page().await, None);
        }

        #[tokio::test]
        async fn claim_pages_exactly_once_across_concurrent_workers() {
            let total_pages = 50;
            let state = Arc::new(CrawlerState::default());
            state.set_total_pages(total_pages).await;
            let claimed_pages = Arc::new(Mutex::new(Vec::new()));

            let mut handles = Vec::new();
            for _ in 0..4 {
                let state_clone = state.clone();
                let claimed_pages_clone = claimed_pages.clone();
                handles.push(tokio::spawn(async move {
                    while let Some(page) = state_clone.claim_page().await {
                        claimed_pages_clone.lock().await.push(page);
                    }
                }));
            }
            for handle in handles {
                handle.await.unwrap();
            }

            let mut claimed_pages = claimed_pages.lock().await.clone();
            claimed_pages.sort_unstable();
            assert_eq!(claimed_pages, (1..=total_pages).collect::<Vec<_>>());
        }

        #[tokio::test]
        async fn set_and_get_total_pages() {
            let state = CrawlerState::default();

            state.set_total_pages(100).await;
            let total_pages = state.get_total_pages().await;

            assert_eq!(total_pages, 100);
        }

        #[tokio::test]
        async fn append_and_take_aggregated_packages() {
            let state = CrawlerState::default();
            let package1 = EnrichedPackage::new(Package::new("package-1", None, None), None);
            let package2 = EnrichedPackage::new(
                Package::new("package-2", None, None),
                Some(RepositoryInfo::dummy()),
            );

            state.append_packages(vec![package1.clone()]).await;
            state.append_packages(vec![package2.clone()]).await;
            let packages = state.take_aggregated_packages().await;

            assert_eq!(packages, vec![package1, package2]);
            assert_eq!(state.total_aggregated_packages().await, 0);
        }

        #[tokio::test]
        async fn concurrent_appends_are_never_lost() {
            let state = Arc::new(CrawlerState::default());

            let mut handles = Vec::new();
            for _ in 0..8 {
                let state_clone = state.clone();
                handles.push(tokio::spawn(async move {
                    for _ in 0..25 {
                        state_clone
                            .append_packages(vec![EnrichedPackage::new(Package::dummy(), None)])
                            .await;
                    }
                }));
            }
            for handle in handles {
                handle.await.unwrap();
            }

            assert_eq!(state.total_aggregated_packages().await, 200);
        }

        #[tokio::test]
        async fn record_and_list_failed_pages() {
            let state = CrawlerState::default();

            state.record_failed_page(5).await;
            state.record_failed_page(2).await;
            let failed_pages = state.failed_pages().await;

            assert_eq!(failed_pages, vec![2, 5]);
        }

        #[tokio::test]
        async fn state_summary_reports_progress() {
            let state = CrawlerState::default();
            state.set_total_pages(10).await;
            let _ = state.claim_page().await;
            state.record_failed_page(1).await;
            state
                .append_packages(vec![EnrichedPackage::new(Package::dummy(), None)])
                .await;

            let summary = state.state_summary().await;

            assert_eq!(
                summary,
                "Pages: claimed=1/10, failed=1, Packages: aggregated=1"
            );
        }
    }

    mod enriched_package {
        use super::*;

        #[test]
        fn is_deprecated_with_reason() {
            let package = EnrichedPackage::new(
                Package::new("package-1", None, Some("use other-package")),
                None,
            );

            assert!(package.is_deprecated());
        }

        #[test]
        fn is_not_deprecated_without_reason() {
            let package = EnrichedPackage::new(Package::new("package-1", None, None), None);

            assert!(!package.is_deprecated());
        }

        #[test]
        fn is_not_deprecated_with_empty_reason() {
            let package = EnrichedPackage::new(Package::new("package-1", None, Some("")), None);

            assert!(!package.is_deprecated());
        }
    }
}
