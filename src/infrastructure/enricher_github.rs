use std::sync::Arc;

use log::warn;

use crate::{EnrichedPackage, Package, PackageEnricher, RepositoryLookup};

/// Marker locating the owner/name path inside a GitHub repository URL.
const GITHUB_HOST_PREFIX: &str = "github.com/";

/// Enriches packages with the metadata of their GitHub repository.
///
/// A package without a parseable GitHub URL passes through untouched, and a
/// failing lookup degrades to absent metadata: enrichment never fails a page.
pub struct GitHubPackageEnricher {
    /// The repository lookup collaborator.
    lookup: Arc<dyn RepositoryLookup>,
}

impl GitHubPackageEnricher {
    /// Creates a new `GitHubPackageEnricher` instance with the given lookup.
    pub fn new(lookup: Arc<dyn RepositoryLookup>) -> Self {
        Self { lookup }
    }

    /// Extracts the repository owner and name from a GitHub repository URL,
    /// stripping a trailing path separator and a trailing `.git` suffix.
    fn parse_repository_path(repository_url: &str) -> Option<(String, String)> {
        let path = repository_url.split_once(GITHUB_HOST_PREFIX)?.1;
        let mut segments = path.trim_end_matches('/').split('/');
        let owner = segments.next()?;
        let name_segment = segments.next()?;
        let name = name_segment.strip_suffix(".git").unwrap_or(name_segment);

        (!owner.is_empty() && !name.is_empty()).then(|| (owner.to_string(), name.to_string()))
    }
}

#[async_trait::async_trait]
impl PackageEnricher for GitHubPackageEnricher {
    async fn enrich(&self, package: Package) -> EnrichedPackage {
        let Some((owner, name)) = package
            .repository_url()
            .and_then(Self::parse_repository_path)
        else {
            return EnrichedPackage::new(package, None);
        };

        match self.lookup.fetch_repository_info(&owner, &name).await {
            Ok(repository_info) => EnrichedPackage::new(package, Some(repository_info)),
            Err(e) => {
                warn!("Failed to fetch repository info for {owner}/{name}: {e}");
                EnrichedPackage::new(package, None)
            }
        }
    }
}
