use crate::{EnrichedPackage, Package};

/// A trait for enriching a package record with repository metadata.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PackageEnricher: Sync + Send {
    /// Enriches the package, attaching repository metadata when available.
    ///
    /// Never fails: a missing or failing lookup yields the package unchanged.
    async fn enrich(&self, package: Package) -> EnrichedPackage;
}
