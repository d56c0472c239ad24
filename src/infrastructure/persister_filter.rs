use std::sync::Arc;

use log::info;

use crate::{EnrichedPackage, PackagePersister, StdResult};

/// The predicate deciding which packages survive the filtering pass.
pub type PackagePredicate = fn(&EnrichedPackage) -> bool;

/// Keeps only the packages carrying a non-empty deprecation reason.
pub fn deprecated_packages_only(package: &EnrichedPackage) -> bool {
    package.is_deprecated()
}

/// A persister decorator that writes the full collection first, then
/// overwrites the destination with the filtered subset.
///
/// A crash between the two phases leaves the complete, unfiltered data on
/// disk.
pub struct FilteringPersister {
    /// The persister to be filtered.
    persister: Arc<dyn PackagePersister>,

    /// The predicate applied to the re-loaded collection.
    predicate: PackagePredicate,
}

impl FilteringPersister {
    /// Creates a new `FilteringPersister` instance with the given predicate.
    pub fn new(persister: Arc<dyn PackagePersister>, predicate: PackagePredicate) -> Self {
        Self {
            persister,
            predicate,
        }
    }
}

#[async_trait::async_trait]
impl PackagePersister for FilteringPersister {
    /// Persists the full collection, re-loads it, and overwrites the
    /// destination with the packages matching the predicate.
    async fn persist(&self, packages: &[EnrichedPackage]) -> StdResult<u32> {
        let total_persisted = self.persister.persist(packages).await?;
        info!("Persisted {total_persisted} packages before filtering");
        let persisted_packages = self.persister.load().await?;
        let filtered_packages = persisted_packages
            .into_iter()
            .filter(|package| (self.predicate)(package))
            .collect::<Vec<_>>();

        self.persister.persist(&filtered_packages).await
    }

    async fn load(&self) -> StdResult<Vec<EnrichedPackage>> {
        self.persister.load().await
    }
}
