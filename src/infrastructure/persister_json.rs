use std::path::PathBuf;

use log::info;

use crate::{EnrichedPackage, PackagePersister, StdResult};

/// A persister that stores the aggregated packages in a JSON file.
pub struct JsonFilePersister {
    /// The path of the output file, overwritten on every persist.
    path: PathBuf,
}

impl JsonFilePersister {
    /// Creates a new `JsonFilePersister` instance writing to the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl PackagePersister for JsonFilePersister {
    async fn persist(&self, packages: &[EnrichedPackage]) -> StdResult<u32> {
        let serialized = serde_json::to_string_pretty(packages)?;
        tokio::fs::write(&self.path, serialized).await?;
        info!(
            "Persisted {} packages to {}",
            packages.len(),
            self.path.display()
        );

        Ok(packages.len() as u32)
    }

    async fn load(&self) -> StdResult<Vec<EnrichedPackage>> {
        let serialized = tokio::fs::read_to_string(&self.path).await?;

        Ok(serde_json::from_str(&serialized)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Package, RepositoryInfo};

    use super::*;

    fn dummy_packages() -> Vec<EnrichedPackage> {
        vec![
            EnrichedPackage::new(
                Package::new(
                    "package-1",
                    Some("https://github.com/org-1/package-1"),
                    Some("use package-2"),
                ),
                Some(RepositoryInfo::dummy()),
            ),
            EnrichedPackage::new(Package::new("package-2", None, None), None),
        ]
    }

    #[tokio::test]
    async fn persist_then_load_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let persister = JsonFilePersister::new(temp_dir.path().join("projects.json"));
        let packages = dummy_packages();

        let total_persisted = persister.persist(&packages).await.unwrap();
        let loaded_packages = persister.load().await.unwrap();

        assert_eq!(total_persisted, 2);
        assert_eq!(loaded_packages, packages);
    }

    #[tokio::test]
    async fn persist_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let output_file = temp_dir.path().join("projects.json");
        let persister = JsonFilePersister::new(&output_file);
        let packages = dummy_packages();

        persister.persist(&packages).await.unwrap();
        let first_write = std::fs::read(&output_file).unwrap();
        persister.persist(&packages).await.unwrap();
        let second_write = std::fs::read(&output_file).unwrap();

        assert_eq!(first_write, second_write);
    }

    #[tokio::test]
    async fn persist_overwrites_previous_content() {
        let temp_dir = tempfile::tempdir().unwrap();
        let persister = JsonFilePersister::new(temp_dir.path().join("projects.json"));

        persister.persist(&dummy_packages()).await.unwrap();
        persister
            .persist(&[EnrichedPackage::new(
                Package::new("package-3", None, None),
                None,
            )])
            .await
            .unwrap();
        let loaded_packages = persister.load().await.unwrap();

        assert_eq!(loaded_packages.len(), 1);
        assert_eq!(loaded_packages[0].name().to_string(), "package-3");
    }

    #[tokio::test]
    async fn load_fails_when_file_is_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let persister = JsonFilePersister::new(temp_dir.path().join("missing.json"));

        persister
            .load()
            .await
            .expect_err("Expected an error for a missing file");
    }
}
