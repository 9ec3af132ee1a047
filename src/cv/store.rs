use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::PersistenceError;
use crate::network::{ModelMetadata, Network};

/// Destination for networks the cross-validator decides to keep.
///
/// Fold runs call `save` concurrently, so implementations must be `Sync`.
pub trait ModelStore: Send + Sync {
    /// Persists `network` and returns where it went.
    fn save(&self, network: &Network, metadata: &ModelMetadata)
        -> Result<PathBuf, PersistenceError>;
}

/// Writes one JSON artifact per kept network into a directory.
/// File names encode fold, validation error and iteration count, so
/// concurrent folds never write the same file.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> DirectoryStore {
        DirectoryStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_name(metadata: &ModelMetadata) -> String {
        format!(
            "fold{}_err{:.4}_iter{}.json",
            metadata.fold.unwrap_or(0),
            metadata.validation_error.unwrap_or(f64::NAN),
            metadata.iterations.unwrap_or(0)
        )
    }
}

impl ModelStore for DirectoryStore {
    fn save(
        &self,
        network: &Network,
        metadata: &ModelMetadata,
    ) -> Result<PathBuf, PersistenceError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|source| PersistenceError::Io { path: self.dir.clone(), source })?;
        let path = self.dir.join(DirectoryStore::file_name(metadata));
        network.save_json_with_metadata(&path, Some(metadata))?;
        Ok(path)
    }
}

/// Keeps saved networks in memory, in the order they were saved.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<Vec<(Network, ModelMetadata)>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn into_saved(self) -> Vec<(Network, ModelMetadata)> {
        self.saved.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ModelStore for MemoryStore {
    fn save(
        &self,
        network: &Network,
        metadata: &ModelMetadata,
    ) -> Result<PathBuf, PersistenceError> {
        let mut saved = self.saved.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        saved.push((network.clone(), metadata.clone()));
        Ok(PathBuf::from(format!("memory:{}", saved.len() - 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkSpec;

    #[test]
    fn file_name_encodes_fold_error_and_iterations() {
        let meta = ModelMetadata {
            fold: Some(3),
            iterations: Some(7),
            validation_error: Some(0.04321),
            ..ModelMetadata::default()
        };
        assert_eq!(DirectoryStore::file_name(&meta), "fold3_err0.0432_iter7.json");
    }

    #[test]
    fn directory_store_round_trips() {
        let dir = std::env::temp_dir().join(format!("crossfold-nn-store-{}", std::process::id()));
        let store = DirectoryStore::new(&dir);
        let network = Network::seeded(&NetworkSpec::new(3, 1, 2, 1), 12).unwrap();
        let meta = ModelMetadata {
            fold: Some(1),
            iterations: Some(2),
            validation_error: Some(0.5),
            ..Default::default()
        };
        let path = store.save(&network, &meta).unwrap();
        assert!(path.starts_with(&dir));
        let (loaded, loaded_meta) = Network::load_json_with_metadata(&path).unwrap();
        assert_eq!(loaded, network);
        assert_eq!(loaded_meta, Some(meta));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn memory_store_keeps_copies() {
        let store = MemoryStore::new();
        let network = Network::seeded(&NetworkSpec::new(2, 1, 2, 1), 1).unwrap();
        store.save(&network, &ModelMetadata::default()).unwrap();
        let saved = store.into_saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, network);
    }
}
