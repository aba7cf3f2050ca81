use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// A persisted data object, the unit a saved-data file holds.
pub type Compound = Map<String, Value>;

pub static DATA_DIRECTORY_NAME: &str = "data";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Couldn't access {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Couldn't parse {}: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
}

/// On-disk data container of a single top-level world: `<world_directory>/data/<key>.json`.
#[derive(Debug, Clone)]
pub struct DataStorage {
    directory: PathBuf,
}

impl DataStorage {
    pub fn new(world_directory: impl AsRef<Path>) -> Self {
        Self {
            directory: world_directory.as_ref().join(DATA_DIRECTORY_NAME),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn file_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }

    /// Read the compound stored under `key`.
    ///
    /// Returns [None] if nothing has been saved under that key yet.
    pub fn read(&self, key: &str) -> Result<Option<Compound>, StorageError> {
        let path = self.file_for(key);

        let file = match std::fs::read(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        match serde_json::from_slice(&file) {
            Ok(compound) => Ok(Some(compound)),
            Err(source) => Err(StorageError::Parse { path, source }),
        }
    }

    pub fn write(&self, key: &str, compound: &Compound) -> Result<(), StorageError> {
        let path = self.file_for(key);
        let out = serde_json::to_vec_pretty(compound).map_err(|source| StorageError::Parse {
            path: path.clone(),
            source,
        })?;

        std::fs::create_dir_all(&self.directory)
            .and_then(|_| std::fs::write(&path, out))
            .map_err(|source| StorageError::Io { path, source })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let storage = DataStorage::new(dir.path());

        assert!(storage.read("tpmod_locations").unwrap().is_none());
    }

    #[test]
    fn write_then_read_returns_same_compound() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let storage = DataStorage::new(dir.path().join("world"));
        let mut compound = Compound::new();
        compound.insert("locations".into(), json!({}));

        storage.write("tpmod_locations", &compound).unwrap();

        assert!(storage.file_for("tpmod_locations").ends_with("world/data/tpmod_locations.json"));
        assert_eq!(storage.read("tpmod_locations").unwrap(), Some(compound));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let storage = DataStorage::new(dir.path());
        std::fs::create_dir_all(storage.directory()).unwrap();
        std::fs::write(storage.file_for("tpmod_locations"), "{ not json").unwrap();

        assert!(storage.read("tpmod_locations").is_err());
    }
}
